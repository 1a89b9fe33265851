/* src/cli/src/config.rs */

mod loader;

pub use loader::{find_stanza_config, load_stanza_config};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StanzaConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub site: SiteConfig,
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub router: RouterSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
  /// Absolute site origin, e.g. `https://example.com`. Required for the
  /// sitemap; a trailing slash is stripped on load.
  pub root: Option<String>,
  /// Path prefix when the site is served from a subdirectory.
  pub base_path: Option<String>,
  /// JSON file whose contents become the global site data object.
  pub data_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
  #[serde(default = "default_routes")]
  pub routes: String,
  #[serde(default = "default_templates_dir")]
  pub templates_dir: String,
  /// Document shell HTML file; the built-in shell is used when omitted.
  pub document: Option<String>,
  #[serde(default = "default_public_dir")]
  pub public_dir: String,
  #[serde(default = "default_dist_dir")]
  pub dist_dir: String,
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      routes: default_routes(),
      templates_dir: default_templates_dir(),
      document: None,
      public_dir: default_public_dir(),
      dist_dir: default_dist_dir(),
    }
  }
}

fn default_routes() -> String {
  "routes.json".to_string()
}

fn default_templates_dir() -> String {
  "templates".to_string()
}

fn default_public_dir() -> String {
  "public".to_string()
}

fn default_dist_dir() -> String {
  "dist".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
  /// Cap on concurrently exported routes.
  #[serde(default = "default_output_file_rate")]
  pub output_file_rate: usize,
  /// Client bundle filename referenced from every page.
  #[serde(default = "default_bundle")]
  pub bundle: String,
  /// Optional shell command that produces the client bundle.
  pub bundler_command: Option<String>,
  #[serde(default = "default_true")]
  pub force_404: bool,
  #[serde(default)]
  pub disable_duplicate_routes_warning: bool,
  #[serde(default = "default_true")]
  pub sitemap: bool,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self {
      output_file_rate: default_output_file_rate(),
      bundle: default_bundle(),
      bundler_command: None,
      force_404: true,
      disable_duplicate_routes_warning: false,
      sitemap: true,
    }
  }
}

fn default_output_file_rate() -> usize {
  100
}

fn default_bundle() -> String {
  "app.js".to_string()
}

fn default_true() -> bool {
  true
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterSection {
  /// Cap on concurrent prefetch fetches in the client runtime.
  #[serde(default = "default_prefetch_rate")]
  pub prefetch_rate: usize,
  /// Minimum time a loading placeholder stays visible, preventing
  /// flicker on fast transitions.
  #[serde(default)]
  pub min_load_time_ms: u32,
  #[serde(default = "default_scroll_duration")]
  pub scroll_duration_ms: u32,
}

impl Default for RouterSection {
  fn default() -> Self {
    Self {
      prefetch_rate: default_prefetch_rate(),
      min_load_time_ms: 0,
      scroll_duration_ms: default_scroll_duration(),
    }
  }
}

fn default_prefetch_rate() -> usize {
  3
}

fn default_scroll_duration() -> u32 {
  300
}
