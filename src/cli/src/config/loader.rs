/* src/cli/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::StanzaConfig;

/// Walk upward from `start` to find `stanza.toml`, like Cargo.toml discovery
pub fn find_stanza_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join("stanza.toml");
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("stanza.toml not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_stanza_config(path: &Path) -> Result<StanzaConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let mut config: StanzaConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  // A trailing slash on the site root would double up in joined URLs.
  if let Some(root) = &mut config.site.root {
    while root.ends_with('/') {
      root.pop();
    }
  }
  if config.build.output_file_rate == 0 {
    bail!("build.output_file_rate must be at least 1");
  }
  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_config_upward() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("stanza.toml"), "[project]\nname = \"site\"\n").unwrap();

    let found = find_stanza_config(&nested).unwrap();
    assert_eq!(found, dir.path().canonicalize().unwrap().join("stanza.toml"));
  }

  #[test]
  fn missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = find_stanza_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("stanza.toml not found"));
  }

  #[test]
  fn defaults_fill_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stanza.toml");
    std::fs::write(&path, "[project]\nname = \"site\"\n").unwrap();

    let config = load_stanza_config(&path).unwrap();
    assert_eq!(config.paths.routes, "routes.json");
    assert_eq!(config.paths.dist_dir, "dist");
    assert_eq!(config.build.output_file_rate, 100);
    assert!(config.build.force_404);
    assert_eq!(config.router.prefetch_rate, 3);
  }

  #[test]
  fn site_root_trailing_slash_is_stripped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stanza.toml");
    std::fs::write(
      &path,
      "[project]\nname = \"site\"\n\n[site]\nroot = \"https://example.com/\"\n",
    )
    .unwrap();

    let config = load_stanza_config(&path).unwrap();
    assert_eq!(config.site.root.as_deref(), Some("https://example.com"));
  }

  #[test]
  fn zero_output_file_rate_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stanza.toml");
    std::fs::write(
      &path,
      "[project]\nname = \"site\"\n\n[build]\noutput_file_rate = 0\n",
    )
    .unwrap();

    assert!(load_stanza_config(&path).is_err());
  }
}
