/* src/cli/src/build/mod.rs */

// Build orchestrator: normalize routes, load templates, resolve and
// partition data, export pages, then write the site-level artifacts.

mod assets;
mod codegen;
mod data;
mod export;
mod routes;
mod templates;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;

use stanza_core::document::prefix_root_relative;
use stanza_core::hooks::HookChain;
use stanza_core::route::NormalizeOptions;
use stanza_core::sitemap::{generate_sitemap_xml, sitemap_entries};
use stanza_core::{RouteTable, normalize_routes, partition_route_data};

use crate::config::StanzaConfig;
use crate::shell::run_command;
use crate::ui::{self, RESET, YELLOW};

pub fn normalize_options(config: &StanzaConfig) -> NormalizeOptions {
  NormalizeOptions {
    tree: false,
    force_404: config.build.force_404,
    disable_duplicate_warning: config.build.disable_duplicate_routes_warning,
  }
}

pub async fn run_build(config: &StanzaConfig, base_dir: &Path, dev: bool) -> Result<()> {
  let started = Instant::now();
  ui::banner("build");

  // [1/6] Normalize routes
  ui::step(1, 6, "Normalizing routes");
  let forest = routes::load_routes(base_dir, &config.paths.routes)?;
  let normalized = normalize_routes(&forest, normalize_options(config))?;
  for warning in &normalized.warnings {
    ui::warn(warning);
  }
  ui::detail_ok(&format!("{} routes", normalized.routes.len()));
  ui::blank();

  // [2/6] Load templates
  ui::step(2, 6, "Loading templates");
  let registry =
    templates::TemplateRegistry::load(base_dir, &config.paths.templates_dir, &normalized.routes)?;
  let shell = templates::load_document_shell(base_dir, config.paths.document.as_deref())?;
  let site_data = load_site_data(base_dir, config)?;
  ui::detail_ok(&format!("{} templates", registry.count()));
  ui::blank();

  // [3/6] Resolve route data
  ui::step(3, 6, "Resolving route data");
  let resolved = data::resolve_all(&normalized.routes, dev).await?;
  let table = RouteTable::build(&normalized.routes);
  let (shared, records) = partition_route_data(&resolved, &table)?;
  let local_count = records.iter().filter(|r| r.local_hash.is_some()).count();
  ui::detail_ok(&format!("{} shared blobs, {local_count} local payloads", shared.len()));
  ui::blank();

  // [4/6] Bundle client
  ui::step(4, 6, "Bundling client");
  match &config.build.bundler_command {
    Some(command) => run_command(base_dir, command, "bundler")?,
    None => ui::detail("no bundler configured, skipping"),
  }
  ui::blank();

  // [5/6] Export pages
  ui::step(5, 6, "Exporting pages");
  let dist = base_dir.join(&config.paths.dist_dir);
  let mut html_hooks: HookChain<String> = HookChain::new();
  if let Some(base) = config.site.base_path.clone() {
    html_hooks.push(move |html| Ok(prefix_root_relative(&html, &base)));
  }
  let summary = export::export_routes(
    &normalized.routes,
    &records,
    &resolved,
    &registry,
    &shared,
    export::ExportOptions {
      dist: &dist,
      shell: &shell,
      bundle: &config.build.bundle,
      site_data: &site_data,
      html_hooks: &html_hooks,
      rate: config.build.output_file_rate,
      progress: !dev,
    },
  )
  .await?;
  ui::detail_ok(&format!("{} pages, {}", summary.pages, ui::format_size(summary.bytes)));
  ui::blank();

  // [6/6] Write site artifacts
  ui::step(6, 6, "Writing site artifacts");
  let route_info = codegen::route_info_json(&records)?;
  let route_info_path = dist.join("routeInfo.json");
  std::fs::write(&route_info_path, &route_info)
    .with_context(|| format!("failed to write {}", route_info_path.display()))?;
  ui::detail_ok("routeInfo.json");

  let module =
    codegen::route_table_module(&table, &config.router, config.site.base_path.as_deref())?;
  let module_path = dist.join("routeTable.js");
  std::fs::write(&module_path, &module)
    .with_context(|| format!("failed to write {}", module_path.display()))?;
  ui::detail_ok("routeTable.js");

  if config.build.sitemap {
    match &config.site.root {
      Some(root) => {
        let entries = sitemap_entries(&normalized.routes, root);
        let sitemap_path = dist.join("sitemap.xml");
        std::fs::write(&sitemap_path, generate_sitemap_xml(&entries))
          .with_context(|| format!("failed to write {}", sitemap_path.display()))?;
        ui::detail_ok(&format!("sitemap.xml ({} urls)", entries.len()));
      }
      None => ui::detail(&format!("{YELLOW}site.root not set, skipping sitemap{RESET}")),
    }
  }

  let copied = assets::copy_public_dir(&base_dir.join(&config.paths.public_dir), &dist)?;
  if copied.files > 0 {
    ui::detail_ok(&format!("{} public files, {}", copied.files, ui::format_size(copied.bytes)));
  }
  ui::blank();

  let elapsed = started.elapsed().as_secs_f64();
  ui::ok(&format!("build complete in {elapsed:.1}s"));
  ui::detail(&format!(
    "{} routes \u{00b7} {} templates \u{00b7} {} shared blobs \u{00b7} {}",
    normalized.routes.len(),
    registry.count(),
    shared.len(),
    config.paths.dist_dir,
  ));

  Ok(())
}

fn load_site_data(base_dir: &Path, config: &StanzaConfig) -> Result<Value> {
  match &config.site.data_file {
    Some(file) => {
      let path = base_dir.join(file);
      let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
      serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
    None => Ok(Value::Null),
  }
}
