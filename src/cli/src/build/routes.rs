/* src/cli/src/build/routes.rs */

// Loads the route declaration file into the core route forest. Inline
// `data` objects and `data_file` references both become async data
// loaders; files are read relative to the project base directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use stanza_core::data::{DataLoader, JsonMap};
use stanza_core::errors::BuildError;
use stanza_core::route::RouteNode;

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSpec {
  pub path: Option<String>,
  pub template: Option<String>,
  #[serde(default)]
  pub children: Vec<RouteSpec>,
  #[serde(default, rename = "is404")]
  pub is_404: bool,
  pub noindex: Option<bool>,
  /// Legacy spelling, accepted with a warning during normalization.
  #[serde(rename = "noIndex")]
  pub no_index_legacy: Option<bool>,
  pub data: Option<JsonMap>,
  pub data_file: Option<String>,
}

/// Read and parse the routes file into the declared route forest.
pub fn load_routes(base_dir: &Path, routes_file: &str) -> Result<Vec<RouteNode>> {
  let path = base_dir.join(routes_file);
  let content =
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
  let specs: Vec<RouteSpec> = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse {}", path.display()))?;
  Ok(specs.iter().map(|spec| to_route_node(spec, base_dir)).collect())
}

fn to_route_node(spec: &RouteSpec, base_dir: &Path) -> RouteNode {
  RouteNode {
    path: spec.path.clone(),
    template: spec.template.clone(),
    children: spec.children.iter().map(|c| to_route_node(c, base_dir)).collect(),
    is_404: spec.is_404,
    noindex: spec.noindex,
    no_index_legacy: spec.no_index_legacy,
    get_data: make_loader(spec, base_dir),
  }
}

fn make_loader(spec: &RouteSpec, base_dir: &Path) -> Option<DataLoader> {
  if let Some(data) = &spec.data {
    let data = data.clone();
    let loader: DataLoader = Arc::new(move |_ctx| {
      let data = data.clone();
      Box::pin(async move { Ok(data) })
    });
    return Some(loader);
  }
  if let Some(file) = &spec.data_file {
    let path: PathBuf = base_dir.join(file);
    let loader: DataLoader = Arc::new(move |ctx| {
      let path = path.clone();
      Box::pin(async move { load_data_file(&path, &ctx.route).await })
    });
    return Some(loader);
  }
  None
}

async fn load_data_file(path: &Path, route: &str) -> Result<JsonMap, BuildError> {
  let content = tokio::fs::read_to_string(path).await.map_err(|e| {
    BuildError::data_resolution(route, format!("failed to read {}: {e}", path.display()))
  })?;
  let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
    BuildError::data_resolution(route, format!("failed to parse {}: {e}", path.display()))
  })?;
  match value {
    serde_json::Value::Object(map) => Ok(map),
    _ => Err(BuildError::data_resolution(
      route,
      format!("{} must contain a JSON object", path.display()),
    )),
  }
}
