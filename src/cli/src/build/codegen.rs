/* src/cli/src/build/codegen.rs */

// Generated client artifacts: the route-table JS module consumed by the
// bundle, and the routeInfo.json index the runtime uses for data lookups
// after hydration.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use stanza_core::data::RouteExportRecord;
use stanza_core::table::{NOT_FOUND_PATH, RouteTable};

use crate::config::RouterSection;

/// Emit the route-table module: template registry, path segment tree, and
/// a resolver with the 404 fallback baked in.
pub fn route_table_module(
  table: &RouteTable,
  router: &RouterSection,
  base_path: Option<&str>,
) -> Result<String> {
  let templates = serde_json::to_string(&table.templates)?;
  let tree = serde_json::to_string(&table.to_segment_tree())?;
  let not_found = match table.template_id_for_path(NOT_FOUND_PATH) {
    Some(id) => id.to_string(),
    None => "null".to_string(),
  };
  let config = json!({
    "prefetchRate": router.prefetch_rate,
    "minLoadTimeMs": router.min_load_time_ms,
    "scrollDurationMs": router.scroll_duration_ms,
    "basePath": base_path.unwrap_or(""),
  });

  Ok(format!(
    r#"// Generated by stanza. Do not edit.
export const templates = {templates};
export const routeTree = {tree};
export const notFoundTemplate = {not_found};
export const routerConfig = {config};

export function resolvePath(path) {{
  const segments = path.split("/").filter(Boolean);
  let node = routeTree;
  if (segments.length === 0) {{
    node = (node.c || {{}})["/"];
  }} else {{
    for (const segment of segments) {{
      node = node && (node.c || {{}})[segment];
    }}
  }}
  return node && node.t != null
    ? {{ templateID: node.t, notFound: false }}
    : notFound();
}}

function notFound() {{
  return notFoundTemplate != null ? {{ templateID: notFoundTemplate, notFound: true }} : null;
}}
"#
  ))
}

/// Serialize the path -> propsMap index. Only routes with data appear;
/// the runtime treats an absent path as "nothing to fetch".
pub fn route_info_json(records: &[RouteExportRecord]) -> Result<String> {
  let mut index: BTreeMap<&str, &BTreeMap<String, String>> = BTreeMap::new();
  for record in records {
    if record.has_data() {
      index.insert(&record.path, &record.props_map);
    }
  }
  Ok(serde_json::to_string(&index)?)
}
