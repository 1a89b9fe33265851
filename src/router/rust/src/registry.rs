/* src/router/rust/src/registry.rs */

//! Client-side registry of templates, route table, and data payloads.
//!
//! The registry is explicit state fed by the host: the inlined bootstrap
//! payload seeds the current route, and fetched `staticData` files and
//! `routeInfo.json` entries are registered as they arrive.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use stanza_core::data::{JsonMap, LOCAL_MARKER};
use stanza_core::table::{Resolution, RouteTable};

/// The `window.__routeData` payload inlined into every exported page.
#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
  pub path: String,
  #[serde(rename = "templateID")]
  pub template_id: Option<usize>,
  #[serde(rename = "propsMap", default)]
  pub props_map: BTreeMap<String, String>,
  #[serde(rename = "localData", default)]
  pub local_data: JsonMap,
  #[serde(rename = "siteData", default)]
  pub site_data: Value,
}

/// Per-route data description fetched from `routeInfo.json` entries.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteProps {
  #[serde(rename = "propsMap", default)]
  pub props_map: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct ClientRegistry {
  table: RouteTable,
  site_data: Value,
  /// Shared payloads keyed by content hash, plus local payloads keyed
  /// by their own hash. Both arrive through `register_data`.
  data_by_hash: BTreeMap<String, Value>,
  props_by_path: BTreeMap<String, RouteProps>,
}

impl ClientRegistry {
  pub fn new(table: RouteTable) -> Self {
    Self { table, ..Self::default() }
  }

  /// Seed the registry from the inlined bootstrap payload. The current
  /// route needs no fetches: its props map and local payload are
  /// already in hand.
  pub fn ingest_bootstrap(&mut self, bootstrap: &Bootstrap) {
    self.site_data = bootstrap.site_data.clone();
    if let Some(local_hash) = bootstrap.props_map.get(LOCAL_MARKER) {
      self.data_by_hash.insert(local_hash.clone(), Value::Object(bootstrap.local_data.clone()));
    }
    self
      .props_by_path
      .insert(bootstrap.path.clone(), RouteProps { props_map: bootstrap.props_map.clone() });
  }

  pub fn register_data(&mut self, hash: impl Into<String>, value: Value) {
    self.data_by_hash.insert(hash.into(), value);
  }

  pub fn register_route_props(&mut self, path: impl Into<String>, props: RouteProps) {
    self.props_by_path.insert(path.into(), props);
  }

  pub fn site_data(&self) -> &Value {
    &self.site_data
  }

  pub fn resolve_template(&self, path: &str) -> Option<Resolution> {
    self.table.resolve(path)
  }

  pub fn route_props(&self, path: &str) -> Option<&RouteProps> {
    self.props_by_path.get(path)
  }

  /// Hashes named by a props map that have not been registered yet.
  /// These are the fetches still outstanding. A per-field value equal to
  /// the local marker is not a hash; the field resolves from the local
  /// payload named by the `__local` entry.
  pub fn missing_hashes(&self, props: &RouteProps) -> Vec<String> {
    props
      .props_map
      .values()
      .filter(|hash| hash.as_str() != LOCAL_MARKER && !self.data_by_hash.contains_key(*hash))
      .cloned()
      .collect()
  }

  /// Reassemble the full route data object from registered payloads.
  /// Returns `None` while any referenced payload is missing.
  pub fn assemble_props(&self, props: &RouteProps) -> Option<JsonMap> {
    let local = match props.props_map.get(LOCAL_MARKER) {
      Some(hash) => match self.data_by_hash.get(hash)? {
        Value::Object(map) => Some(map),
        _ => return None,
      },
      None => None,
    };
    let mut data = JsonMap::new();
    for (field, hash) in &props.props_map {
      if field == LOCAL_MARKER {
        continue;
      }
      if hash == LOCAL_MARKER {
        data.insert(field.clone(), local?.get(field)?.clone());
      } else {
        data.insert(field.clone(), self.data_by_hash.get(hash)?.clone());
      }
    }
    Some(data)
  }
}
