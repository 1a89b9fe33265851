/* src/core/src/data.rs */

//! Route data partitioning: values reused across routes become shared
//! blobs written once and referenced by content hash; singletons stay
//! local to their route.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::errors::BuildError;
use crate::hash::content_hash;
use crate::table::RouteTable;

pub type BoxFuture<T> = futures_core::future::BoxFuture<'static, T>;

pub type JsonMap = serde_json::Map<String, Value>;

/// Marker in a props map for fields that live in the route's local
/// payload. The same key also carries the local payload hash.
pub const LOCAL_MARKER: &str = "__local";

/// Context handed to every route data loader.
#[derive(Debug, Clone)]
pub struct GetDataCtx {
  pub route: String,
  pub dev: bool,
}

/// Async data-loading contract of a route. Failures abort the export.
pub type DataLoader =
  Arc<dyn Fn(GetDataCtx) -> BoxFuture<Result<JsonMap, BuildError>> + Send + Sync>;

/// One shared data blob, written once under `staticData/<hash>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SharedDataEntry {
  pub hash: String,
  pub serialized: String,
}

/// Per-route output descriptor consumed by the exporter and serialized
/// into `routeInfo.json` for the client runtime.
#[derive(Debug, Clone, Serialize)]
pub struct RouteExportRecord {
  pub path: String,
  pub template_id: Option<usize>,
  /// Field name -> shared hash, or [`LOCAL_MARKER`] for local fields.
  pub props_map: BTreeMap<String, String>,
  pub local_data: JsonMap,
  /// Hash of the serialized local payload, for cache busting. Absent when
  /// the route has no local fields.
  pub local_hash: Option<String>,
}

impl RouteExportRecord {
  pub fn has_data(&self) -> bool {
    !self.props_map.is_empty()
  }

  pub fn serialized_local(&self) -> Result<String, BuildError> {
    Ok(serde_json::to_string(&Value::Object(self.local_data.clone()))?)
  }
}

/// Split resolved route data into shared and local partitions.
///
/// Equality granularity is deep structural equality of JSON values,
/// realized through canonical serialization (object keys are ordered, so
/// identical structures serialize identically). The first pass counts
/// every top-level field value across all routes and must be complete
/// before the second pass partitions -- callers resolve all loaders up
/// front and hand the full result set in.
pub fn partition_route_data(
  resolved: &[(String, JsonMap)],
  table: &RouteTable,
) -> Result<(BTreeMap<String, SharedDataEntry>, Vec<RouteExportRecord>), BuildError> {
  // Pass 1: occurrence counts per distinct value.
  let mut seen: HashMap<String, u32> = HashMap::new();
  for (_, data) in resolved {
    for value in data.values() {
      let key = serde_json::to_string(value)?;
      *seen.entry(key).or_insert(0) += 1;
    }
  }

  // Pass 2: partition per route.
  let mut shared: BTreeMap<String, SharedDataEntry> = BTreeMap::new();
  let mut records = Vec::with_capacity(resolved.len());
  for (path, data) in resolved {
    let mut props_map = BTreeMap::new();
    let mut local_data = JsonMap::new();
    for (field, value) in data {
      let serialized = serde_json::to_string(value)?;
      if seen.get(&serialized).copied().unwrap_or(0) >= 2 {
        let hash = content_hash(&serialized);
        shared.entry(hash.clone()).or_insert_with(|| SharedDataEntry {
          hash: hash.clone(),
          serialized: serialized.clone(),
        });
        props_map.insert(field.clone(), hash);
      } else {
        props_map.insert(field.clone(), LOCAL_MARKER.to_string());
        local_data.insert(field.clone(), value.clone());
      }
    }

    let local_hash = if local_data.is_empty() {
      None
    } else {
      let serialized = serde_json::to_string(&Value::Object(local_data.clone()))?;
      let hash = content_hash(&serialized);
      props_map.insert(LOCAL_MARKER.to_string(), hash.clone());
      Some(hash)
    };

    records.push(RouteExportRecord {
      path: path.clone(),
      template_id: table.template_id_for_path(path),
      props_map,
      local_data,
      local_hash,
    });
  }

  Ok((shared, records))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::route::{NormalizeOptions, RouteNode, normalize_routes};
  use serde_json::json;

  fn map(pairs: &[(&str, Value)]) -> JsonMap {
    pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
  }

  fn table_for(paths: &[&str]) -> RouteTable {
    let nodes: Vec<RouteNode> =
      paths.iter().map(|p| RouteNode::new(*p).with_template(format!("t{p}"))).collect();
    let normalized = normalize_routes(&nodes, NormalizeOptions::default()).unwrap();
    RouteTable::build(&normalized.routes)
  }

  #[test]
  fn shared_value_stored_once() {
    let nav = json!({"items": ["home", "about"]});
    let resolved = vec![
      ("/a".to_string(), map(&[("nav", nav.clone()), ("title", json!("A"))])),
      ("/b".to_string(), map(&[("nav", nav.clone()), ("title", json!("B"))])),
      ("/c".to_string(), map(&[("title", json!("C"))])),
    ];
    let table = table_for(&["/a", "/b", "/c"]);
    let (shared, records) = partition_route_data(&resolved, &table).unwrap();

    assert_eq!(shared.len(), 1);
    let nav_hash = shared.keys().next().unwrap().clone();

    let a = &records[0];
    let b = &records[1];
    let c = &records[2];
    assert_eq!(a.props_map["nav"], nav_hash);
    assert_eq!(b.props_map["nav"], nav_hash);
    assert_eq!(a.props_map["title"], LOCAL_MARKER);
    assert_eq!(c.props_map["title"], LOCAL_MARKER);
    assert!(c.local_data.contains_key("title"));
    assert!(!c.props_map.contains_key("nav"));
  }

  #[test]
  fn structurally_equal_values_deduplicate() {
    // Built independently, still identical in structure.
    let resolved = vec![
      ("/x".to_string(), map(&[("menu", json!({"a": 1, "b": 2}))])),
      ("/y".to_string(), map(&[("menu", json!({"b": 2, "a": 1}))])),
    ];
    let table = table_for(&["/x", "/y"]);
    let (shared, records) = partition_route_data(&resolved, &table).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(records[0].props_map["menu"], records[1].props_map["menu"]);
  }

  #[test]
  fn round_trip_reconstructs_original() {
    let nav = json!(["home", "blog"]);
    let resolved = vec![
      ("/a".to_string(), map(&[("nav", nav.clone()), ("post", json!({"id": 1}))])),
      ("/b".to_string(), map(&[("nav", nav.clone())])),
    ];
    let table = table_for(&["/a", "/b"]);
    let (shared, records) = partition_route_data(&resolved, &table).unwrap();

    // Reconstruct /a the way the client runtime would: shared lookups by
    // hash plus the local payload.
    let a = &records[0];
    let mut reconstructed = JsonMap::new();
    for (field, marker) in &a.props_map {
      if field == LOCAL_MARKER {
        continue;
      }
      if marker == LOCAL_MARKER {
        reconstructed.insert(field.clone(), a.local_data[field].clone());
      } else {
        let entry = &shared[marker];
        reconstructed.insert(field.clone(), serde_json::from_str(&entry.serialized).unwrap());
      }
    }
    assert_eq!(Value::Object(reconstructed), json!({"nav": nav, "post": {"id": 1}}));
  }

  #[test]
  fn no_local_file_when_everything_is_shared() {
    let v = json!("common");
    let resolved = vec![
      ("/a".to_string(), map(&[("v", v.clone())])),
      ("/b".to_string(), map(&[("v", v)])),
    ];
    let table = table_for(&["/a", "/b"]);
    let (_, records) = partition_route_data(&resolved, &table).unwrap();
    assert!(records[0].local_hash.is_none());
    assert!(records[0].local_data.is_empty());
    assert!(!records[0].props_map.contains_key(LOCAL_MARKER));
  }

  #[test]
  fn local_hash_tracks_payload() {
    let resolved = vec![("/a".to_string(), map(&[("only", json!(42))]))];
    let table = table_for(&["/a"]);
    let (shared, records) = partition_route_data(&resolved, &table).unwrap();
    assert!(shared.is_empty());
    let rec = &records[0];
    let hash = rec.local_hash.clone().unwrap();
    assert_eq!(rec.props_map[LOCAL_MARKER], hash);
    assert_eq!(content_hash(&rec.serialized_local().unwrap()), hash);
  }
}
