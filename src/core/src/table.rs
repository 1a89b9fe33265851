/* src/core/src/table.rs */

//! The route table: deduplicated template registry plus path-to-template
//! resolution. Serialized at build time and consumed verbatim by the
//! client runtime so both sides resolve paths identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::paths::path_join;
use crate::route::NormalizedRoute;

/// Path key of the fallback not-found route.
pub const NOT_FOUND_PATH: &str = "404";

/// Template identifier registered for a 404 route declared without its
/// own template. The exporter renders the built-in not-found page under
/// this identifier and the client bundle maps it to its own fallback
/// component, so server and client tables stay identical and path
/// resolution always has a 404 to land on.
pub const BUILTIN_NOT_FOUND_TEMPLATE: &str = "stanza:404";

/// Result of resolving a location against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
  pub template_id: usize,
  /// True when the path had no registered template and the 404 template
  /// was substituted.
  pub not_found: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
  /// Template identifiers in first-seen order; index = templateID.
  pub templates: Vec<String>,
  pub template_ids_by_path: BTreeMap<String, usize>,
}

impl RouteTable {
  /// Build the table from the normalized route list. Template IDs are
  /// assigned in first-seen order across the list, so table construction
  /// is deterministic for a deterministic route order.
  pub fn build(routes: &[NormalizedRoute]) -> Self {
    let mut templates: Vec<String> = Vec::new();
    let mut template_ids_by_path = BTreeMap::new();

    for route in routes {
      let template = match route.template.as_deref() {
        Some(template) => template,
        None if route.is_404 => BUILTIN_NOT_FOUND_TEMPLATE,
        None => continue,
      };
      let id = match templates.iter().position(|t| t == template) {
        Some(id) => id,
        None => {
          templates.push(template.to_string());
          templates.len() - 1
        }
      };
      template_ids_by_path.insert(route.path.clone(), id);
    }

    Self { templates, template_ids_by_path }
  }

  pub fn template_id_for_path(&self, path: &str) -> Option<usize> {
    self.template_ids_by_path.get(&normalize_lookup(path)).copied()
  }

  pub fn template_name(&self, id: usize) -> Option<&str> {
    self.templates.get(id).map(String::as_str)
  }

  /// Resolve a location to a template, substituting the 404 template for
  /// unknown paths. Returns `None` only when no 404 template exists --
  /// callers must treat that as a hard failure, never a blank render.
  pub fn resolve(&self, path: &str) -> Option<Resolution> {
    if let Some(template_id) = self.template_id_for_path(path) {
      let not_found = normalize_lookup(path) == NOT_FOUND_PATH;
      return Some(Resolution { template_id, not_found });
    }
    self
      .template_ids_by_path
      .get(NOT_FOUND_PATH)
      .map(|&template_id| Resolution { template_id, not_found: true })
  }

  /// Nested segment tree (`{c: {segment: ...}, t: templateID}`) for the
  /// generated client route-table module.
  pub fn to_segment_tree(&self) -> Value {
    let mut root = TreeNode::default();
    for (path, &id) in &self.template_ids_by_path {
      let segments: Vec<&str> =
        if path == "/" { vec!["/"] } else { path.split('/').filter(|s| !s.is_empty()).collect() };
      let mut cursor = &mut root;
      for segment in segments {
        cursor = cursor.children.entry(segment.to_string()).or_default();
      }
      cursor.template_id = Some(id);
    }
    root.to_value()
  }
}

#[derive(Default)]
struct TreeNode {
  template_id: Option<usize>,
  children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
  fn to_value(&self) -> Value {
    let mut obj = serde_json::Map::new();
    if let Some(id) = self.template_id {
      obj.insert("t".to_string(), json!(id));
    }
    if !self.children.is_empty() {
      let children: serde_json::Map<String, Value> =
        self.children.iter().map(|(k, v)| (k.clone(), v.to_value())).collect();
      obj.insert("c".to_string(), Value::Object(children));
    }
    Value::Object(obj)
  }
}

fn normalize_lookup(path: &str) -> String {
  if path.is_empty() {
    return "/".to_string();
  }
  path_join([path])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::route::{NormalizeOptions, RouteNode, normalize_routes};

  fn build_table(nodes: Vec<RouteNode>) -> RouteTable {
    let normalized = normalize_routes(&nodes, NormalizeOptions::default()).unwrap();
    RouteTable::build(&normalized.routes)
  }

  fn sample() -> RouteTable {
    build_table(vec![
      RouteNode::new("/").with_template("pages/home.html"),
      RouteNode::new("/about").with_template("pages/about.html"),
      RouteNode::new("/blog")
        .with_template("pages/blog.html")
        .with_children(vec![RouteNode::new("/post-1").with_template("pages/post.html")]),
      RouteNode::not_found().with_template("pages/404.html"),
    ])
  }

  #[test]
  fn template_ids_in_first_seen_order() {
    let table = sample();
    assert_eq!(
      table.templates,
      vec!["pages/home.html", "pages/about.html", "pages/blog.html", "pages/post.html",
           "pages/404.html"]
    );
    assert_eq!(table.template_id_for_path("/"), Some(0));
    assert_eq!(table.template_id_for_path("/blog/post-1"), Some(3));
  }

  #[test]
  fn shared_template_reuses_id() {
    let table = build_table(vec![
      RouteNode::new("/a").with_template("pages/doc.html"),
      RouteNode::new("/b").with_template("pages/doc.html"),
    ]);
    assert_eq!(table.templates, vec!["pages/doc.html", BUILTIN_NOT_FOUND_TEMPLATE]);
    assert_eq!(table.template_id_for_path("/a"), table.template_id_for_path("/b"));
  }

  #[test]
  fn resolve_known_path() {
    let table = sample();
    let r = table.resolve("/about").unwrap();
    assert!(!r.not_found);
    assert_eq!(table.template_name(r.template_id), Some("pages/about.html"));
  }

  #[test]
  fn resolve_trailing_slash() {
    let table = sample();
    assert_eq!(table.resolve("/about/"), table.resolve("/about"));
  }

  #[test]
  fn resolve_unknown_falls_back_to_404() {
    let table = sample();
    let r = table.resolve("/missing").unwrap();
    assert!(r.not_found);
    assert_eq!(table.template_name(r.template_id), Some("pages/404.html"));
  }

  #[test]
  fn synthetic_404_registers_builtin_template() {
    let table = build_table(vec![RouteNode::new("/").with_template("pages/home.html")]);
    let r = table.resolve("/missing").unwrap();
    assert!(r.not_found);
    assert_eq!(table.template_name(r.template_id), Some(BUILTIN_NOT_FOUND_TEMPLATE));
  }

  #[test]
  fn resolve_without_404_is_none() {
    let nodes = vec![RouteNode::new("/").with_template("pages/home.html")];
    let opts = NormalizeOptions { force_404: false, ..Default::default() };
    let normalized = normalize_routes(&nodes, opts).unwrap();
    let table = RouteTable::build(&normalized.routes);
    assert_eq!(table.resolve("/missing"), None);
  }

  #[test]
  fn segment_tree_shape() {
    let table = sample();
    let tree = table.to_segment_tree();
    assert_eq!(tree["c"]["/"]["t"], 0);
    assert_eq!(tree["c"]["blog"]["t"], 2);
    assert_eq!(tree["c"]["blog"]["c"]["post-1"]["t"], 3);
    assert_eq!(tree["c"]["404"]["t"], 4);
  }

  #[test]
  fn serializes_round_trip() {
    let table = sample();
    let json = serde_json::to_string(&table).unwrap();
    let back: RouteTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
  }
}
