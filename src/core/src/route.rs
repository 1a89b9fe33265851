/* src/core/src/route.rs */

//! Route tree normalization: flattens the user-declared route forest into
//! a deterministic, duplicate-checked, path-keyed list.

use crate::data::DataLoader;
use crate::errors::BuildError;
use crate::paths::path_join;
use crate::table::NOT_FOUND_PATH;

/// A user-declared route. `path` is relative to the parent unless absolute.
#[derive(Clone, Default)]
pub struct RouteNode {
  pub path: Option<String>,
  /// Identifier of the renderable template (file path or registry name).
  pub template: Option<String>,
  pub children: Vec<RouteNode>,
  pub is_404: bool,
  pub noindex: Option<bool>,
  /// Legacy `noIndex` spelling, accepted with a warning.
  pub no_index_legacy: Option<bool>,
  pub get_data: Option<DataLoader>,
}

impl RouteNode {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: Some(path.into()), ..Self::default() }
  }

  pub fn with_template(mut self, template: impl Into<String>) -> Self {
    self.template = Some(template.into());
    self
  }

  pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
    self.children = children;
    self
  }

  pub fn not_found() -> Self {
    Self { is_404: true, ..Self::default() }
  }
}

/// A route after normalization. Immutable once the list is handed to the
/// exporter or serialized for the client router.
#[derive(Clone)]
pub struct NormalizedRoute {
  /// Fully joined, slash-cleaned path. Unique key into the route table.
  pub path: String,
  /// The path as declared, pre-join.
  pub original_path: String,
  /// Path of the parent route, for join context only.
  pub parent_path: Option<String>,
  pub template: Option<String>,
  pub is_404: bool,
  pub noindex: bool,
  pub has_data: bool,
  pub get_data: Option<DataLoader>,
}

impl std::fmt::Debug for NormalizedRoute {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NormalizedRoute")
      .field("path", &self.path)
      .field("original_path", &self.original_path)
      .field("is_404", &self.is_404)
      .field("noindex", &self.noindex)
      .field("has_data", &self.has_data)
      .finish_non_exhaustive()
  }
}

/// Tree-mode output node: normalization result with nesting preserved.
#[derive(Debug, Clone)]
pub struct NormalizedTreeNode {
  pub route: NormalizedRoute,
  pub children: Vec<NormalizedTreeNode>,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
  /// Also produce the nested tree alongside the flat list.
  pub tree: bool,
  /// Append a synthetic 404 route when none is declared.
  pub force_404: bool,
  pub disable_duplicate_warning: bool,
}

impl Default for NormalizeOptions {
  fn default() -> Self {
    Self { tree: false, force_404: true, disable_duplicate_warning: false }
  }
}

#[derive(Debug)]
pub struct Normalized {
  /// Flat list: parents before children, siblings in declaration order,
  /// duplicates dropped (first occurrence wins), 404 last when synthetic.
  pub routes: Vec<NormalizedRoute>,
  /// Present only in tree mode.
  pub tree: Option<Vec<NormalizedTreeNode>>,
  pub warnings: Vec<String>,
}

/// Flatten a route forest into the canonical route list.
///
/// Paths join parent-to-child, `noindex` inherits from the parent when
/// unset, and a missing path on a non-404 route is a fatal configuration
/// error. The output order is deterministic: identical input forests always
/// produce identical sequences.
pub fn normalize_routes(
  nodes: &[RouteNode],
  opts: NormalizeOptions,
) -> Result<Normalized, BuildError> {
  let mut flat: Vec<NormalizedRoute> = Vec::new();
  let mut warnings: Vec<String> = Vec::new();

  let mut tree_roots = Vec::new();
  for node in nodes {
    let tree_node = recurse(node, "/", false, &mut flat, &mut warnings)?;
    tree_roots.push(tree_node);
  }

  // Duplicate-path detection: first occurrence wins.
  let mut deduped: Vec<NormalizedRoute> = Vec::with_capacity(flat.len());
  for route in flat {
    if let Some(_first) = deduped.iter().find(|d| d.path == route.path) {
      if !opts.disable_duplicate_warning {
        warnings.push(format!("more than one route is defined for path: {}", route.path));
      }
      continue;
    }
    deduped.push(route);
  }

  if opts.force_404 && !deduped.iter().any(|r| r.is_404) {
    deduped.push(NormalizedRoute {
      path: NOT_FOUND_PATH.to_string(),
      original_path: NOT_FOUND_PATH.to_string(),
      parent_path: None,
      template: None,
      is_404: true,
      noindex: true,
      has_data: false,
      get_data: None,
    });
  }

  let tree = opts.tree.then_some(tree_roots);
  Ok(Normalized { routes: deduped, tree, warnings })
}

fn recurse(
  node: &RouteNode,
  parent_path: &str,
  parent_noindex: bool,
  flat: &mut Vec<NormalizedRoute>,
  warnings: &mut Vec<String>,
) -> Result<NormalizedTreeNode, BuildError> {
  let own_path = node.path.as_deref().unwrap_or("");
  if own_path.is_empty() && !node.is_404 {
    return Err(BuildError::configuration(format!(
      "no path defined for route under \"{parent_path}\""
    )));
  }

  let path = if node.is_404 {
    NOT_FOUND_PATH.to_string()
  } else {
    path_join([parent_path, own_path])
  };

  let mut noindex = node.noindex;
  if let Some(legacy) = node.no_index_legacy {
    warnings
      .push(format!("route {path} is using 'noIndex', did you mean 'noindex'?"));
    noindex = noindex.or(Some(legacy));
  }
  let noindex = noindex.unwrap_or(parent_noindex);

  let normalized = NormalizedRoute {
    path: path.clone(),
    original_path: own_path.to_string(),
    parent_path: (parent_path != path).then(|| parent_path.to_string()),
    template: node.template.clone(),
    is_404: node.is_404,
    noindex,
    has_data: node.get_data.is_some(),
    get_data: node.get_data.clone(),
  };

  // Parents land before children, siblings in declaration order.
  flat.push(normalized.clone());

  let mut children = Vec::with_capacity(node.children.len());
  for child in &node.children {
    children.push(recurse(child, &path, noindex, flat, warnings)?);
  }

  Ok(NormalizedTreeNode { route: normalized, children })
}
