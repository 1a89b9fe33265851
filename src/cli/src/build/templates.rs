/* src/cli/src/build/templates.rs */

// Template registry: maps the template identifiers named by routes to
// renderable slot templates loaded from the templates directory.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use stanza_core::document::{DEFAULT_DOCUMENT, SlotTemplate};
use stanza_core::route::NormalizedRoute;

#[derive(Debug)]
pub struct TemplateRegistry {
  templates: BTreeMap<String, Arc<SlotTemplate>>,
}

impl TemplateRegistry {
  /// Load every template identifier referenced by the route list from
  /// `<templates_dir>/<name>.html`. An unresolvable reference is fatal
  /// before any export I/O happens.
  pub fn load(base_dir: &Path, templates_dir: &str, routes: &[NormalizedRoute]) -> Result<Self> {
    let dir = base_dir.join(templates_dir);
    let mut templates = BTreeMap::new();
    for route in routes {
      let Some(name) = &route.template else { continue };
      if templates.contains_key(name) {
        continue;
      }
      let file = dir.join(format!("{name}.html"));
      if !file.is_file() {
        bail!("template \"{name}\" (route {}) not found at {}", route.path, file.display());
      }
      let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      templates.insert(name.clone(), Arc::new(SlotTemplate::new(source)));
    }
    Ok(Self { templates })
  }

  pub fn get(&self, name: &str) -> Option<Arc<SlotTemplate>> {
    self.templates.get(name).cloned()
  }

  pub fn count(&self) -> usize {
    self.templates.len()
  }
}

/// Read the configured document shell, falling back to the built-in one.
pub fn load_document_shell(base_dir: &Path, document: Option<&str>) -> Result<String> {
  match document {
    Some(file) => {
      let path = base_dir.join(file);
      std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
    }
    None => Ok(DEFAULT_DOCUMENT.to_string()),
  }
}
