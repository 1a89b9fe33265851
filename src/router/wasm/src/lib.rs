/* src/router/wasm/src/lib.rs */

use wasm_bindgen::prelude::*;

use serde_json::Value;
use stanza_core::table::RouteTable;
use stanza_router::{
  Bootstrap, ClientRegistry, Navigator, PrefetchQueue, Priority, RouteProps, ScrollAction,
  ScrollController,
};

#[wasm_bindgen]
pub struct Router {
  registry: ClientRegistry,
  navigator: Navigator,
  prefetch: PrefetchQueue,
  scroll: ScrollController,
}

#[wasm_bindgen]
impl Router {
  /// `route_table_json` is the serialized route table the exporter
  /// embeds in the route-table module; `prefetch_rate` caps concurrent
  /// prefetch fetches.
  #[wasm_bindgen(constructor)]
  pub fn new(route_table_json: &str, prefetch_rate: usize) -> Result<Router, JsError> {
    let table: RouteTable = serde_json::from_str(route_table_json)?;
    Ok(Router {
      registry: ClientRegistry::new(table),
      navigator: Navigator::new(),
      prefetch: PrefetchQueue::new(prefetch_rate),
      scroll: ScrollController::default(),
    })
  }

  /// Seed from the inlined `window.__routeData` payload.
  pub fn ingest_bootstrap(&mut self, payload_json: &str) -> Result<(), JsError> {
    let bootstrap: Bootstrap = serde_json::from_str(payload_json)?;
    self.registry.ingest_bootstrap(&bootstrap);
    Ok(())
  }

  pub fn register_data(&mut self, hash: &str, payload_json: &str) -> Result<(), JsError> {
    let value: Value = serde_json::from_str(payload_json)?;
    self.registry.register_data(hash, value);
    Ok(())
  }

  pub fn register_route_props(&mut self, path: &str, props_json: &str) -> Result<(), JsError> {
    let props: RouteProps = serde_json::from_str(props_json)?;
    self.registry.register_route_props(path, props);
    Ok(())
  }

  /// Begin a navigation. Returns the plan as JSON:
  /// `{generation, path, templateID, notFound, ready}`.
  ///
  /// An unresolvable path with no 404 template registered is a hard
  /// error, never a silent plan without a template.
  pub fn navigate(&mut self, path: &str) -> Result<String, JsError> {
    let resolution = self.registry.resolve_template(path).ok_or_else(|| {
      JsError::new(&format!("no template matches \"{path}\" and no 404 template is registered"))
    })?;
    let ready = self
      .registry
      .route_props(path)
      .map(|props| self.registry.missing_hashes(props).is_empty())
      .unwrap_or(false);
    let plan =
      self.navigator.begin(path, Some(resolution.template_id), resolution.not_found, ready);
    Ok(
      serde_json::json!({
        "generation": plan.generation,
        "path": plan.path,
        "templateID": plan.template_id,
        "notFound": plan.not_found,
        "ready": plan.ready,
      })
      .to_string(),
    )
  }

  /// Report an async load completion. Returns true when the transition
  /// should commit, false when a newer intent superseded it.
  pub fn complete_navigation(&mut self, generation: u64) -> bool {
    self.navigator.complete(generation) == stanza_router::NavigationOutcome::Commit
  }

  pub fn fail_navigation(&mut self, generation: u64) {
    self.navigator.fail(generation);
  }

  /// Assembled route data for a path, or null while fetches are
  /// outstanding.
  pub fn route_data(&self, path: &str) -> String {
    let data = self
      .registry
      .route_props(path)
      .and_then(|props| self.registry.assemble_props(props))
      .map(Value::Object)
      .unwrap_or(Value::Null);
    data.to_string()
  }

  /// `staticData` hashes still missing for a path, as a JSON array.
  pub fn missing_hashes(&self, path: &str) -> String {
    let hashes = self
      .registry
      .route_props(path)
      .map(|props| self.registry.missing_hashes(props))
      .unwrap_or_default();
    serde_json::to_string(&hashes).unwrap_or_else(|_| "[]".to_string())
  }

  pub fn prefetch(&mut self, path: &str, high_priority: bool) {
    let priority = if high_priority { Priority::High } else { Priority::Low };
    self.prefetch.enqueue(path, priority);
  }

  /// Paths to start fetching now, as a JSON array.
  pub fn next_prefetch_batch(&mut self) -> String {
    serde_json::to_string(&self.prefetch.next_batch()).unwrap_or_else(|_| "[]".to_string())
  }

  pub fn prefetch_done(&mut self, path: &str) {
    self.prefetch.mark_done(path);
  }

  pub fn prefetch_failed(&mut self, path: &str) {
    self.prefetch.mark_failed(path);
  }

  pub fn suppress_next_scroll(&mut self) {
    self.scroll.suppress_next();
  }

  /// Scroll decision for the initial load, as JSON:
  /// `{kind: "none"|"top"|"hash", ...}`.
  pub fn scroll_on_load(&mut self, hash: Option<String>) -> String {
    scroll_action_json(self.scroll.on_initial_load(hash.as_deref()))
  }

  pub fn scroll_on_transition(&mut self, hash: Option<String>) -> String {
    scroll_action_json(self.scroll.on_transition(hash.as_deref()))
  }
}

fn scroll_action_json(action: ScrollAction) -> String {
  let value = match action {
    ScrollAction::None => serde_json::json!({ "kind": "none" }),
    ScrollAction::ToTop { duration_ms } => {
      serde_json::json!({ "kind": "top", "durationMs": duration_ms })
    }
    ScrollAction::ToHash { id, retry_on_missing } => {
      serde_json::json!({ "kind": "hash", "id": id, "retryOnMissing": retry_on_missing })
    }
  };
  value.to_string()
}
