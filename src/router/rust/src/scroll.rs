/* src/router/rust/src/scroll.rs */

//! Scroll decisions for route transitions. The host owns the DOM; this
//! module only decides what to do, including the one-shot suppression
//! used when a caller wants a transition without the scroll reset.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollAction {
  None,
  /// Animated scroll to the top of the document.
  ToTop { duration_ms: u32 },
  /// Scroll to the element with this id. `retry_on_missing` tells the
  /// host to re-check on subsequent frames until the element mounts.
  ToHash { id: String, retry_on_missing: bool },
}

pub struct ScrollController {
  autoscroll_on_load: bool,
  autoscroll_on_transition: bool,
  scroll_duration_ms: u32,
  suppress_next: bool,
}

impl ScrollController {
  pub fn new(autoscroll_on_load: bool, autoscroll_on_transition: bool, scroll_duration_ms: u32) -> Self {
    Self { autoscroll_on_load, autoscroll_on_transition, scroll_duration_ms, suppress_next: false }
  }

  /// Skip the scroll reset for the next transition only.
  pub fn suppress_next(&mut self) {
    self.suppress_next = true;
  }

  /// Decide the scroll for the initial page load. The browser already
  /// restored its own position, so only a hash fragment acts, and it
  /// retries until hydration mounts the target element.
  pub fn on_initial_load(&mut self, hash: Option<&str>) -> ScrollAction {
    if !self.autoscroll_on_load {
      return ScrollAction::None;
    }
    match normalize_hash(hash) {
      Some(id) => ScrollAction::ToHash { id, retry_on_missing: true },
      None => ScrollAction::None,
    }
  }

  /// Decide the scroll for a client-side transition.
  pub fn on_transition(&mut self, hash: Option<&str>) -> ScrollAction {
    if self.suppress_next {
      self.suppress_next = false;
      return ScrollAction::None;
    }
    if let Some(id) = normalize_hash(hash) {
      // The destination template may still be mounting when the
      // transition commits, so hash targets retry like on initial load.
      return ScrollAction::ToHash { id, retry_on_missing: true };
    }
    if self.autoscroll_on_transition {
      ScrollAction::ToTop { duration_ms: self.scroll_duration_ms }
    } else {
      ScrollAction::None
    }
  }
}

impl Default for ScrollController {
  fn default() -> Self {
    Self::new(true, true, 300)
  }
}

fn normalize_hash(hash: Option<&str>) -> Option<String> {
  let id = hash?.trim_start_matches('#');
  if id.is_empty() { None } else { Some(id.to_string()) }
}
