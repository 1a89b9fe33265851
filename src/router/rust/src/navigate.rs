/* src/router/rust/src/navigate.rs */

//! Navigation lifecycle as a pure state machine. Every intent gets a
//! monotonically increasing generation number; async completions carry
//! their generation back, and only the latest one is allowed to commit.

/// What the host must do to satisfy a navigation intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
  pub generation: u64,
  pub path: String,
  /// Template ID to mount, already resolved (404 fallback included).
  pub template_id: Option<usize>,
  pub not_found: bool,
  /// True when route props are already assembled and the host can
  /// commit synchronously without fetching.
  pub ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
  /// The completion was current and the transition commits.
  Commit,
  /// A newer intent superseded this one; drop the result.
  Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
  Idle,
  Loading { generation: u64, path: String },
}

pub struct Navigator {
  generation: u64,
  state: State,
  current_path: Option<String>,
}

impl Default for Navigator {
  fn default() -> Self {
    Self { generation: 0, state: State::Idle, current_path: None }
  }
}

impl Navigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current_path(&self) -> Option<&str> {
    self.current_path.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    matches!(self.state, State::Loading { .. })
  }

  /// Register a new navigation intent. Any in-flight load becomes stale
  /// immediately.
  pub fn begin(&mut self, path: &str, template_id: Option<usize>, not_found: bool, ready: bool) -> NavigationPlan {
    self.generation += 1;
    let plan = NavigationPlan {
      generation: self.generation,
      path: path.to_string(),
      template_id,
      not_found,
      ready,
    };
    if ready {
      self.state = State::Idle;
      self.current_path = Some(path.to_string());
    } else {
      self.state = State::Loading { generation: self.generation, path: path.to_string() };
    }
    plan
  }

  /// Report that the async load for `generation` finished. Stale
  /// generations never commit, even if they finish last.
  pub fn complete(&mut self, generation: u64) -> NavigationOutcome {
    match &self.state {
      State::Loading { generation: current, path } if *current == generation => {
        self.current_path = Some(path.clone());
        self.state = State::Idle;
        NavigationOutcome::Commit
      }
      _ => NavigationOutcome::Stale,
    }
  }

  /// Report that the async load for `generation` failed. The navigator
  /// returns to idle only if the failure belongs to the current intent.
  pub fn fail(&mut self, generation: u64) -> NavigationOutcome {
    match &self.state {
      State::Loading { generation: current, .. } if *current == generation => {
        self.state = State::Idle;
        NavigationOutcome::Commit
      }
      _ => NavigationOutcome::Stale,
    }
  }
}
