/* src/core/src/errors.rs */

use std::fmt;

/// Fatal build error classes. Anything of this type aborts the export;
/// duplicate-route reports are warnings and never reach this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Invalid route/config declaration. Raised before any export I/O.
  Configuration,
  /// A route's data loader failed.
  DataResolution,
  /// A template render failed.
  Render,
  /// A write to the dist directory failed. Partial output is not servable.
  Io,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Configuration => "configuration error",
      Self::DataResolution => "data resolution error",
      Self::Render => "render error",
      Self::Io => "io error",
    }
  }
}

#[derive(Debug)]
pub struct BuildError {
  kind: ErrorKind,
  message: String,
  /// Originating route path, when the failure is attributable to one.
  route: Option<String>,
}

impl BuildError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into(), route: None }
  }

  pub fn configuration(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Configuration, msg)
  }

  pub fn data_resolution(route: impl Into<String>, msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::DataResolution, msg).for_route(route)
  }

  pub fn render(route: impl Into<String>, msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Render, msg).for_route(route)
  }

  pub fn io(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Io, msg)
  }

  pub fn for_route(mut self, route: impl Into<String>) -> Self {
    self.route = Some(route.into());
    self
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn route(&self) -> Option<&str> {
    self.route.as_deref()
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.route {
      Some(route) => write!(f, "{} [route {route}]: {}", self.kind.as_str(), self.message),
      None => write!(f, "{}: {}", self.kind.as_str(), self.message),
    }
  }
}

impl std::error::Error for BuildError {}

impl From<std::io::Error> for BuildError {
  fn from(err: std::io::Error) -> Self {
    Self::io(err.to_string())
  }
}

impl From<serde_json::Error> for BuildError {
  fn from(err: serde_json::Error) -> Self {
    Self::io(format!("json serialization failed: {err}"))
  }
}
