/* src/core/src/paths.rs */

//! Path string utilities shared by the normalizer, the exporter, and the
//! client router. Pure functions, no I/O.

/// Which slash cleanups [`clean_slashes`] applies. All on by default.
#[derive(Debug, Clone, Copy)]
pub struct CleanSlashes {
  pub leading: bool,
  pub trailing: bool,
  pub double: bool,
}

impl Default for CleanSlashes {
  fn default() -> Self {
    Self { leading: true, trailing: true, double: true }
  }
}

/// True iff the string starts with a URI scheme prefix
/// (`letter (letter|digit|+|.|-)* :`).
pub fn is_absolute_url(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() => {}
    _ => return false,
  }
  for c in chars {
    if c == ':' {
      return true;
    }
    if !(c.is_ascii_alphanumeric() || c == '+' || c == '.' || c == '-') {
      return false;
    }
  }
  false
}

pub fn trim_leading_slashes(s: &str) -> &str {
  s.trim_start_matches('/')
}

pub fn trim_trailing_slashes(s: &str) -> &str {
  s.trim_end_matches('/')
}

/// Collapse runs of `/` to a single `/`. For absolute URLs only the path
/// portion is collapsed; the `scheme://` separator is left alone.
pub fn trim_double_slashes(s: &str) -> String {
  if is_absolute_url(s) {
    if let Some((scheme, rest)) = s.split_once("://") {
      return format!("{scheme}://{}", collapse_slashes(rest));
    }
  }
  collapse_slashes(s)
}

fn collapse_slashes(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_slash = false;
  for c in s.chars() {
    if c == '/' {
      if !prev_slash {
        out.push(c);
      }
      prev_slash = true;
    } else {
      out.push(c);
      prev_slash = false;
    }
  }
  out
}

pub fn clean_slashes(s: &str, opts: CleanSlashes) -> String {
  if s.is_empty() {
    return String::new();
  }
  let mut cleaned = s.to_string();
  if opts.leading {
    cleaned = trim_leading_slashes(&cleaned).to_string();
  }
  if opts.trailing {
    cleaned = trim_trailing_slashes(&cleaned).to_string();
  }
  if opts.double {
    cleaned = trim_double_slashes(&cleaned);
  }
  cleaned
}

/// Join path segments with single `/` separators. The result never carries
/// a trailing slash (unless it is exactly `/`) and is truncated at the
/// first `?` -- query strings never survive a join.
pub fn path_join<I, S>(segments: I) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let parts: Vec<String> = segments.into_iter().map(|s| s.as_ref().to_string()).collect();
  let mut joined = trim_double_slashes(&parts.join("/"));
  if let Some(pos) = joined.find('?') {
    joined.truncate(pos);
  }
  if joined.is_empty() {
    return "/".to_string();
  }
  if joined != "/" {
    joined = trim_trailing_slashes(&joined).to_string();
  }
  joined
}

/// Force a leading `/` on relative paths; absolute URLs pass through.
pub fn make_path_absolute(path: &str) -> String {
  if is_absolute_url(path) {
    return path.to_string();
  }
  format!("/{}", trim_leading_slashes(path))
}
