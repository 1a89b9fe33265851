/* src/core/src/escape.rs */

//! JSON escaping for payloads inlined into HTML `<script>` tags.

/// Escape non-ASCII characters in JSON string values to `\uXXXX`
/// sequences, so the inlined payload survives any document charset.
/// Chars outside the BMP become surrogate pairs.
pub fn ascii_escape_json(json: &str) -> String {
  walk_strings(json, |ch, out| {
    let code = ch as u32;
    if code <= 0x7F {
      return false;
    }
    if code > 0xFFFF {
      let adjusted = code - 0x1_0000;
      let hi = (adjusted >> 10) + 0xD800;
      let lo = (adjusted & 0x3FF) + 0xDC00;
      out.push_str(&format!("\\u{hi:04x}\\u{lo:04x}"));
    } else {
      out.push_str(&format!("\\u{code:04x}"));
    }
    true
  })
}

/// Break `</...` sequences inside JSON string values by escaping the
/// slash (`<\/`), preventing an embedded `</script` from closing the
/// surrounding inline script tag prematurely. `\/` is a legal JSON
/// string escape, so the payload still parses unchanged.
pub fn escape_script_content(json: &str) -> String {
  let mut prev_lt = false;
  walk_strings(json, move |ch, out| {
    if prev_lt && ch == '/' {
      prev_lt = false;
      out.push_str("\\/");
      return true;
    }
    prev_lt = ch == '<';
    false
  })
}

/// Walk JSON text tracking string boundaries (handling `\"` and `\\`),
/// applying `transform` to every char inside a string value. The
/// transform returns true when it consumed the char itself.
fn walk_strings(json: &str, mut transform: impl FnMut(char, &mut String) -> bool) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut chars = json.chars();

  while let Some(ch) = chars.next() {
    if !in_string {
      if ch == '"' {
        in_string = true;
      }
      out.push(ch);
      continue;
    }
    match ch {
      '\\' => {
        // Existing escape: copy both chars untouched.
        out.push(ch);
        if let Some(next) = chars.next() {
          out.push(next);
        }
      }
      '"' => {
        in_string = false;
        out.push(ch);
      }
      _ => {
        if !transform(ch, &mut out) {
          out.push(ch);
        }
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ascii_passthrough() {
    let input = r#"{"key":"hello"}"#;
    assert_eq!(ascii_escape_json(input), input);
  }

  #[test]
  fn escapes_non_ascii_values() {
    let input = "{\"msg\":\"caf\u{e9}\"}";
    assert_eq!(ascii_escape_json(input), r#"{"msg":"caf\u00e9"}"#);
  }

  #[test]
  fn surrogate_pair_outside_bmp() {
    let input = "{\"emoji\":\"\u{1F600}\"}";
    assert_eq!(ascii_escape_json(input), r#"{"emoji":"\ud83d\ude00"}"#);
  }

  #[test]
  fn preserves_existing_escapes() {
    let input = r#"{"a":"line\nbreak","b":"say \"hi\""}"#;
    assert_eq!(ascii_escape_json(input), input);
  }

  #[test]
  fn breaks_script_close() {
    let input = r#"{"html":"</script><script>alert(1)</script>"}"#;
    let escaped = escape_script_content(input);
    assert!(!escaped.contains("</script"));
    let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
    assert_eq!(back["html"], "</script><script>alert(1)</script>");
  }

  #[test]
  fn script_close_outside_strings_untouched() {
    // Not valid JSON, but keys/structure must never be rewritten.
    let input = r#"{"a":1}"#;
    assert_eq!(escape_script_content(input), input);
  }

  #[test]
  fn breaks_any_closing_tag() {
    let escaped = escape_script_content(r#"{"x":"</ScRiPt>"}"#);
    assert_eq!(escaped, r#"{"x":"<\/ScRiPt>"}"#);
  }
}
