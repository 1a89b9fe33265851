/* src/core/src/document.rs */

//! Template rendering contract and final document assembly.
//!
//! The head side channel is an explicit part of the render result: every
//! render returns its own `HeadMeta` alongside the HTML string, so
//! concurrent renders never share a collection slot.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::data::JsonMap;
use crate::errors::BuildError;
use crate::escape::{ascii_escape_json, escape_script_content};

/// Document-head metadata produced synchronously by a render.
#[derive(Debug, Clone, Default)]
pub struct HeadMeta {
  pub title: Option<String>,
  /// Raw `<meta>`/`<link>`/`<style>` tag strings, emitted in order.
  pub tags: Vec<String>,
}

/// Context injected into every template render.
pub struct RenderContext<'a> {
  pub path: &'a str,
  pub props_map: &'a BTreeMap<String, String>,
  /// Fully resolved route data (shared and local fields merged).
  pub data: &'a JsonMap,
  pub site_data: &'a Value,
}

pub struct RenderOutput {
  pub html: String,
  pub head: HeadMeta,
}

/// The renderable unit associated with one or more routes.
pub trait Template: Send + Sync {
  fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderOutput, BuildError>;
}

// -- Built-in slot template --

/// HTML template with `<!--stanza:field-->` slots resolved against route
/// data (dot paths supported) and an optional `<stanza-head>` block that
/// becomes the render's head metadata.
#[derive(Debug)]
pub struct SlotTemplate {
  source: String,
}

impl SlotTemplate {
  pub fn new(source: impl Into<String>) -> Self {
    Self { source: source.into() }
  }
}

impl Template for SlotTemplate {
  fn render(&self, ctx: &RenderContext<'_>) -> Result<RenderOutput, BuildError> {
    let (head_block, body) = split_head_block(&self.source);
    let head = head_block.map(parse_head_meta).unwrap_or_default();
    let html = fill_slots(body, ctx);
    Ok(RenderOutput { html, head })
  }
}

/// Extract the `<stanza-head>...</stanza-head>` block, returning
/// `(block_content, remaining_html)`.
fn split_head_block(source: &str) -> (Option<&str>, &str) {
  let Some(start) = source.find("<stanza-head>") else { return (None, source) };
  let content_start = start + "<stanza-head>".len();
  let Some(end_rel) = source[content_start..].find("</stanza-head>") else {
    return (None, source);
  };
  let content = &source[content_start..content_start + end_rel];
  let body_start = content_start + end_rel + "</stanza-head>".len();
  (Some(content), source[body_start..].trim_start_matches('\n'))
}

fn parse_head_meta(block: &str) -> HeadMeta {
  let mut head = HeadMeta::default();
  for line in block.lines().map(str::trim) {
    if line.is_empty() {
      continue;
    }
    if let Some(inner) = line.strip_prefix("<title>").and_then(|r| r.strip_suffix("</title>")) {
      head.title = Some(inner.trim().to_string());
    } else {
      head.tags.push(line.to_string());
    }
  }
  head
}

fn fill_slots(body: &str, ctx: &RenderContext<'_>) -> String {
  let mut out = String::with_capacity(body.len());
  let mut rest = body;
  while let Some(start) = rest.find("<!--stanza:") {
    out.push_str(&rest[..start]);
    let after = &rest[start + "<!--stanza:".len()..];
    let Some(end) = after.find("-->") else {
      out.push_str(&rest[start..]);
      return out;
    };
    let slot = after[..end].trim();
    if let Some(value) = resolve_slot(slot, ctx) {
      out.push_str(&escape_html(&stringify(&value)));
    }
    rest = &after[end + "-->".len()..];
  }
  out.push_str(rest);
  out
}

fn resolve_slot(slot: &str, ctx: &RenderContext<'_>) -> Option<Value> {
  match slot {
    "path" => Some(Value::String(ctx.path.to_string())),
    _ => {
      if let Some(field) = slot.strip_prefix("site.") {
        return resolve_path(field, ctx.site_data).cloned();
      }
      let (first, rest) = slot.split_once('.').map_or((slot, None), |(a, b)| (a, Some(b)));
      let root = ctx.data.get(first)?;
      match rest {
        Some(path) => resolve_path(path, root).cloned(),
        None => Some(root.clone()),
      }
    }
  }
}

fn resolve_path<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
  let mut current = data;
  for key in path.split('.') {
    current = current.get(key)?;
  }
  Some(current)
}

fn stringify(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

pub fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

// -- Document assembly --

/// Bootstrap payload inlined into every exported page, assigned to a
/// global before the client bundle script tag.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapPayload<'a> {
  pub path: &'a str,
  #[serde(rename = "templateID")]
  pub template_id: Option<usize>,
  #[serde(rename = "propsMap")]
  pub props_map: &'a BTreeMap<String, String>,
  #[serde(rename = "localData")]
  pub local_data: &'a JsonMap,
  #[serde(rename = "siteData")]
  pub site_data: &'a Value,
}

/// Default document shell used when the project does not supply one.
pub const DEFAULT_DOCUMENT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<!--stanza:head-->
</head>
<body>
<div id="root"><!--stanza:app--></div>
<!--stanza:scripts-->
</body>
</html>
"#;

pub struct DocumentParts<'a> {
  pub shell: &'a str,
  pub render: &'a RenderOutput,
  pub payload: &'a BootstrapPayload<'a>,
  /// Client bundle entry filename, referenced relative to the site root.
  pub bundle: &'a str,
}

/// Assemble the final HTML document: interpolate head metadata, inline
/// the app HTML and the escaped bootstrap payload. Post-processing such
/// as base-path prefixing runs through the caller's hook chain.
pub fn assemble_document(parts: &DocumentParts<'_>) -> Result<String, BuildError> {
  let head = &parts.render.head;
  let mut head_html = String::new();
  if let Some(title) = &head.title {
    head_html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
  }
  for tag in &head.tags {
    head_html.push_str(tag);
    head_html.push('\n');
  }

  let json = serde_json::to_string(parts.payload)?;
  let escaped = escape_script_content(&ascii_escape_json(&json));
  let scripts = format!(
    "<script>window.__routeData = {escaped};</script>\n<script defer src=\"/{}\"></script>",
    parts.bundle
  );

  Ok(
    parts
      .shell
      .replacen("<!--stanza:head-->", head_html.trim_end(), 1)
      .replacen("<!--stanza:app-->", &parts.render.html, 1)
      .replacen("<!--stanza:scripts-->", &scripts, 1),
  )
}

/// Prefix root-relative `href="/..."` and `src="/..."` attributes with
/// the base path. Protocol-relative (`//`) URLs are left alone.
pub fn prefix_root_relative(html: &str, base_path: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut rest = html;
  loop {
    let next = ["href=\"/", "href='/", "src=\"/", "src='/"]
      .iter()
      .filter_map(|p| rest.find(p).map(|i| (i, *p)))
      .min_by_key(|(i, _)| *i);
    let Some((idx, pat)) = next else {
      out.push_str(rest);
      return out;
    };
    let after = idx + pat.len();
    // Skip protocol-relative URLs.
    if rest[after..].starts_with('/') {
      out.push_str(&rest[..after]);
      rest = &rest[after..];
      continue;
    }
    out.push_str(&rest[..idx]);
    out.push_str(&pat[..pat.len() - 1]);
    out.push_str(base_path);
    out.push('/');
    rest = &rest[after..];
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn ctx<'a>(
    path: &'a str,
    props_map: &'a BTreeMap<String, String>,
    data: &'a JsonMap,
    site: &'a Value,
  ) -> RenderContext<'a> {
    RenderContext { path, props_map, data, site_data: site }
  }

  #[test]
  fn slot_template_fills_fields() {
    let tpl = SlotTemplate::new("<h1><!--stanza:title--></h1><p><!--stanza:post.body--></p>");
    let props = BTreeMap::new();
    let mut data = JsonMap::new();
    data.insert("title".into(), json!("Hello & welcome"));
    data.insert("post".into(), json!({"body": "text"}));
    let site = json!({});
    let out = tpl.render(&ctx("/x", &props, &data, &site)).unwrap();
    assert_eq!(out.html, "<h1>Hello &amp; welcome</h1><p>text</p>");
  }

  #[test]
  fn slot_template_path_and_site() {
    let tpl = SlotTemplate::new("<!--stanza:path--> of <!--stanza:site.name-->");
    let props = BTreeMap::new();
    let data = JsonMap::new();
    let site = json!({"name": "Example"});
    let out = tpl.render(&ctx("/about", &props, &data, &site)).unwrap();
    assert_eq!(out.html, "/about of Example");
  }

  #[test]
  fn missing_slot_renders_empty() {
    let tpl = SlotTemplate::new("[<!--stanza:nope-->]");
    let props = BTreeMap::new();
    let data = JsonMap::new();
    let site = json!({});
    let out = tpl.render(&ctx("/", &props, &data, &site)).unwrap();
    assert_eq!(out.html, "[]");
  }

  #[test]
  fn head_block_extracted() {
    let tpl = SlotTemplate::new(
      "<stanza-head>\n<title>My Page</title>\n<meta name=\"description\" content=\"d\">\n</stanza-head>\n<main>body</main>",
    );
    let props = BTreeMap::new();
    let data = JsonMap::new();
    let site = json!({});
    let out = tpl.render(&ctx("/", &props, &data, &site)).unwrap();
    assert_eq!(out.head.title.as_deref(), Some("My Page"));
    assert_eq!(out.head.tags, vec!["<meta name=\"description\" content=\"d\">"]);
    assert_eq!(out.html, "<main>body</main>");
  }

  #[test]
  fn assemble_inlines_payload_and_head() {
    let props: BTreeMap<String, String> = [("x".to_string(), "abc".to_string())].into();
    let local = JsonMap::new();
    let site = json!({"name": "s"});
    let payload = BootstrapPayload {
      path: "/p",
      template_id: Some(1),
      props_map: &props,
      local_data: &local,
      site_data: &site,
    };
    let render = RenderOutput {
      html: "<p>app</p>".to_string(),
      head: HeadMeta { title: Some("T".to_string()), tags: vec![] },
    };
    let parts = DocumentParts {
      shell: DEFAULT_DOCUMENT,
      render: &render,
      payload: &payload,
      bundle: "app.js",
    };
    let html = assemble_document(&parts).unwrap();
    assert!(html.contains("<title>T</title>"));
    assert!(html.contains("<p>app</p>"));
    assert!(html.contains("window.__routeData = "));
    assert!(html.contains("\"templateID\":1"));
    assert!(html.contains("src=\"/app.js\""));
  }

  #[test]
  fn payload_script_close_is_escaped() {
    let props = BTreeMap::new();
    let mut local = JsonMap::new();
    local.insert("html".into(), json!("</script>"));
    let site = Value::Null;
    let payload = BootstrapPayload {
      path: "/",
      template_id: None,
      props_map: &props,
      local_data: &local,
      site_data: &site,
    };
    let render = RenderOutput { html: String::new(), head: HeadMeta::default() };
    let parts = DocumentParts {
      shell: DEFAULT_DOCUMENT,
      render: &render,
      payload: &payload,
      bundle: "app.js",
    };
    let html = assemble_document(&parts).unwrap();
    assert!(!html.contains("</script><script>alert"));
    assert!(html.contains(r"<\/script>"));
  }

  #[test]
  fn base_path_prefixes_absolute_refs() {
    let html = r#"<a href="/about">x</a><img src="/img.png"><a href="//cdn.example/x">y</a>"#;
    let out = prefix_root_relative(html, "https://example.com");
    assert!(out.contains(r#"href="https://example.com/about""#));
    assert!(out.contains(r#"src="https://example.com/img.png""#));
    assert!(out.contains(r#"href="//cdn.example/x""#));
  }
}
