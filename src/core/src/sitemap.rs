/* src/core/src/sitemap.rs */

//! Sitemap XML generation from the normalized route list.

use crate::paths::path_join;
use crate::route::NormalizedRoute;
use crate::table::NOT_FOUND_PATH;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
  pub loc: String,
  pub lastmod: Option<String>,
  pub priority: f32,
}

/// Collect sitemap entries for the indexable routes. Noindex routes and
/// the 404 route are skipped; everything else gets an absolute location
/// built from the site root.
pub fn sitemap_entries(routes: &[NormalizedRoute], site_root: &str) -> Vec<SitemapEntry> {
  routes
    .iter()
    .filter(|route| !route.noindex && !route.is_404 && route.path != NOT_FOUND_PATH)
    .map(|route| SitemapEntry {
      loc: absolute_loc(site_root, &route.path),
      lastmod: None,
      priority: 0.5,
    })
    .collect()
}

fn absolute_loc(site_root: &str, path: &str) -> String {
  let joined = path_join([site_root, path]);
  // Keep the root page's trailing slash so the loc stays a valid URL.
  if path == "/" && !joined.ends_with('/') {
    return format!("{joined}/");
  }
  joined
}

/// Serialize entries into a `urlset` sitemap document.
pub fn generate_sitemap_xml(entries: &[SitemapEntry]) -> String {
  let mut xml = String::new();
  xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
  xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
  for entry in entries {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
    if let Some(lastmod) = &entry.lastmod {
      xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
    }
    xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
    xml.push_str("  </url>\n");
  }
  xml.push_str("</urlset>\n");
  xml
}

fn escape_xml(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(c),
    }
  }
  out
}
