/* src/cli/src/build/export.rs */

// Static export: renders every normalized route and writes its HTML and
// data files under the dist directory. Routes export through a bounded
// concurrent pool; the first failure aborts the whole pool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow};
use futures_util::stream::{self, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use stanza_core::data::{JsonMap, RouteExportRecord, SharedDataEntry};
use stanza_core::document::{
  BootstrapPayload, DocumentParts, HeadMeta, RenderContext, RenderOutput, SlotTemplate, Template,
  assemble_document,
};
use stanza_core::hooks::HookChain;
use stanza_core::route::NormalizedRoute;
use stanza_core::table::NOT_FOUND_PATH;

use super::templates::TemplateRegistry;

pub struct ExportOptions<'a> {
  pub dist: &'a Path,
  pub shell: &'a str,
  pub bundle: &'a str,
  pub site_data: &'a Value,
  /// Post-processing applied to every assembled document, in order.
  pub html_hooks: &'a HookChain<String>,
  /// Cap on concurrently exported routes.
  pub rate: usize,
  pub progress: bool,
}

pub struct ExportSummary {
  pub pages: usize,
  pub bytes: u64,
}

struct ExportJob {
  route: NormalizedRoute,
  record: RouteExportRecord,
  data: JsonMap,
  template: Option<Arc<SlotTemplate>>,
}

/// Export every route. `records` and `resolved` are in route order, as
/// produced by data resolution and partitioning.
pub async fn export_routes(
  routes: &[NormalizedRoute],
  records: &[RouteExportRecord],
  resolved: &[(String, JsonMap)],
  registry: &TemplateRegistry,
  shared: &BTreeMap<String, SharedDataEntry>,
  opts: ExportOptions<'_>,
) -> Result<ExportSummary> {
  write_shared_data(opts.dist, shared).await?;

  let mut jobs = Vec::with_capacity(routes.len());
  for ((route, record), (_, data)) in routes.iter().zip(records).zip(resolved) {
    let template = match &route.template {
      Some(name) => Some(
        registry
          .get(name)
          .ok_or_else(|| anyhow!("template \"{name}\" not registered (route {})", route.path))?,
      ),
      None => None,
    };
    jobs.push(ExportJob {
      route: route.clone(),
      record: record.clone(),
      data: data.clone(),
      template,
    });
  }

  let bar = if opts.progress {
    let bar = ProgressBar::new(jobs.len() as u64);
    bar.set_style(
      ProgressStyle::with_template("        {bar:30} {pos}/{len} pages").unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Some(bar)
  } else {
    None
  };

  let bytes = AtomicU64::new(0);
  let pages = jobs.len();
  stream::iter(jobs.into_iter().map(Ok::<_, anyhow::Error>))
    .try_for_each_concurrent(opts.rate, |job| {
      let bar = bar.clone();
      let bytes = &bytes;
      let opts = &opts;
      async move {
        let written = export_one(&job, opts).await?;
        bytes.fetch_add(written, Ordering::Relaxed);
        if let Some(bar) = &bar {
          bar.inc(1);
        }
        Ok(())
      }
    })
    .await?;

  if let Some(bar) = bar {
    bar.finish_and_clear();
  }
  Ok(ExportSummary { pages, bytes: bytes.load(Ordering::Relaxed) })
}

async fn export_one(job: &ExportJob, opts: &ExportOptions<'_>) -> Result<u64> {
  let render = render_route(job, opts.site_data)?;
  let payload = BootstrapPayload {
    path: &job.route.path,
    template_id: job.record.template_id,
    props_map: &job.record.props_map,
    local_data: &job.record.local_data,
    site_data: opts.site_data,
  };
  let parts = DocumentParts {
    shell: opts.shell,
    render: &render,
    payload: &payload,
    bundle: opts.bundle,
  };
  let html = opts.html_hooks.run(assemble_document(&parts)?)?;

  let html_path = html_output_path(opts.dist, &job.route);
  if let Some(parent) = html_path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  tokio::fs::write(&html_path, &html)
    .await
    .with_context(|| format!("failed to write {}", html_path.display()))?;
  let mut written = html.len() as u64;

  if job.record.local_hash.is_some() {
    let dir = route_dir(opts.dist, &job.route.path);
    tokio::fs::create_dir_all(&dir)
      .await
      .with_context(|| format!("failed to create {}", dir.display()))?;
    let data_path = dir.join("routeData.json");
    let serialized = job.record.serialized_local()?;
    tokio::fs::write(&data_path, &serialized)
      .await
      .with_context(|| format!("failed to write {}", data_path.display()))?;
    written += serialized.len() as u64;
  }

  Ok(written)
}

fn render_route(job: &ExportJob, site_data: &Value) -> Result<RenderOutput> {
  match &job.template {
    Some(template) => {
      let ctx = RenderContext {
        path: &job.route.path,
        props_map: &job.record.props_map,
        data: &job.data,
        site_data,
      };
      Ok(template.render(&ctx)?)
    }
    // A synthetic 404 has no declared template; a minimal page keeps the
    // output complete instead of leaving a dead link.
    None if job.route.is_404 => Ok(RenderOutput {
      html: "<h1>404 - Not Found</h1>".to_string(),
      head: HeadMeta { title: Some("404 - Not Found".to_string()), tags: Vec::new() },
    }),
    None => Err(anyhow!("route {} has no template", job.route.path)),
  }
}

/// `<dist>/<path>/index.html`, except the 404 route which becomes
/// `<dist>/404.html` so static hosts pick it up.
fn html_output_path(dist: &Path, route: &NormalizedRoute) -> PathBuf {
  if route.is_404 || route.path == NOT_FOUND_PATH {
    return dist.join("404.html");
  }
  route_dir(dist, &route.path).join("index.html")
}

fn route_dir(dist: &Path, path: &str) -> PathBuf {
  let trimmed = path.trim_start_matches('/');
  if trimmed.is_empty() { dist.to_path_buf() } else { dist.join(trimmed) }
}

async fn write_shared_data(dist: &Path, shared: &BTreeMap<String, SharedDataEntry>) -> Result<()> {
  if shared.is_empty() {
    return Ok(());
  }
  let dir = dist.join("staticData");
  tokio::fs::create_dir_all(&dir)
    .await
    .with_context(|| format!("failed to create {}", dir.display()))?;
  for entry in shared.values() {
    let path = dir.join(format!("{}.json", entry.hash));
    tokio::fs::write(&path, &entry.serialized)
      .await
      .with_context(|| format!("failed to write {}", path.display()))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use stanza_core::data::partition_route_data;
  use stanza_core::document::DEFAULT_DOCUMENT;
  use stanza_core::route::{NormalizeOptions, RouteNode, normalize_routes};
  use stanza_core::table::RouteTable;

  fn project(dir: &Path, names: &[&str]) -> TemplateRegistry {
    let templates = dir.join("templates");
    std::fs::create_dir_all(&templates).unwrap();
    for name in names {
      std::fs::write(
        templates.join(format!("{name}.html")),
        format!("<main>{name}: <!--stanza:title--></main>"),
      )
      .unwrap();
    }
    let routes: Vec<NormalizedRoute> = names
      .iter()
      .map(|n| NormalizedRoute {
        path: format!("/{n}"),
        original_path: format!("/{n}"),
        parent_path: None,
        template: Some((*n).to_string()),
        is_404: false,
        noindex: false,
        has_data: false,
        get_data: None,
      })
      .collect();
    TemplateRegistry::load(dir, "templates", &routes).unwrap()
  }

  async fn run_export(dir: &Path, rate: usize) -> (Vec<NormalizedRoute>, ExportSummary) {
    let forest = vec![
      RouteNode::new("/").with_template("home"),
      RouteNode::new("about").with_template("page"),
      RouteNode::new("blog").with_template("page").with_children(vec![
        RouteNode::new("post-1").with_template("page"),
      ]),
    ];
    let normalized = normalize_routes(&forest, NormalizeOptions::default()).unwrap();
    let table = RouteTable::build(&normalized.routes);
    let resolved: Vec<(String, JsonMap)> = normalized
      .routes
      .iter()
      .map(|r| {
        let mut data = JsonMap::new();
        if !r.is_404 {
          data.insert("title".into(), json!(r.path.clone()));
          data.insert("menu".into(), json!(["home", "about", "blog"]));
        }
        (r.path.clone(), data)
      })
      .collect();
    let (shared, records) = partition_route_data(&resolved, &table).unwrap();

    let registry = project(dir, &["home", "page"]);
    let dist = dir.join("dist");
    let hooks = HookChain::new();
    let opts = ExportOptions {
      dist: &dist,
      shell: DEFAULT_DOCUMENT,
      bundle: "app.js",
      site_data: &Value::Null,
      html_hooks: &hooks,
      rate,
      progress: false,
    };
    let summary =
      export_routes(&normalized.routes, &records, &resolved, &registry, &shared, opts)
        .await
        .unwrap();
    (normalized.routes, summary)
  }

  #[tokio::test]
  async fn exports_every_route_at_any_pool_size() {
    for rate in [1, 8] {
      let dir = tempfile::tempdir().unwrap();
      let (routes, summary) = run_export(dir.path(), rate).await;
      assert_eq!(summary.pages, routes.len());

      let dist = dir.path().join("dist");
      assert!(dist.join("index.html").is_file());
      assert!(dist.join("about/index.html").is_file());
      assert!(dist.join("blog/index.html").is_file());
      assert!(dist.join("blog/post-1/index.html").is_file());
      assert!(dist.join("404.html").is_file());
      assert!(!dist.join("404/index.html").exists());
    }
  }

  #[tokio::test]
  async fn shared_and_local_data_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    run_export(dir.path(), 4).await;

    let dist = dir.path().join("dist");
    let shared_files: Vec<_> = std::fs::read_dir(dist.join("staticData"))
      .unwrap()
      .map(|e| e.unwrap().file_name())
      .collect();
    // "menu" is identical across all data routes; "title" is unique per
    // route and stays local.
    assert_eq!(shared_files.len(), 1);
    let local: Value =
      serde_json::from_str(&std::fs::read_to_string(dist.join("about/routeData.json")).unwrap())
        .unwrap();
    assert_eq!(local, json!({"title": "/about"}));
  }

  #[tokio::test]
  async fn pages_embed_bootstrap_payload() {
    let dir = tempfile::tempdir().unwrap();
    run_export(dir.path(), 4).await;

    let html = std::fs::read_to_string(dir.path().join("dist/about/index.html")).unwrap();
    assert!(html.contains("window.__routeData = "));
    assert!(html.contains("\"path\":\"/about\""));
    assert!(html.contains("<main>page: /about</main>"));
    assert!(html.contains("src=\"/app.js\""));
  }
}
