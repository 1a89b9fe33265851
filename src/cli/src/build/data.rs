/* src/cli/src/build/data.rs */

// Concurrent data resolution. Every route loader runs as its own task;
// all of them must finish before partitioning starts, and the first
// failure aborts the rest (partial data would skew the shared-value
// counts for every sibling route).

use anyhow::{Result, anyhow};
use tokio::task::JoinSet;

use stanza_core::data::{GetDataCtx, JsonMap};
use stanza_core::errors::BuildError;
use stanza_core::route::NormalizedRoute;

/// Resolve all route data loaders. Returns `(path, data)` pairs in route
/// order; routes without a loader contribute an empty map.
pub async fn resolve_all(routes: &[NormalizedRoute], dev: bool) -> Result<Vec<(String, JsonMap)>> {
  let mut set: JoinSet<(usize, Result<JsonMap, BuildError>)> = JoinSet::new();
  for (index, route) in routes.iter().enumerate() {
    let Some(loader) = route.get_data.clone() else { continue };
    let ctx = GetDataCtx { route: route.path.clone(), dev };
    set.spawn(async move { (index, loader(ctx).await) });
  }

  let mut resolved: Vec<(String, JsonMap)> =
    routes.iter().map(|r| (r.path.clone(), JsonMap::new())).collect();

  while let Some(joined) = set.join_next().await {
    let (index, result) = joined.map_err(|e| anyhow!("data loader task panicked: {e}"))?;
    match result {
      Ok(data) => resolved[index].1 = data,
      Err(err) => {
        set.abort_all();
        return Err(err.into());
      }
    }
  }

  Ok(resolved)
}
