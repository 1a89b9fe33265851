/* src/cli/src/dev.rs */

// `stanza dev` command: rebuild on change. Watches the routes file, the
// templates and public directories, and the document shell; filesystem
// events are debounced so editor save bursts trigger one rebuild.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::signal;

use crate::build::run_build;
use crate::config::StanzaConfig;
use crate::ui::{self, CYAN, RED, RESET};

const DEBOUNCE: Duration = Duration::from_millis(200);

fn setup_watcher() -> Result<(RecommendedWatcher, tokio::sync::mpsc::Receiver<()>)> {
  let (tx, rx) = tokio::sync::mpsc::channel(16);
  let watcher = RecommendedWatcher::new(
    move |res: std::result::Result<notify::Event, notify::Error>| {
      if res.is_ok() {
        let _ = tx.blocking_send(());
      }
    },
    notify::Config::default(),
  )?;
  Ok((watcher, rx))
}

pub async fn run_dev(config: &StanzaConfig, base_dir: &Path) -> Result<()> {
  ui::banner("dev");

  if let Err(err) = run_build(config, base_dir, true).await {
    ui::fail(&format!("{RED}initial build failed{RESET}: {err:#}"));
  }

  let (mut watcher, mut rx) = setup_watcher()?;
  watch_existing(&mut watcher, &base_dir.join(&config.paths.routes), RecursiveMode::NonRecursive)?;
  watch_existing(
    &mut watcher,
    &base_dir.join(&config.paths.templates_dir),
    RecursiveMode::Recursive,
  )?;
  watch_existing(&mut watcher, &base_dir.join(&config.paths.public_dir), RecursiveMode::Recursive)?;
  if let Some(document) = &config.paths.document {
    watch_existing(&mut watcher, &base_dir.join(document), RecursiveMode::NonRecursive)?;
  }

  ui::arrow(&format!("watching for changes {CYAN}(ctrl-c to stop){RESET}"));

  loop {
    tokio::select! {
      event = rx.recv() => {
        if event.is_none() {
          return Ok(());
        }
        // Drain the burst before rebuilding.
        loop {
          match tokio::time::timeout(DEBOUNCE, rx.recv()).await {
            Ok(Some(())) => continue,
            Ok(None) => return Ok(()),
            Err(_) => break,
          }
        }
        ui::blank();
        ui::arrow("change detected, rebuilding");
        if let Err(err) = run_build(config, base_dir, true).await {
          ui::fail(&format!("{RED}rebuild failed{RESET}: {err:#}"));
        }
      }
      _ = signal::ctrl_c() => {
        ui::blank();
        ui::ok("dev mode stopped");
        return Ok(());
      }
    }
  }
}

fn watch_existing(watcher: &mut RecommendedWatcher, path: &Path, mode: RecursiveMode) -> Result<()> {
  if path.exists() {
    watcher.watch(path, mode).with_context(|| format!("failed to watch {}", path.display()))?;
  }
  Ok(())
}
