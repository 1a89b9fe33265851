/* src/cli/src/clean.rs */

// `stanza clean` command: removes the dist directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::StanzaConfig;
use crate::ui;

pub fn run_clean(config: &StanzaConfig, base_dir: &Path) -> Result<()> {
  ui::arrow("cleaning project");
  let dist = base_dir.join(&config.paths.dist_dir);
  if dist.is_dir() {
    std::fs::remove_dir_all(&dist)
      .with_context(|| format!("failed to remove {}", dist.display()))?;
    ui::detail(&format!("removed {}", config.paths.dist_dir));
  }
  ui::ok("clean complete");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn removes_dist_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stanza.toml"), "[project]\nname = \"site\"\n").unwrap();
    let config =
      crate::config::load_stanza_config(&dir.path().join("stanza.toml")).unwrap();
    let dist = dir.path().join("dist");
    std::fs::create_dir_all(dist.join("blog")).unwrap();
    std::fs::write(dist.join("index.html"), "x").unwrap();

    run_clean(&config, dir.path()).unwrap();
    assert!(!dist.exists());
  }

  #[test]
  fn missing_dist_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stanza.toml"), "[project]\nname = \"site\"\n").unwrap();
    let config =
      crate::config::load_stanza_config(&dir.path().join("stanza.toml")).unwrap();
    run_clean(&config, dir.path()).unwrap();
  }
}
