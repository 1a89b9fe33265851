/* src/cli/src/main.rs */

mod build;
mod clean;
mod config;
mod dev;
mod shell;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use config::{StanzaConfig, find_stanza_config, load_stanza_config};

#[derive(Parser)]
#[command(name = "stanza", about = "Stanza static-site CLI")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Export the site: render every route to static HTML and data files
  Build {
    /// Path to stanza.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Rebuild on change while editing routes, templates, or assets
  Dev {
    /// Path to stanza.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Remove the dist directory
  Clean {
    /// Path to stanza.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

/// Resolve config path (explicit or auto-detected) and parse it
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, StanzaConfig)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_stanza_config(&cwd)?
    }
  };
  let config = load_stanza_config(&path)?;
  Ok((path, config))
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Command::Build { config } => {
      let (config_path, stanza_config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| std::path::Path::new("."));
      build::run_build(&stanza_config, base_dir, false).await?;
    }
    Command::Dev { config } => {
      let (config_path, stanza_config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| std::path::Path::new("."));
      dev::run_dev(&stanza_config, base_dir).await?;
    }
    Command::Clean { config } => {
      let (config_path, stanza_config) = resolve_config(config)?;
      let base_dir = config_path.parent().unwrap_or_else(|| std::path::Path::new("."));
      clean::run_clean(&stanza_config, base_dir)?;
    }
  }

  Ok(())
}
