//! `mushaf` — command-line access to the offline reader's local store.
//!
//! # Usage
//!
//! ```text
//! mushaf docs catalog
//! mushaf docs show 1
//! mushaf bookmarks add 2 255 --note "ayat al-kursi"
//! mushaf prefs set --font-size 20 --transliteration true
//! mushaf --store /tmp/mushaf.db info
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use commands::{Command, MushafLibrary};
use mushaf_core::{
  library::Library,
  source::{DirectorySource, FallbackSource},
};
use mushaf_store_sqlite::{SharedStore, StoreOptions};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mushaf", version, about = "Offline store for the word-by-word reader")]
struct Cli {
  /// Path to a TOML config file (store_path, bundle_dir).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// SQLite file holding the local store.
  #[arg(long, value_name = "FILE", global = true)]
  store: Option<PathBuf>,

  /// Directory of exported documents to fetch from.
  #[arg(long, value_name = "DIR", global = true)]
  bundle: Option<PathBuf>,

  /// Log debug output to stderr.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  // CLI flags override the config file and environment.
  let mut cfg = settings::load(cli.config.as_deref())?;
  if let Some(store) = cli.store {
    cfg.store_path = settings::expand_tilde(&store);
  }
  if let Some(bundle) = cli.bundle {
    cfg.bundle_dir = settings::expand_tilde(&bundle);
  }

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }

  let shared = SharedStore::new(StoreOptions::file(&cfg.store_path));
  let store = shared
    .get()
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?
    .clone();

  tracing::debug!(store = ?cfg.store_path, bundle = ?cfg.bundle_dir, "store ready");

  let library: MushafLibrary =
    Library::new(store, FallbackSource::new(DirectorySource::new(cfg.bundle_dir)));

  commands::run(cli.command, &library).await
}
