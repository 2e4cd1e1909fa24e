//! Layered configuration for the `mushaf` binary.
//!
//! Built-in defaults, then an optional TOML file, then `MUSHAF_*` environment
//! variables (`MUSHAF_STORE_PATH`, `MUSHAF_BUNDLE_DIR`). Command-line flags are
//! applied on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime configuration, deserialised from the layered sources.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite file holding the local store.
  pub store_path: PathBuf,
  /// Directory of exported documents used as the document source.
  pub bundle_dir: PathBuf,
}

/// `~/.config/mushaf/config.toml`.
pub fn default_config_path() -> PathBuf {
  expand_tilde(Path::new("~/.config/mushaf/config.toml"))
}

fn default_data_dir() -> PathBuf { expand_tilde(Path::new("~/.local/share/mushaf")) }

pub fn load(file: Option<&Path>) -> anyhow::Result<CliConfig> {
  let file = file.map(Path::to_path_buf).unwrap_or_else(default_config_path);
  let data_dir = default_data_dir();

  let settings = config::Config::builder()
    .set_default("store_path", data_dir.join("mushaf.db").to_string_lossy().into_owned())?
    .set_default("bundle_dir", data_dir.join("bundle").to_string_lossy().into_owned())?
    .add_source(config::File::from(file).required(false))
    .add_source(config::Environment::with_prefix("MUSHAF"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: CliConfig = settings
    .try_deserialize()
    .context("failed to deserialise CliConfig")?;

  cfg.store_path = expand_tilde(&cfg.store_path);
  cfg.bundle_dir = expand_tilde(&cfg.bundle_dir);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
