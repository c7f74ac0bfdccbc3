//! Factry bot surface: reply payloads, curation command handlers, the
//! inbound-message listener, seed data, and configuration.
//!
//! Nothing here talks to a chat platform directly. Handlers consume plain
//! values (message text, author identity, command options) and return
//! [`reply::Reply`] payloads for whatever transport is wired in; the bundled
//! binary wires a local console session.

pub mod commands;
pub mod console;
pub mod listener;
pub mod reply;
pub mod seed;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Bot configuration, read from `config.toml` and `FACTRY_*` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Path of the SQLite store file.
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Optional directory of per-category fact files merged into the seed data
  /// at startup: one `<category>.txt` per category, one fact per line.
  #[serde(default)]
  pub categories_dir: Option<PathBuf>,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("memory.sqlite3")
}

impl Default for BotConfig {
  fn default() -> Self {
    Self { store_path: default_store_path(), categories_dir: None }
  }
}

impl BotConfig {
  /// Load configuration from `path` (not required to exist) merged with the
  /// `FACTRY_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("FACTRY"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise BotConfig")
  }
}
