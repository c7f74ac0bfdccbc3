//! factry bot binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, seeds the built-in categories, and runs an
//! interactive console session on stdin. Lines starting with `/` are
//! curation commands; everything else is matched against the stored
//! triggers.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use factry_bot::{BotConfig, console, listener, listener::InboundMessage, seed};
use factry_store_sqlite::SqliteStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fun-fact trigger bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = BotConfig::load(&cli.config).context("failed to load config")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&cfg.store_path);

  // Open the store. A schema failure here is fatal.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  seed::seed_store(&store, cfg.categories_dir.as_deref())
    .await
    .context("failed to seed store")?;

  tracing::info!("ready; type a message, or /list_triggers to explore");

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    if line.trim().is_empty() {
      continue;
    }

    match console::parse_command(&line) {
      Some(Ok(command)) => {
        let reply =
          console::dispatch(&store, console::CONSOLE_AUTHOR, command).await;
        println!("{}", console::render(&reply));
      }
      Some(Err(usage)) => println!("{usage}"),
      None => {
        let message = InboundMessage {
          content:       line,
          author_id:     console::CONSOLE_AUTHOR.to_owned(),
          author_is_bot: false,
        };
        if let Some(reply) = listener::on_message(&store, &message).await {
          println!("{}", console::render(&reply));
        }
      }
    }
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
