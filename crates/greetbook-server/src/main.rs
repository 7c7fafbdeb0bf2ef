//! greetbook-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the greetbook API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `moderator_password_hash`:
//!
//! ```
//! cargo run -p greetbook-server -- --hash-password
//! ```
//!
//! # Legacy import
//!
//! `--import-legacy messages.json` loads an export of the old `messages`
//! collection (a JSON array of `{text, sender, createdAt}`) into the store
//! and exits.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use greetbook_core::legacy::parse_export;
use greetbook_server::{AppState, ServerConfig, auth::AuthConfig};
use greetbook_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "greetbook server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Import a JSON export of legacy messages into the store and exit.
  #[arg(long, value_name = "FILE")]
  import_legacy: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise logging.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Hash a password and exit.
  if cli.hash_password {
    println!("{}", hash_password(&read_password()?)?);
    return Ok(());
  }

  // Load configuration.
  let server_cfg = load_config(cli.config)?;

  // Open the store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Import legacy messages and exit.
  if let Some(path) = cli.import_legacy {
    return import_legacy(&store, &path, &server_cfg.recipient).await;
  }

  // Build the router and serve.
  let state = AppState {
    store:  Arc::new(store),
    auth:   Arc::new(AuthConfig {
      username:      server_cfg.moderator_username.clone(),
      password_hash: server_cfg.moderator_password_hash.clone(),
    }),
    config: Arc::new(server_cfg.clone()),
  };
  let app = greetbook_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(recipient = %server_cfg.recipient, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Merge the config file (if present) with `GREETBOOK_*` environment
/// variables.
fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("GREETBOOK"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Argon2 PHC string for `password`, for `moderator_password_hash`.
fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))
}

async fn import_legacy(
  store: &SqliteStore,
  path: &Path,
  recipient: &str,
) -> anyhow::Result<()> {
  let json = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {path:?}"))?;
  let messages = parse_export(&json)
    .with_context(|| format!("failed to parse legacy export {path:?}"))?;
  let total = messages.len();
  let imported = store
    .import_legacy(messages, recipient)
    .await
    .context("legacy import failed")?;
  tracing::info!(
    imported,
    not_imported = total - imported,
    "legacy import finished"
  );
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
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
