//! `greetbook`: terminal client for the greetbook greeting wall.
//!
//! # Usage
//!
//! ```
//! greetbook --url http://localhost:8080
//! greetbook --view moderate --user moderator --password secret
//! greetbook --config ~/.config/greetbook/config.toml --log-file /tmp/greetbook.log
//! ```

mod app;
mod client;
mod identity;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::{App, Screen};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use identity::GoogleIdentity;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum View {
  Submit,
  Moderate,
  Gallery,
}

#[derive(Parser, Debug)]
#[command(name = "greetbook", about = "Terminal client for the greetbook greeting wall")]
struct Args {
  /// Path to a TOML config file (url, username, password, google_token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the greetbook server (default: http://localhost:8080).
  #[arg(long, env = "GREETBOOK_URL")]
  url: Option<String>,

  /// Moderator username.
  #[arg(long, env = "GREETBOOK_USER")]
  user: Option<String>,

  /// Moderator password (plaintext).
  #[arg(long, env = "GREETBOOK_PASSWORD")]
  password: Option<String>,

  /// Google OAuth access token for signing in with Google.
  #[arg(long, env = "GREETBOOK_GOOGLE_TOKEN")]
  google_token: Option<String>,

  /// View to open on start.
  #[arg(long, value_enum, default_value = "submit")]
  view: View,

  /// Write logs to this file.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  username:     String,
  #[serde(default)]
  password:     String,
  #[serde(default)]
  google_token: String,
}

/// Flag value if given, else the config file value if non-empty.
fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_string()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Logging goes to a file; stderr would corrupt the alternate screen.
  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };
  let google_token = pick(args.google_token, &file_cfg.google_token);

  tracing::info!(url = %api_config.base_url, "starting greetbook client");
  let client = ApiClient::new(api_config).context("building HTTP client")?;
  let google = GoogleIdentity::new(google_token).context("building Google client")?;
  let mut app = App::new(client, google, Utc::now());

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let initial = match args.view {
    View::Submit => Screen::Identify,
    View::Moderate => Screen::Moderate,
    View::Gallery => Screen::Gallery,
  };
  app.enter(initial).await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick(Utc::now());
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting. The short
    // timeout keeps the gallery rotation and success banner moving.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if key.kind != event::KeyEventKind::Press {
        continue;
      }
      if !app.handle_key(key).await? {
        break;
      }
    }
  }

  Ok(())
}
