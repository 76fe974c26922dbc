//! Deskbook server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and serves the reservation API over HTTP.
//!
//! # Registering spaces
//!
//! The catalog is normally filled by the floor-plan editor. For a fresh
//! database, spaces can be added from the command line:
//!
//! ```text
//! deskbook add-space --map <MAP_UUID> --name "Board Room 1" --kind meeting_room
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use deskbook_core::{
  Engine,
  space::{Geometry, NewSpace, SpaceKind},
};
use deskbook_server::{ServerConfig, expand_tilde, load_config};
use deskbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "Deskbook reservation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API. This is the default.
  Serve,

  /// Register a space in the catalog and print it as JSON.
  AddSpace {
    #[arg(long)]
    map:      Uuid,
    #[arg(long)]
    name:     String,
    /// `workstation`, `meeting_room` or `cubicle`.
    #[arg(long, default_value = "workstation")]
    kind:     SpaceKind,
    #[arg(long, default_value_t = 1)]
    capacity: u32,
    #[arg(long, default_value_t = 0)]
    x:        i32,
    #[arg(long, default_value_t = 0)]
    y:        i32,
    #[arg(long, default_value_t = 1)]
    width:    i32,
    #[arg(long, default_value_t = 1)]
    height:   i32,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg: ServerConfig = load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create store directory {dir:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg, store).await,
    Command::AddSpace {
      map,
      name,
      kind,
      capacity,
      x,
      y,
      width,
      height,
    } => {
      let space = store
        .add_space(NewSpace {
          map_id: map,
          name,
          kind,
          geometry: Geometry { x, y, width, height },
          capacity,
        })
        .await
        .context("failed to add space")?;
      println!("{}", serde_json::to_string_pretty(&space)?);
      Ok(())
    }
  }
}

async fn serve(server_cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let engine = Engine::new(store.clone(), store);
  let app = deskbook_server::router(Arc::new(engine));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
