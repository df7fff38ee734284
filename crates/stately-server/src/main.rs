//! stately-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite fun-fact store, and serves the states API over HTTP.
//!
//! # Seeding
//!
//! To load fun facts from a JSON seed file and exit:
//!
//! ```
//! cargo run -p stately-server -- --seed seed.json
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use stately_server::{ServerConfig, app, seed};
use stately_store_sqlite::SqliteFunFactStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stately states API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load fun facts from a JSON seed file, then exit.
  #[arg(long)]
  seed: Option<PathBuf>,
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

  // Load configuration. Every key has a default, so the binary runs with no
  // config file at all.
  let settings = config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 3500)?
    .set_default("store_path", "stately.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STATELY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store.
  let store = SqliteFunFactStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;
  tracing::info!(path = ?server_cfg.store_path, "opened fun-fact store");

  // Helper mode: seed the store and exit.
  if let Some(seed_path) = cli.seed {
    seed::run(&store, &seed_path).await?;
    return Ok(());
  }

  let router = app(Arc::new(store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, router).await.context("server error")?;

  Ok(())
}
