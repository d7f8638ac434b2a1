//! # Registry Main Entry Point
//!
//! Loads layered configuration, sets up tracing and the database pool, then
//! either serves HTTP or only applies migrations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use registry::{
    config::ConfigLoader,
    db,
    server::run_server,
    telemetry,
};

#[derive(Parser, Debug)]
#[clap(name = "registry")]
#[clap(about = "Registry of companies, machines and machine documents")]
struct Args {
    /// Directory holding the .env files (defaults to the working directory)
    #[clap(long)]
    env_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Apply migrations and serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = match args.env_dir {
        Some(dir) => ConfigLoader::with_base_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing tracing")?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let command = args.command.unwrap_or(Command::Serve);
    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    if command == Command::Migrate || config.run_migrations {
        db::run_migrations(&db).await.context("running migrations")?;
    }

    match command {
        Command::Migrate => {
            tracing::info!("Migrations applied");
            Ok(())
        }
        Command::Serve => run_server(config, db).await,
    }
}
