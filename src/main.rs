use anyhow::Context;
use axum::extract::FromRef;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod models;
mod store;
mod types;

pub(crate) use error::{ApiError, ApiResult};

use crate::config::Config;
use crate::store::memory::MemoryStore;
use crate::store::AnyStore;

#[derive(Clone, FromRef)]
pub struct App {
    pub config: Config,
    pub store: AnyStore,
}

#[derive(Debug, Parser)]
#[command(name = "snipbin", about = "share expiring text snippets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // try to load .env, ignoring any errors
    _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config: Config = ::config::Config::builder()
        .add_source(::config::File::with_name("config.toml").required(false))
        .add_source(::config::Environment::with_prefix("SNIPBIN"))
        .build()
        .context("failed to read config")?
        .try_deserialize()
        .context("failed to deserialize config")?;

    let app = App {
        config,
        store: MemoryStore::new().into(),
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(app).await?,
    }

    Ok(())
}
