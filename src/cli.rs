//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::web::{AppState, build_router};
use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "REST backend for the trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create any missing tables
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Load reference data from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, value_enum)]
        kind: ImportKind,
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Symbols,
    News,
}

pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    setup_logging();

    let result = match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::Import { config, kind, file } => run_import(&config, kind, &file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradesimError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Open the configured backend and make sure its schema exists.
pub fn open_store(
    config: &dyn ConfigPort,
) -> Result<Arc<dyn DataPort + Send + Sync>, TradesimError> {
    let backend = config
        .get_string("database", "backend")
        .unwrap_or_else(|| "sqlite".to_string());

    match backend.trim().to_lowercase().as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let store = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            store.initialize_schema()?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let store = crate::adapters::postgres_adapter::PostgresAdapter::from_config(config)?;
            store.initialize_schema()?;
            Ok(Arc::new(store))
        }
        other => Err(TradesimError::ConfigInvalid {
            section: "database".into(),
            key: "backend".into(),
            reason: format!("unsupported backend '{other}' (not compiled in or unknown)"),
        }),
    }
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, TradesimError> {
    let raw = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| TradesimError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: format!("{raw:?}: {e}"),
        })
}

fn run_serve(config_path: &Path) -> Result<(), TradesimError> {
    let config = load_config(config_path)?;
    let addr = listen_addr(&config)?;
    let data_port = open_store(&config)?;
    let router = build_router(AppState { data_port });

    tokio::runtime::Runtime::new()?.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("listening on http://{addr}");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok::<(), TradesimError>(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

fn run_init_db(config_path: &Path) -> Result<(), TradesimError> {
    let config = load_config(config_path)?;
    open_store(&config)?;
    info!("schema ready");
    Ok(())
}

pub fn run_import(config_path: &Path, kind: ImportKind, file: &Path) -> Result<(), TradesimError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    match kind {
        ImportKind::Symbols => csv_adapter::import_symbols(store.as_ref(), file).map(|_| ()),
        ImportKind::News => csv_adapter::import_news(store.as_ref(), file).map(|_| ()),
    }
}
