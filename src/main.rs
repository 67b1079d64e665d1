use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jotter::config::ServerConfig;
use jotter::server::{AppState, create_router};
use jotter::store::{SqliteStore, Store};
use jotter::types::Page;

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "A personal markdown notes server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Import a markdown file as a new page
    Seed {
        /// Markdown file to import; its first line becomes the page title
        #[arg(long)]
        file: PathBuf,

        /// Data directory for the database and uploaded files
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

/// The schema is idempotent, so every entrypoint just initializes in place.
fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    fs::create_dir_all(&config.data_dir)?;
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    Ok(store)
}

fn run_seed(data_dir: String, file: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    let store = open_store(&config)?;

    let body = fs::read_to_string(&file)?;
    let page = Page::new(&body, Utc::now());
    store.create_page(&page)?;

    println!("Created page '{}' at /pages/{}/", page.title, page.created_ts);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jotter=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { file, data_dir } => run_seed(data_dir, file)?,
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            };

            let store = open_store(&config)?;
            let state = Arc::new(AppState::new(Arc::new(store), config.data_dir.clone()));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
