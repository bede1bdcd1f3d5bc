use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;

use rust_ws_chat::relay::ChatState;
use rust_ws_chat::storage::{self, MessageStore};
use rust_ws_chat::{config, network};

#[derive(Parser)]
#[command(name = "rust_ws_chat", version, about = "Two-party WebSocket chat relay")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Listening port (overrides the PORT env var and the config file)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
    /// SQLite database path (`:memory:` for an ephemeral store)
    #[arg(long, value_name = "FILE")]
    db: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    let port = config::resolve_port(cli.port, &app_config);
    let db_path = cli.db.unwrap_or(app_config.db_path);

    if let Err(err) = storage::ensure_db_dir(&db_path) {
        log::error!("Failed to create data directory for {db_path}: {err}");
        std::process::exit(1);
    }

    let store = match MessageStore::with_path(&db_path) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Failed to open message store at {db_path}: {err}");
            std::process::exit(1);
        }
    };
    match store.count() {
        Ok(count) => log::info!("Message store opened at {db_path} ({count} messages)"),
        Err(err) => log::warn!("Message store opened at {db_path}, count unavailable: {err}"),
    }

    log::info!("Initializing WebSocket server...");
    let state = Arc::new(ChatState::new(store));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    if let Err(err) = network::server::run(addr, state).await {
        log::error!("Server terminated unexpectedly: {err}");
        std::process::exit(1);
    }
}
