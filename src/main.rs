use std::sync::Arc;

use anyhow::Context;
use aquasonda::{
    arguments, config,
    database::SqliteStore,
    logger::{self, LogTag},
    paths,
    webserver::{self, AppState},
};

/// Main entry point for aquasonda
///
/// Parses arguments, prepares directories and logging, loads configuration,
/// opens the reading store and serves the HTTP API plus the readings
/// channel until Ctrl+C / SIGTERM.
#[tokio::main]
async fn main() {
    let args = arguments::init();

    // Logger needs the logs directory before it can open its file
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init(args, Some(paths::get_logs_directory()));
    logger::info(LogTag::System, "🚀 aquasonda starting up...");

    let exit_code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("{:#}", e));
            1
        }
    };

    logger::info(LogTag::System, "aquasonda stopped");
    logger::flush();
    std::process::exit(exit_code);
}

async fn run(args: &arguments::Arguments) -> anyhow::Result<()> {
    let config = config::load_config(args).context("loading configuration")?;

    let db_path = paths::resolve(&config.database.path);
    let store = SqliteStore::open(&db_path, &config.database)
        .with_context(|| format!("opening database {}", db_path.display()))?;

    let state = Arc::new(AppState::new(config, store));

    webserver::start_server(state)
        .await
        .map_err(anyhow::Error::msg)
        .context("running webserver")?;

    Ok(())
}
