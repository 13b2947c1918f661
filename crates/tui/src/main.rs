mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use gamelist_core::{
    config::{self, AppConfig},
    GameApi, GameService,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::info!(api_base_url = %config.api_base_url, "starting");

    let api = GameApi::new(config.api_base_url);
    let service = GameService::new(api);

    let mut app = app::GameListApp::new(service);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamelist.log");

    let env_filter = EnvFilter::from_default_env();

    // The terminal is in raw mode while the app runs, so logs go to a file
    // instead of stdout.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
