use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use todo_core::TodoStore;
use todo_server::config::Config;
use todo_server::logging::init_logging;
use todo_server::{shutdown_signal, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    init_logging(&config.log_config())?;

    let repo = config.open_repository()?;
    let state = AppState::new(Arc::new(TodoStore::new(repo)), &config.public_scheme);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, storage = ?config.storage, "listening");

    todo_server::run(listener, state, shutdown_signal()).await?;
    Ok(())
}
