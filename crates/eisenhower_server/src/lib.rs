//! HTTP surface for the Eisenhower to-do core.
//!
//! # Responsibility
//! - Own process configuration and the task store connection.
//! - Expose `eisenhower_core` use-cases as JSON routes.

pub mod api;
pub mod config;
pub mod error;

pub use api::{router, AppState};
pub use config::ServerConfig;
pub use error::ApiError;

use log::{error, info};
use std::error::Error;
use tokio::net::TcpListener;

/// Opens the store, optionally seeds it, and serves until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let conn = config.open_store()?;
    let state = AppState::try_new(conn)?;

    if config.seed_demo {
        let inserted = state.seed_demo_tasks().await?;
        info!("event=server_seed module=server status=ok inserted={inserted}");
    }

    let listener = TcpListener::bind(config.bind).await?;
    let local_addr = listener.local_addr()?;
    info!(
        "event=server_start module=server status=ok addr={local_addr} store={}",
        config
            .db_path
            .as_ref()
            .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=server status=error error={err}");
    }
}
