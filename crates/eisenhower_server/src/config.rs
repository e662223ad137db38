//! Command-line and environment configuration.

use clap::Parser;
use eisenhower_core::db::{open_db, open_db_in_memory, DbResult};
use eisenhower_core::{default_log_level, LogTarget};
use rusqlite::Connection;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "eisenhower",
    version,
    about = "HTTP API for to-do tasks sorted by the Eisenhower matrix"
)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "EISENHOWER_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// SQLite database file. Uses a private in-memory database when omitted.
    #[arg(long, env = "EISENHOWER_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise).
    #[arg(long, env = "EISENHOWER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files. Logs go to stderr when omitted.
    #[arg(long, env = "EISENHOWER_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Insert one sample task per quadrant when the store is empty.
    #[arg(long, env = "EISENHOWER_SEED_DEMO")]
    pub seed_demo: bool,
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn log_target(&self) -> Result<LogTarget, String> {
        match self.log_dir.as_deref() {
            Some(dir) => LogTarget::directory(dir),
            None => Ok(LogTarget::Stderr),
        }
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}
