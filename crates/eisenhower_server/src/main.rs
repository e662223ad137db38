//! `eisenhower` binary: parse configuration, start logging, serve.

use clap::Parser;
use eisenhower_core::init_logging;
use eisenhower_server::{run, ServerConfig};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::parse();
    init_logging(config.log_level(), config.log_target()?)?;
    run(config).await
}
