use std::sync::Arc;

use clap::Parser;
use tracing::info;

use roster::config::Config;
use roster::{Server, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::parse();
    roster::logging::init(&config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting roster");

    let app = roster::app(Arc::new(UserStore::new()));
    Server::bind(config.addr)
        .max_body_bytes(config.max_body_bytes)
        .serve(app)
        .await?;
    Ok(())
}
