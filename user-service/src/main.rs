//! user-service entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;
use user_service::{run_server, ServerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ServerArgs::parse();
    run_server(args).await
}
