//! product-service: REST API for a single-table product catalog
//!
//! Endpoints: service info, create, read-one, read-all, and a Prometheus
//! scrape point. Backed by SQLite (per-request connections) or an in-memory
//! list, selected at startup.

pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

pub use error::{ServerError, ServerResult};

use store::{MemoryStore, SharedStore, SqliteStore};

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// File-backed SQLite database
    Sqlite,
    /// Volatile in-process list
    Memory,
}

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "5556")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Database file path (default: $DATABASE_PATH or ./products.db)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, default_value = "sqlite")]
    pub backend: Backend,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            port: 5556,
            bind: "0.0.0.0".to_string(),
            db_path: None,
            backend: Backend::Sqlite,
            timeout: 30,
        }
    }
}

impl ServerArgs {
    /// Resolve the database path: flag, then DATABASE_PATH, then the
    /// default file in the working directory.
    fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(|| std::env::var_os("DATABASE_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("products.db"))
    }
}

/// Run the server with the given arguments
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    let store: SharedStore = match args.backend {
        Backend::Sqlite => {
            let db_path = args.resolve_db_path();
            info!("Opening database at {}", db_path.display());
            Arc::new(SqliteStore::open(&db_path)?)
        }
        Backend::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = create_router(store, args.timeout);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Starting product-service on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the Axum router with all routes
pub fn create_router(store: SharedStore, timeout_secs: u64) -> Router {
    // CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Middleware stack
    let stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)))
        .layer(cors);

    Router::new()
        .route("/", get(routes::service_info))
        .route(
            "/products",
            get(routes::list_products).post(routes::create_product),
        )
        .route("/products/{id}", get(routes::get_product))
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(store)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(stack)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
