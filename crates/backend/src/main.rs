pub mod api;
pub mod routes;
pub mod shared;
pub mod usecases;

use std::path::PathBuf;
use std::sync::Arc;

use usecases::u102_mailbox_monitor::{spool_source::SpoolSource, MailboxMonitor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Log directory next to the build artifacts
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = shared::config::load_config()?;
    std::fs::create_dir_all(&config.storage.path)?;

    if config.openai.api_key.is_empty() {
        tracing::warn!("No OpenAI API key configured; every row will use fallback enrichment");
    }

    let port = config.server.port;
    let max_upload_bytes = (config.mailbox.max_file_size_mb as usize) * 1024 * 1024;

    // Mailbox monitor runs as a background task when enabled
    if config.mailbox.enabled {
        let source = Arc::new(SpoolSource::new(PathBuf::from(&config.mailbox.spool_dir)));
        let monitor = MailboxMonitor::new(
            source,
            config.mailbox.clone(),
            PathBuf::from(&config.storage.path),
        );
        tokio::spawn(monitor.run());
    }

    shared::config::set_global(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(max_upload_bytes).layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
