#[cfg(feature = "server")]
#[derive(clap::Parser, Debug)]
#[command(name = "contentdesk", version, about = "Content management API server")]
struct Args {
    /// Path to a configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Keep content in process memory instead of MongoDB
    #[arg(long)]
    in_memory: bool,
}

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clap::Parser;
    use contentdesk::app::{build_router, AppState};
    use contentdesk::config::{Settings, StorageBackend};
    use contentdesk::db::connection::MongoConnection;
    use contentdesk::db::memory::InMemoryContentRepository;
    use contentdesk::db::repository::{ContentRepository, MongoContentRepository};
    use std::sync::Arc;

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if args.in_memory {
        settings.storage.backend = StorageBackend::Memory;
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log.filter.clone().into()),
        )
        .init();

    tracing::info!("Starting contentdesk server...");

    let content_repo: Arc<dyn ContentRepository> = match settings.storage.backend {
        StorageBackend::Mongo => {
            let connection = Arc::new(MongoConnection::new(settings.database.clone()));
            // Warm the handle; a failure here is logged and every request
            // retries the handshake.
            if connection.database().await.is_err() {
                tracing::warn!("MongoDB unavailable at startup, continuing without a connection");
            }
            Arc::new(MongoContentRepository::new(connection))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory content store");
            Arc::new(InMemoryContentRepository::new())
        }
    };

    let app = build_router(AppState::new(content_repo));

    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

#[cfg(feature = "server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

// Without the `server` feature the crate is a library for clients only.
#[cfg(not(feature = "server"))]
fn main() {}
