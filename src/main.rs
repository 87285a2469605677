use docstore_core::{DocumentService, core_config_from_env_values};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the docstore application
///
/// Resolves configuration from the environment (and `.env`), makes sure the upload directory
/// exists, and serves the REST API until interrupted.
///
/// # Environment Variables
/// - `DOCSTORE_REST_ADDR`: REST server address (default: "127.0.0.1:5000")
/// - `DOCSTORE_UPLOAD_DIR`: Directory for stored PDFs (default: "upload")
/// - `DOCSTORE_METADATA_FILE`: Metadata store path (default: "metadata.json")
/// - `RUST_LOG`: Log filter (default adds `docstore_run=info`)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the upload directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docstore_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("docstore_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("DOCSTORE_REST_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".into());

    let cfg = core_config_from_env_values(
        std::env::var("DOCSTORE_UPLOAD_DIR").ok(),
        std::env::var("DOCSTORE_METADATA_FILE").ok(),
    )?;
    let documents = DocumentService::new(&cfg)?;

    tracing::info!(
        upload_dir = %cfg.upload_dir().display(),
        metadata_file = %cfg.metadata_file().display(),
        "++ Starting docstore REST on {}",
        rest_addr
    );

    let app = api_rest::router(documents);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- docstore stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
