use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::ObjectStore;
use common::storage::s3::{S3ObjectStore, S3Options};
use genai::GenerativeClient;
use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let store: Arc<dyn ObjectStore> = Arc::new(
        S3ObjectStore::connect(&S3Options {
            bucket: config.storage.bucket.clone(),
            region: config.storage.region.clone(),
            endpoint: config.storage.endpoint.clone(),
            access_key: config.storage.access_key.clone(),
            secret_key: config.storage.secret_key.clone(),
            signed_url_ttl_secs: config.storage.signed_url_ttl_secs,
        })
        .context("Failed to connect to object storage")?,
    );

    let mode = config
        .provider
        .provider_mode()
        .context("Failed to resolve provider mode")?;
    let genai = Arc::new(
        GenerativeClient::new(mode, config.provider.models.table()).with_polling(
            config.provider.poll_interval(),
            config.provider.poll_max_wait(),
        ),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;

    let state = AppState {
        db,
        store,
        genai,
        config,
    };

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
