//! Main entry point for the Household API

use household_api::{
    api,
    clock::SystemClock,
    config::{LoggingConfig, Settings},
    rollover, storage, upload, AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn init_logging(config: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    init_logging(&settings.logging);

    info!("Starting Household API");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Open the store and make sure every table exists
    let db = storage::connect(&settings.database).await?;
    storage::init_schema(&db).await?;
    info!("Database schema ready");

    let uploader = upload::from_config(&settings.upload)?;
    info!(enabled = settings.upload.enabled, "Asset uploads configured");

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let rollover_interval = settings.chores.rollover_interval_secs;

    // Create application state
    let app_state = Arc::new(AppState::new(
        settings,
        db,
        uploader,
        Arc::new(SystemClock),
    )?);

    // Background tasks
    rollover::spawn(app_state.clone(), rollover_interval);
    {
        let sessions = app_state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let purged = sessions.purge_expired();
                if purged > 0 {
                    debug!(purged, remaining = sessions.len(), "Purged expired sessions");
                }
            }
        });
    }

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    // Peer addresses key the credential rate limit
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
