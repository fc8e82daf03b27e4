use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use directory_api::{
    config::Settings, logging::init_logger, routes::build_router, security::ApiKeyValidator,
    state::AppState,
};
use directory_core::DirectoryService;
use directory_infrastructure::{
    create_pool, run_migrations, seed_if_empty, PgActivityRepository, PgBuildingRepository,
    PgOrganizationRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    init_logger(&settings.logging)?;

    info!("🚀 Starting Directory API v{}", env!("CARGO_PKG_VERSION"));
    info!("✅ Configuration loaded");

    // Initialize database pool
    let db_pool = create_pool(
        &settings.database.url,
        settings.database.pool_max_size,
        settings.database.acquire_timeout(),
    )
    .await?;
    info!("✅ Database connection established");

    if settings.database.run_migrations {
        run_migrations(&db_pool).await?;
    }

    if settings.seed.enabled && seed_if_empty(&db_pool).await? {
        info!("🌱 Seeded empty database with the bundled dataset");
    }

    // Initialize repositories
    let statement_timeout = settings.database.statement_timeout();
    let activities = Arc::new(PgActivityRepository::new(db_pool.clone(), statement_timeout));
    let buildings = Arc::new(PgBuildingRepository::new(db_pool.clone(), statement_timeout));
    let organizations = Arc::new(PgOrganizationRepository::new(
        db_pool.clone(),
        statement_timeout,
    ));

    // Initialize services
    let directory = Arc::new(DirectoryService::new(activities, buildings, organizations));
    let state = AppState::new(directory, Some(db_pool.clone()));

    // Initialize security
    let validator = Arc::new(ApiKeyValidator::new(settings.security.api_key.clone()));

    // Build router
    let app = build_router(state, validator, settings.server.request_timeout());

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("👋 Directory API stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
