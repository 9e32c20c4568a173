use ikeeper::bootstrap;
use ikeeper::config::Config;
use ikeeper::infrastructure::http::router::build_router;
use ikeeper::infrastructure::observability;
use ikeeper::infrastructure::persistence::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    observability::init(&config).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!("Configuration loaded");

    // Initialize database connection
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    // Seed permissions, system roles, admin user and categories
    if let Err(e) = bootstrap::initialize(&db, &config).await {
        tracing::error!("Failed to initialize seed data: {}", e);
        return Err(e.into());
    }

    let state = bootstrap::build_app_state(db, &config)?;
    let app = build_router(state);

    // Start server
    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
