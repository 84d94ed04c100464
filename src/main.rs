use localskill_api::{
    config::{Config, ConfigError},
    create_router, db, AppState,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

async fn run() -> Result<(), StartupError> {
    // Fails fast when JWT_SECRET is missing
    let config = Config::from_env()?;

    let state = match config.database_url {
        Some(ref database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            AppState::postgres(pool, &config.auth)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store, data is lost on restart");
            AppState::in_memory(&config.auth)
        }
    };

    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("LocalSkill API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("LocalSkill API - Starting...");

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
