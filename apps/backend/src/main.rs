use anyhow::Context;
use std::sync::Arc;
use taskboard::config::Config;
use taskboard::db::Db;
use taskboard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables: .env.defaults first, then .env overrides
    dotenvy::from_filename(".env.defaults").ok();
    dotenvy::dotenv().ok();

    env_logger::init();

    // Missing database credentials stop startup here
    let config = Config::from_env().context("Invalid configuration")?;
    let addr = config.bind_addr();

    let db = Db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    log::info!("Connected to PostgreSQL at {}", config.database.host);

    let state = AppState::new(Arc::new(db));
    let app = taskboard::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    log::info!("Server is running on http://{}", addr);
    log::info!("Live task snapshots: ws://{}/ws", addr);
    log::info!("OpenAPI docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
