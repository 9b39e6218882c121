// Salon Books - Web Server
// REST API with Axum over the SQLite record store

use anyhow::{Context, Result};
use salon_books::api::{app, AppState};
use salon_books::{open_database, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_books=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let conn = open_database(&config.db_path)?;
    tracing::info!(path = %config.db_path.display(), "database opened");

    let state = AppState::new(conn);
    let router = app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Salon Books API listening on http://{addr}/api");

    axum::serve(listener, router)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
