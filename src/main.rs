use std::sync::Arc;

use card_advisor::{
    config::{Config, StorageBackend},
    create_router,
    db::{create_pool, run_migrations, InMemoryStore, PgStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("card_advisor=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let scoring = config.scoring()?;
    tracing::info!(?scoring, storage = ?config.storage, "Configuration loaded");

    // Initialize application state
    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_max_connections).await?;
            run_migrations(&pool).await?;
            let store = Arc::new(PgStore::new(pool));
            AppState::new(store.clone(), store, scoring)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; ownership changes are lost on restart");
            AppState::in_memory(InMemoryStore::seeded(), scoring)
        }
    };

    // Create the router with all routes
    let app = create_router(Arc::new(state));

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
