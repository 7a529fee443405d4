//! mentor-chat - AI Tutoring Chat Service
//!
//! HTTP JSON API over the tutoring message pipeline: conversations,
//! messages, interests, learning progress, and direct generation
//! pass-throughs. One configured provider credential powers all
//! generative capabilities; without it the service runs degraded with
//! deterministic fallbacks.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mentor_chat::services::{Capabilities, OpenAiClient};
use mentor_chat::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mentor-chat (AI Tutoring Chat) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve data folder and open the database
    let data_folder = mentor_common::config::resolve_data_folder();
    mentor_common::config::ensure_data_folder(&data_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize data folder: {}", e))?;

    let db_path = mentor_common::config::database_path(&data_folder);
    info!("Database: {}", db_path.display());

    let db_pool = mentor_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Wire the generative provider when a credential is configured;
    // otherwise every AI path degrades to its fallback
    let capabilities = match mentor_common::config::resolve_api_key() {
        Some(api_key) => {
            let base_url = mentor_common::config::resolve_api_base_url();
            let client = Arc::new(
                OpenAiClient::new(api_key, base_url)
                    .map_err(|e| anyhow::anyhow!("Failed to create provider client: {}", e))?,
            );
            info!("Generative provider client initialized");
            client.capabilities()
        }
        None => Capabilities::disabled(),
    };

    let state = AppState::new(db_pool, capabilities);
    let app = mentor_chat::build_router(state);

    let port = mentor_common::config::resolve_port();
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
