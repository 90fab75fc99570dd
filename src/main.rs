//! Recap - summarize and reflect on pasted text with on-device models.
//!
//! This is the main entry point for the popup server.
//! The application is organized into the following modules:
//!
//! - `models`: Notes, sections, and API bodies
//! - `storage`: sled-backed persistence of the note list
//! - `store`: In-memory note list with write-through saves
//! - `ai`: Capability-gated summarizer and language model (Ollama)
//! - `view`: View states, active tab, and tab/pane rendering
//! - `popup`: Controller owning the store and the view
//! - `templates`: HTML/CSS/JS for the popup page
//! - `handlers`: HTTP route handlers

use std::sync::Arc;

use tracing::{info, warn};

use recap::{handlers, logging, AiClient, AppState, Config, OllamaBackend, SledStorage};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let storage = Arc::new(SledStorage::open(&config.db_path)?);
    let backend = Arc::new(OllamaBackend::new(&config.ai)?);

    // Capabilities are checked again on every generation; this is only an
    // early hint in the log.
    if let Err(err) = AiClient::new(backend.clone()).check_capabilities().await {
        warn!(error = %err, ollama = %config.ai.base_url, "on-device models not ready");
    }

    let state = Arc::new(AppState::new(storage, backend));
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;

    info!(
        url = %config.popup_url(),
        db = %config.db_path.display(),
        summarizer = %config.ai.summarizer_model,
        language_model = %config.ai.language_model,
        "popup ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
