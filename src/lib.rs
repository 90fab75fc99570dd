//! Recap library - re-exports for testing and external use.
//!
//! Paste text into the popup, let the on-device summarizer and language
//! model turn it into a summary and a reflection, and keep the results as
//! notes in local storage.

use std::sync::Arc;

use tokio::sync::Mutex;

pub mod ai;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod popup;
pub mod render;
pub mod storage;
pub mod store;
pub mod templates;
pub mod view;

// ============================================================================
// Application State
// ============================================================================

/// Shared by every handler for as long as the server runs. The popup
/// controller is the only owner of the notes.
pub struct AppState {
    pub popup: Mutex<PopupController>,
    pub ai: AiClient,
}

impl AppState {
    pub fn new(storage: Arc<dyn NoteStorage>, backend: Arc<dyn AiBackend>) -> Self {
        Self {
            popup: Mutex::new(PopupController::open(storage)),
            ai: AiClient::new(backend),
        }
    }
}

// Re-export commonly used types
pub use ai::{AiBackend, AiClient, Availability, OllamaBackend, SessionConfig, SummarizerConfig};
pub use config::{AiConfig, Config};
pub use error::{AppError, AppResult};
pub use models::{Note, Section, ViewResponse};
pub use popup::PopupController;
pub use storage::{NoteStorage, SledStorage};
pub use store::{NoteStore, Removed};
pub use view::{ActiveTab, ViewController, ViewState};
