//! HTTP route handlers for the popup.
//!
//! `GET /` serves the page; every `/api` route applies one popup action and
//! answers with the freshly rendered view.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::debug;

use crate::error::AppResult;
use crate::models::{
    AddSectionRequest, GenerateRequest, Note, RenameSectionRequest, SwitchTabRequest, ViewResponse,
};
use crate::templates::popup_html;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(popup_page))
        .route("/api/view", get(current_view))
        .route("/api/notes", get(list_notes))
        .route("/api/generate", post(generate))
        .route("/api/clear", post(clear))
        .route("/api/new-note", post(new_note))
        .route("/api/tab", post(switch_tab))
        .route("/api/note/{note}/section", post(add_section))
        .route("/api/note/{note}/section/{section}", delete(delete_section))
        .route("/api/note/{note}/section/{section}/title", post(rename_section))
        .route("/api/note/{note}/regenerate", post(regenerate))
        .with_state(state)
}

// ============================================================================
// Page and Reads
// ============================================================================

pub async fn popup_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let popup = state.popup.lock().await;
    Html(popup_html(&popup.snapshot()))
}

pub async fn current_view(State(state): State<Arc<AppState>>) -> Json<ViewResponse> {
    Json(state.popup.lock().await.snapshot())
}

pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<Note>> {
    Json(state.popup.lock().await.store().notes().to_vec())
}

// ============================================================================
// Generation
// ============================================================================

/// The controller lock is released while the models run so the page keeps
/// reporting the loading view. The models run in their own task, which
/// finishes the generation and releases every model instance even when the
/// client disconnects and this handler is dropped.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateRequest>,
) -> AppResult<Json<ViewResponse>> {
    let text = {
        let mut popup = state.popup.lock().await;
        match popup.begin_generation(&body.text) {
            Some(text) => text,
            None => return Ok(Json(popup.snapshot())),
        }
    };
    debug!(chars = text.chars().count(), "generation started");

    let task = tokio::spawn(async move {
        let outcome = state.ai.generate_note(&text).await;
        let mut popup = state.popup.lock().await;
        popup.finish_generation(outcome);
        popup.snapshot()
    });
    Ok(Json(task.await?))
}

pub async fn regenerate(
    Path(note): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ViewResponse>> {
    let (note_id, text) = state.popup.lock().await.begin_regeneration(note)?;
    debug!(note_id, "regeneration started");

    let task = tokio::spawn(async move {
        let outcome = state.ai.generate_note(&text).await;
        let mut popup = state.popup.lock().await;
        popup.finish_regeneration(note_id, outcome);
        popup.snapshot()
    });
    Ok(Json(task.await?))
}

// ============================================================================
// View Actions
// ============================================================================

pub async fn clear(State(state): State<Arc<AppState>>) -> Json<ViewResponse> {
    let mut popup = state.popup.lock().await;
    popup.clear();
    Json(popup.snapshot())
}

pub async fn new_note(State(state): State<Arc<AppState>>) -> Json<ViewResponse> {
    let mut popup = state.popup.lock().await;
    popup.new_note();
    Json(popup.snapshot())
}

pub async fn switch_tab(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SwitchTabRequest>,
) -> AppResult<Json<ViewResponse>> {
    let mut popup = state.popup.lock().await;
    popup.switch_tab(body.note, body.section)?;
    Ok(Json(popup.snapshot()))
}

// ============================================================================
// Section Edits
// ============================================================================

pub async fn rename_section(
    Path((note, section)): Path<(usize, usize)>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenameSectionRequest>,
) -> AppResult<Json<ViewResponse>> {
    let mut popup = state.popup.lock().await;
    popup.rename_section(note, section, &body.title)?;
    Ok(Json(popup.snapshot()))
}

pub async fn delete_section(
    Path((note, section)): Path<(usize, usize)>,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ViewResponse>> {
    let mut popup = state.popup.lock().await;
    popup.delete_section(note, section)?;
    Ok(Json(popup.snapshot()))
}

pub async fn add_section(
    Path(note): Path<usize>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddSectionRequest>,
) -> AppResult<Json<ViewResponse>> {
    let mut popup = state.popup.lock().await;
    popup.add_section(note, &body.title, &body.content)?;
    Ok(Json(popup.snapshot()))
}
