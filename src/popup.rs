//! The popup: one object owning the note store and the view controller.
//!
//! Generation is split in two halves so the caller can drop its lock on the
//! controller while the models run: `begin_generation` validates the input
//! and shows the loading view, `finish_generation` applies the outcome.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::AiClient;
use crate::error::{AppError, AppResult};
use crate::models::{Note, Section, ViewResponse};
use crate::storage::NoteStorage;
use crate::store::NoteStore;
use crate::view::{ViewController, ViewState};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to summarize.";

pub struct PopupController {
    store: NoteStore,
    view: ViewController,
    input: String,
    /// View to return to when a generation fails.
    before_loading: ViewState,
}

impl PopupController {
    /// Loads stored notes and selects the first section of the newest one.
    pub fn open(storage: Arc<dyn NoteStorage>) -> Self {
        let store = NoteStore::load(storage);
        let mut view = ViewController::new();
        view.reconcile(&store);
        if !store.is_empty() {
            view.show(ViewState::Notes);
        }
        Self {
            store,
            view,
            input: String::new(),
            before_loading: ViewState::Initial,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Validates `input` and switches to the loading view. Returns the text
    /// to hand to the AI client, or `None` when the input was rejected and
    /// the validation error is showing.
    pub fn begin_generation(&mut self, input: &str) -> Option<String> {
        self.input = input.to_string();
        let text = input.trim();
        if text.is_empty() {
            self.view.set_error(EMPTY_INPUT_MESSAGE);
            return None;
        }
        self.view.clear_error();
        self.enter_loading();
        Some(text.to_string())
    }

    /// Stores the generated note, or hides the loading view and surfaces
    /// the error message verbatim.
    pub fn finish_generation(&mut self, outcome: AppResult<Note>) {
        match outcome.and_then(|note| self.store.append(note)) {
            Ok(index) => {
                info!(note_index = index, "note added");
                self.before_loading = ViewState::Notes;
                self.input.clear();
                self.view.clear_error();
                self.select(index, 0);
                self.view.show(ViewState::Notes);
            }
            Err(err) => {
                warn!(error = %err, "generation failed");
                self.leave_loading();
                self.view.set_error(err.to_string());
            }
        }
    }

    /// Both halves in one call, for callers that own the controller.
    pub async fn generate(&mut self, ai: &AiClient, input: &str) {
        if let Some(text) = self.begin_generation(input) {
            let outcome = ai.generate_note(&text).await;
            self.finish_generation(outcome);
        }
    }

    /// Id of the note and the text of its "Original Text" section, ready for
    /// regeneration. The id, not the index, identifies the note when the
    /// outcome comes back.
    pub fn begin_regeneration(&mut self, note_index: usize) -> AppResult<(i64, String)> {
        let note = self
            .store
            .get(note_index)
            .ok_or_else(|| AppError::NotFound(format!("Note {} not found", note_index)))?;
        let text = note
            .original_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Validation("This note has no original text to regenerate from.".to_string())
            })?;
        let note_id = note.id;
        self.view.clear_error();
        self.enter_loading();
        Ok((note_id, text))
    }

    /// Applies a regenerated note to the note with `note_id`, wherever it
    /// sits now. A note deleted in the meantime is reported as not found.
    pub fn finish_regeneration(&mut self, note_id: i64, outcome: AppResult<Note>) {
        let applied = outcome.and_then(|note| {
            let index = self.store.position_of(note_id).ok_or_else(|| {
                AppError::NotFound("The note was deleted before it could be regenerated.".to_string())
            })?;
            self.store.regenerate(index, note)?;
            Ok(index)
        });
        match applied {
            Ok(index) => {
                info!(note_id, note_index = index, "note regenerated");
                self.before_loading = ViewState::Notes;
                self.select(index, 0);
                self.view.show(ViewState::Notes);
            }
            Err(err) => {
                warn!(note_id, error = %err, "regeneration failed");
                self.leave_loading();
                self.view.set_error(err.to_string());
            }
        }
    }

    /// Clears the input box and any error line.
    pub fn clear(&mut self) {
        self.input.clear();
        self.view.clear_error();
    }

    /// Returns to the initial view so a new text can be pasted.
    pub fn new_note(&mut self) {
        self.input.clear();
        self.view.clear_error();
        self.view.show(ViewState::Initial);
    }

    pub fn switch_tab(&mut self, note: usize, section: usize) -> AppResult<()> {
        self.view.switch_tab(&self.store, note, section)?;
        self.view.show(ViewState::Notes);
        Ok(())
    }

    pub fn rename_section(&mut self, note: usize, section: usize, title: &str) -> AppResult<()> {
        self.store.rename_section(note, section, title)
    }

    pub fn delete_section(&mut self, note: usize, section: usize) -> AppResult<()> {
        let removed = self.store.delete_section(note, section)?;
        info!(note, section, ?removed, "section deleted");
        self.view.section_removed(note, section, removed);
        self.view.reconcile(&self.store);
        Ok(())
    }

    pub fn add_section(&mut self, note: usize, title: &str, content: &str) -> AppResult<()> {
        let index = self
            .store
            .add_section(note, Section::new(title.trim(), content))?;
        self.select(note, index);
        Ok(())
    }

    /// Current rendered state for the popup page.
    pub fn snapshot(&self) -> ViewResponse {
        let rendered = self.view.render(&self.store);
        ViewResponse {
            view: self.view.state(),
            active: self.view.active(),
            tabs_html: rendered.tabs,
            panes_html: rendered.panes,
            error: self.view.error().map(str::to_string),
            input: self.input.clone(),
        }
    }

    fn enter_loading(&mut self) {
        if self.view.state() != ViewState::Loading {
            self.before_loading = self.view.state();
        }
        self.view.show(ViewState::Loading);
    }

    /// Back to the view shown before loading, or to the initial view when
    /// no notes are left to show.
    fn leave_loading(&mut self) {
        let state = match self.before_loading {
            ViewState::Notes if self.store.is_empty() => ViewState::Initial,
            state => state,
        };
        self.view.show(state);
    }

    fn select(&mut self, note: usize, section: usize) {
        if self.view.switch_tab(&self.store, note, section).is_err() {
            self.view.reconcile(&self.store);
        }
    }
}
