//! View controller for the popup.
//!
//! Holds which of the three views is showing, which tab is active and the
//! error line. It never copies notes: the active tab is a pair of indices
//! into the note store, and `render` rebuilds the whole tab strip and every
//! pane from the store each time.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::Note;
use crate::render::{html_escape, render_markdown};
use crate::store::{NoteStore, Removed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Initial,
    Loading,
    Notes,
}

impl ViewState {
    pub const ALL: [ViewState; 3] = [ViewState::Initial, ViewState::Loading, ViewState::Notes];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTab {
    pub note: usize,
    pub section: usize,
}

impl ActiveTab {
    pub fn new(note: usize, section: usize) -> Self {
        Self { note, section }
    }

    pub fn is(&self, note: usize, section: usize) -> bool {
        self.note == note && self.section == section
    }
}

/// Tab strip and content panes as HTML fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub tabs: String,
    pub panes: String,
}

#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
    active: Option<ActiveTab>,
    error: Option<String>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn show(&mut self, state: ViewState) {
        self.state = state;
    }

    /// Exactly one view is visible at a time.
    pub fn is_visible(&self, view: ViewState) -> bool {
        self.state == view
    }

    pub fn active(&self) -> Option<ActiveTab> {
        self.active
    }

    pub fn current_note_index(&self) -> Option<usize> {
        self.active.map(|a| a.note)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Makes `(note, section)` the active tab. Only the active marker
    /// changes; the store is untouched.
    pub fn switch_tab(&mut self, store: &NoteStore, note: usize, section: usize) -> AppResult<()> {
        if !store.contains(note, section) {
            return Err(AppError::NotFound(format!(
                "Section {} of note {} not found",
                section, note
            )));
        }
        self.active = Some(ActiveTab::new(note, section));
        Ok(())
    }

    /// Shifts the active pair after the store removed a section or note so
    /// it keeps pointing at the same tab where possible.
    pub fn section_removed(&mut self, note: usize, section: usize, removed: Removed) {
        let Some(active) = self.active else {
            return;
        };
        self.active = match removed {
            Removed::Note if active.note == note => None,
            Removed::Note if active.note > note => Some(ActiveTab::new(active.note - 1, active.section)),
            Removed::Section if active.note == note && active.section == section => {
                Some(ActiveTab::new(note, 0))
            }
            Removed::Section if active.note == note && active.section > section => {
                Some(ActiveTab::new(note, active.section - 1))
            }
            _ => Some(active),
        };
    }

    /// Keeps the active pair valid for the current store contents. Falls
    /// back to the first section of the same note, then to the last note.
    /// An empty store leaves no active tab and returns to the initial view.
    pub fn reconcile(&mut self, store: &NoteStore) {
        self.active = match self.active {
            Some(a) if store.contains(a.note, a.section) => Some(a),
            Some(a) if store.contains(a.note, 0) => Some(ActiveTab::new(a.note, 0)),
            _ => store.len().checked_sub(1).map(|last| ActiveTab::new(last, 0)),
        };
        if store.is_empty() && self.state == ViewState::Notes {
            self.state = ViewState::Initial;
        }
    }

    pub fn render(&self, store: &NoteStore) -> Rendered {
        let mut rendered = Rendered::default();
        for (note_index, note) in store.notes().iter().enumerate() {
            rendered.tabs.push_str(&self.render_tab_group(note_index, note));
            for (section_index, section) in note.sections.iter().enumerate() {
                rendered.panes.push_str(&format!(
                    r#"<section class="{class}" data-note="{note}" data-section="{section}">
                <h2 class="pane-title">{title}</h2>
                <div class="pane-body">{body}</div>
            </section>"#,
                    class = self.class_for("pane", note_index, section_index),
                    note = note_index,
                    section = section_index,
                    title = html_escape(&section.title),
                    body = render_markdown(&section.content),
                ));
            }
        }
        rendered
    }

    fn render_tab_group(&self, note_index: usize, note: &Note) -> String {
        let mut html = format!(
            r#"<div class="tab-group" data-note="{}"><span class="tab-stamp">{}</span>"#,
            note_index,
            html_escape(&note.display_time())
        );
        for (section_index, section) in note.sections.iter().enumerate() {
            html.push_str(&format!(
                r#"<div class="{class}" data-note="{note}" data-section="{section}">
                    <span class="tab-title" contenteditable="true" spellcheck="false">{title}</span>
                    <button class="tab-delete" title="Delete section" aria-label="Delete section">&times;</button>
                </div>"#,
                class = self.class_for("tab", note_index, section_index),
                note = note_index,
                section = section_index,
                title = html_escape(&section.title),
            ));
        }
        html.push_str("</div>");
        html
    }

    fn class_for(&self, base: &str, note: usize, section: usize) -> String {
        if self.active.is_some_and(|a| a.is(note, section)) {
            format!("{} active", base)
        } else {
            base.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use crate::storage::SledStorage;
    use std::sync::Arc;

    fn store_with(notes: &[&[&str]]) -> NoteStore {
        let mut store = NoteStore::load(Arc::new(SledStorage::temporary().unwrap()));
        for titles in notes {
            store
                .append(Note::new(
                    titles.iter().map(|t| Section::new(*t, "- body")).collect(),
                ))
                .unwrap();
        }
        store
    }

    #[test]
    fn starts_in_initial_view_with_one_visible_state() {
        let view = ViewController::new();
        assert_eq!(view.state(), ViewState::Initial);
        let visible: Vec<ViewState> = ViewState::ALL
            .into_iter()
            .filter(|v| view.is_visible(*v))
            .collect();
        assert_eq!(visible, vec![ViewState::Initial]);
    }

    #[test]
    fn render_marks_only_active_tab_and_pane() {
        let store = store_with(&[&["Summary", "Reflection"], &["Summary"]]);
        let mut view = ViewController::new();
        view.switch_tab(&store, 0, 1).unwrap();

        let rendered = view.render(&store);
        assert_eq!(rendered.tabs.matches("class=\"tab active\"").count(), 1);
        assert_eq!(rendered.panes.matches("class=\"pane active\"").count(), 1);
        assert!(rendered
            .tabs
            .contains(r#"<div class="tab active" data-note="0" data-section="1">"#));
        assert_eq!(rendered.panes.matches("<section").count(), 3);
        assert_eq!(rendered.tabs.matches("class=\"tab-group\"").count(), 2);
    }

    #[test]
    fn render_escapes_titles_and_renders_markdown() {
        let store = store_with(&[&["<b>bold</b>"]]);
        let rendered = ViewController::new().render(&store);
        assert!(rendered.tabs.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(rendered.panes.contains("<li>body</li>"));
    }

    #[test]
    fn switch_tab_rejects_missing_section() {
        let store = store_with(&[&["Summary"]]);
        let mut view = ViewController::new();
        assert!(view.switch_tab(&store, 0, 4).is_err());
        assert_eq!(view.active(), None);
    }

    #[test]
    fn removal_shifts_active_pair() {
        let mut view = ViewController::new();
        view.active = Some(ActiveTab::new(2, 1));
        view.section_removed(0, 0, Removed::Note);
        assert_eq!(view.active(), Some(ActiveTab::new(1, 1)));

        view.section_removed(1, 0, Removed::Section);
        assert_eq!(view.active(), Some(ActiveTab::new(1, 0)));

        view.section_removed(1, 0, Removed::Section);
        assert_eq!(view.active(), Some(ActiveTab::new(1, 0)));

        view.section_removed(1, 0, Removed::Note);
        assert_eq!(view.active(), None);
    }

    #[test]
    fn reconcile_falls_back_to_last_note_then_initial() {
        let store = store_with(&[&["A"], &["B", "C"]]);
        let mut view = ViewController::new();
        view.show(ViewState::Notes);
        view.active = Some(ActiveTab::new(5, 0));
        view.reconcile(&store);
        assert_eq!(view.active(), Some(ActiveTab::new(1, 0)));

        view.active = Some(ActiveTab::new(0, 3));
        view.reconcile(&store);
        assert_eq!(view.active(), Some(ActiveTab::new(0, 0)));

        let empty = store_with(&[]);
        view.reconcile(&empty);
        assert_eq!(view.active(), None);
        assert_eq!(view.state(), ViewState::Initial);
    }
}
