//! In-memory note list with write-through persistence.
//!
//! The store exclusively owns the notes. Every successful mutation is
//! followed by a save; save failures are logged and never fail the mutation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Note, Section};
use crate::storage::NoteStorage;

/// What `delete_section` ended up removing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    Section,
    Note,
}

pub struct NoteStore {
    notes: Vec<Note>,
    storage: Arc<dyn NoteStorage>,
}

impl NoteStore {
    /// Loads the persisted list. A failed load is logged and yields an empty
    /// store.
    pub fn load(storage: Arc<dyn NoteStorage>) -> Self {
        let notes = match storage.load() {
            Ok(notes) => notes,
            Err(err) => {
                warn!(error = %err, "failed to load notes, starting empty");
                Vec::new()
            }
        };
        debug!(count = notes.len(), "notes loaded");
        Self { notes, storage }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, note_index: usize) -> Option<&Note> {
        self.notes.get(note_index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, note_index: usize, section_index: usize) -> bool {
        self.notes
            .get(note_index)
            .is_some_and(|n| section_index < n.sections.len())
    }

    /// Index of the note with the given id.
    pub fn position_of(&self, note_id: i64) -> Option<usize> {
        self.notes.iter().position(|n| n.id == note_id)
    }

    /// Appends a note and returns its index. Ids stay unique: a note created
    /// in the same millisecond as a stored one is moved to the next free id.
    pub fn append(&mut self, mut note: Note) -> AppResult<usize> {
        if note.sections.is_empty() {
            return Err(AppError::Validation(
                "A note needs at least one section.".to_string(),
            ));
        }
        while self.position_of(note.id).is_some() {
            note.id += 1;
        }
        self.notes.push(note);
        self.persist();
        Ok(self.notes.len() - 1)
    }

    /// Removes a section. Removing the last section of a note removes the
    /// note itself.
    pub fn delete_section(&mut self, note_index: usize, section_index: usize) -> AppResult<Removed> {
        let note = self.note_mut(note_index)?;
        if section_index >= note.sections.len() {
            return Err(section_not_found(note_index, section_index));
        }

        let removed = if note.sections.len() == 1 {
            self.notes.remove(note_index);
            Removed::Note
        } else {
            note.sections.remove(section_index);
            Removed::Section
        };
        self.persist();
        Ok(removed)
    }

    pub fn rename_section(
        &mut self,
        note_index: usize,
        section_index: usize,
        new_title: &str,
    ) -> AppResult<()> {
        let title = new_title.trim();
        if title.is_empty() {
            return Err(AppError::Validation(
                "Section title cannot be empty.".to_string(),
            ));
        }
        let section = self
            .note_mut(note_index)?
            .sections
            .get_mut(section_index)
            .ok_or_else(|| section_not_found(note_index, section_index))?;
        section.title = title.to_string();
        self.persist();
        Ok(())
    }

    /// Appends a section to an existing note and returns its index.
    pub fn add_section(&mut self, note_index: usize, section: Section) -> AppResult<usize> {
        if section.title.trim().is_empty() {
            return Err(AppError::Validation(
                "Section title cannot be empty.".to_string(),
            ));
        }
        let note = self.note_mut(note_index)?;
        note.sections.push(section);
        let index = note.sections.len() - 1;
        self.persist();
        Ok(index)
    }

    /// Replaces a note's sections and timestamp with a freshly generated
    /// note, keeping its id and position.
    pub fn regenerate(&mut self, note_index: usize, generated: Note) -> AppResult<()> {
        if generated.sections.is_empty() {
            return Err(AppError::Validation(
                "A note needs at least one section.".to_string(),
            ));
        }
        let note = self.note_mut(note_index)?;
        note.timestamp = generated.timestamp;
        note.sections = generated.sections;
        self.persist();
        Ok(())
    }

    fn note_mut(&mut self, note_index: usize) -> AppResult<&mut Note> {
        self.notes
            .get_mut(note_index)
            .ok_or_else(|| AppError::NotFound(format!("Note {} not found", note_index)))
    }

    fn persist(&self) {
        match self.storage.save(&self.notes) {
            Ok(()) => debug!(count = self.notes.len(), "notes persisted"),
            Err(err) => warn!(error = %err, "failed to persist notes"),
        }
    }
}

fn section_not_found(note_index: usize, section_index: usize) -> AppError {
    AppError::NotFound(format!(
        "Section {} of note {} not found",
        section_index, note_index
    ))
}
