//! Key-value persistence for the note list.
//!
//! The whole list is stored as one JSON value under a single key of a sled
//! tree. There is no schema versioning.

use std::path::Path;

use crate::error::AppResult;
use crate::models::Note;

pub const NOTES_TREE: &str = "notes";
pub const NOTES_KEY: &str = "notes";

/// Load/save seam between the note store and whatever holds the bytes.
pub trait NoteStorage: Send + Sync {
    fn load(&self) -> AppResult<Vec<Note>>;
    fn save(&self, notes: &[Note]) -> AppResult<()>;
}

// ============================================================================
// Sled Storage
// ============================================================================

#[derive(Clone)]
pub struct SledStorage {
    tree: sled::Tree,
}

impl SledStorage {
    pub fn open(path: &Path) -> AppResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> AppResult<Self> {
        let tree = db.open_tree(NOTES_TREE)?;
        Ok(Self { tree })
    }

    /// A throwaway database that is removed when dropped.
    pub fn temporary() -> AppResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(&db)
    }
}

impl NoteStorage for SledStorage {
    fn load(&self) -> AppResult<Vec<Note>> {
        match self.tree.get(NOTES_KEY.as_bytes())? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, notes: &[Note]) -> AppResult<()> {
        let json = serde_json::to_vec(notes)?;
        self.tree.insert(NOTES_KEY.as_bytes(), json)?;
        self.tree.flush()?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    #[test]
    fn empty_database_loads_empty_list() {
        let storage = SledStorage::temporary().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_returns_same_notes() {
        let storage = SledStorage::temporary().unwrap();
        let notes = vec![
            Note::new(vec![Section::new("Summary", "- one\n- two")]),
            Note::generated("s".into(), "r".into(), "source text"),
        ];
        storage.save(&notes).unwrap();
        assert_eq!(storage.load().unwrap(), notes);
    }

    #[test]
    fn notes_survive_reopening_the_database() {
        let dir = std::env::temp_dir().join(format!(
            "recap-storage-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let notes = vec![Note::generated("s".into(), "r".into(), "o")];
        {
            let storage = SledStorage::open(&dir).unwrap();
            storage.save(&notes).unwrap();
        }
        let reopened = SledStorage::open(&dir).unwrap();
        assert_eq!(reopened.load().unwrap(), notes);
        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_value_is_a_storage_error() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        db.open_tree(NOTES_TREE)
            .unwrap()
            .insert(NOTES_KEY.as_bytes(), b"{not json".to_vec())
            .unwrap();
        let storage = SledStorage::from_db(&db).unwrap();
        assert!(matches!(
            storage.load(),
            Err(crate::error::AppError::Storage(_))
        ));
    }
}
