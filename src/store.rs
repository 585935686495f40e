use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::util::time;

/// Errors from session export/import.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize session: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything recorded against a single rubric indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorNote {
    /// PNG-encoded canvas snapshot, if the observer drew anything.
    pub drawing: Option<Vec<u8>>,
    /// Performance mark chosen in the indicators panel ("good"/"growth").
    pub performance: Option<String>,
    /// Prewritten comment attached with the quick-comment button.
    pub auto_comment: Option<String>,
    /// Unix timestamp of the last update.
    pub updated_at: u64,
}

impl IndicatorNote {
    /// A note counts toward observation progress once it carries anything.
    pub fn has_content(&self) -> bool {
        self.drawing.is_some() || self.performance.is_some() || self.auto_comment.is_some()
    }
}

/// In-memory store for one observation session, keyed by indicator id.
///
/// This is the persistence side of the canvas save callback: the canvas
/// fires, the store keys and keeps. Durability (eframe storage, JSON
/// export) lives here, never in the drawing core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteStore {
    session_id: Uuid,
    notes: HashMap<String, IndicatorNote>,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            notes: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn note(&self, indicator_id: &str) -> Option<&IndicatorNote> {
        self.notes.get(indicator_id)
    }

    pub fn drawing(&self, indicator_id: &str) -> Option<&[u8]> {
        self.notes
            .get(indicator_id)
            .and_then(|note| note.drawing.as_deref())
    }

    /// Record a canvas flush. `drawing = None` means the canvas was
    /// explicitly cleared. The performance hint only overwrites when
    /// present; the canvas echoes whatever it was last told.
    pub fn record_drawing(
        &mut self,
        indicator_id: &str,
        drawing: Option<&[u8]>,
        performance_hint: Option<&str>,
    ) {
        let note = self.notes.entry(indicator_id.to_owned()).or_default();
        note.drawing = drawing.map(|bytes| bytes.to_vec());
        if let Some(mark) = performance_hint {
            note.performance = Some(mark.to_owned());
        }
        note.updated_at = time::timestamp_secs();
    }

    pub fn set_performance(&mut self, indicator_id: &str, mark: Option<&str>) {
        let note = self.notes.entry(indicator_id.to_owned()).or_default();
        note.performance = mark.map(str::to_owned);
        note.updated_at = time::timestamp_secs();
    }

    pub fn set_auto_comment(&mut self, indicator_id: &str, comment: &str) {
        let note = self.notes.entry(indicator_id.to_owned()).or_default();
        note.auto_comment = Some(comment.to_owned());
        note.updated_at = time::timestamp_secs();
    }

    /// How many indicators carry any content yet.
    pub fn noted_count(&self) -> usize {
        self.notes.values().filter(|note| note.has_content()).count()
    }

    pub fn export_to_file(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn import_from_file(path: &Path) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_and_clearing_a_drawing() {
        let mut store = NoteStore::new();
        store.record_drawing("3.2", Some(&[1, 2, 3]), Some("good"));

        let note = store.note("3.2").unwrap();
        assert_eq!(note.drawing.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(note.performance.as_deref(), Some("good"));

        // A cleared canvas drops the drawing but keeps the mark.
        store.record_drawing("3.2", None, None);
        let note = store.note("3.2").unwrap();
        assert!(note.drawing.is_none());
        assert_eq!(note.performance.as_deref(), Some("good"));
    }

    #[test]
    fn noted_count_ignores_empty_notes() {
        let mut store = NoteStore::new();
        assert_eq!(store.noted_count(), 0);

        store.set_performance("1.1", Some("growth"));
        store.set_auto_comment("2.1", "Routines are well established");
        store.record_drawing("3.1", Some(&[0]), None);
        store.set_performance("4.1", None);

        assert_eq!(store.noted_count(), 3);
    }

    #[test]
    fn export_import_round_trip() {
        let mut store = NoteStore::new();
        store.record_drawing("6.2", Some(&[9, 9]), Some("good"));
        store.set_auto_comment("6.2", "Appropriate wait time");

        let path = std::env::temp_dir().join(format!("inknote-test-{}.json", store.session_id()));
        store.export_to_file(&path).unwrap();
        let restored = NoteStore::import_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(restored.session_id(), store.session_id());
        assert_eq!(restored.note("6.2"), store.note("6.2"));
    }
}
