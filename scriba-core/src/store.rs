//! File-backed history of recent transcriptions.
//!
//! Layout mirrors a small key-value store: one index of metadata records
//! (`recent.json`, newest first, capped) plus one JSON body per transcript
//! id under `transcripts/`. Single writer, single reader; no locking.

use crate::error::StoreError;
use crate::types::Transcript;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Maximum number of records kept in the index; the oldest entry is
/// evicted on overflow.
pub const HISTORY_CAP: usize = 10;

const INDEX_FILE: &str = "recent.json";
const BODIES_DIR: &str = "transcripts";

/// Metadata record for one finished transcription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMeta {
    pub id: String,

    /// Original upload file name
    pub name: String,

    /// ISO-8601 creation timestamp
    pub date: String,

    /// Audio length as `M:SS`, or `--:--` when unknown
    pub duration: String,
}

impl TranscriptMeta {
    /// Duration label from the seconds value reported by the service.
    pub fn duration_label(audio_duration: Option<f64>) -> String {
        match audio_duration {
            Some(secs) if secs.is_finite() && secs > 0.0 => format!(
                "{}:{:02}",
                (secs / 60.0).floor() as u64,
                (secs % 60.0).floor() as u64
            ),
            _ => "--:--".to_string(),
        }
    }
}

/// On-disk transcription history.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    root: PathBuf,
}

impl HistoryStore {
    /// Open the store under the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::DataDirUnavailable)?;
        Ok(Self::at(base.join("scriba")))
    }

    /// Open the store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Recent transcriptions, newest first.
    ///
    /// A missing or unreadable index reads as an empty history, never as an
    /// error.
    pub fn list(&self) -> Vec<TranscriptMeta> {
        fs::read_to_string(self.index_path())
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Persist a transcript body and put its record at the front of the
    /// index.
    ///
    /// Re-saving an existing id replaces the old record and moves it to the
    /// front; the index never grows past [`HISTORY_CAP`] and evicted
    /// records lose their body files as well.
    pub fn save(&self, meta: TranscriptMeta, transcript: &Transcript) -> Result<(), StoreError> {
        fs::create_dir_all(self.root.join(BODIES_DIR))?;
        fs::write(self.body_path(&meta.id), serde_json::to_string(transcript)?)?;

        let mut records = self.list();
        records.retain(|record| record.id != meta.id);
        records.insert(0, meta);

        for evicted in records.drain(HISTORY_CAP.min(records.len())..) {
            self.remove_body(&evicted.id)?;
        }

        self.write_index(&records)
    }

    /// Load a stored transcript body.
    pub fn load(&self, id: &str) -> Result<Transcript, StoreError> {
        let raw = match fs::read_to_string(self.body_path(id)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    /// Remove one record and its body; returns the removed record, or
    /// `None` if the id was not in the index.
    pub fn remove(&self, id: &str) -> Result<Option<TranscriptMeta>, StoreError> {
        let mut records = self.list();
        let position = records.iter().position(|record| record.id == id);

        let Some(position) = position else {
            return Ok(None);
        };

        let removed = records.remove(position);
        self.write_index(&records)?;
        self.remove_body(id)?;

        Ok(Some(removed))
    }

    /// Drop every record and body.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.write_index(&[])?;

        match fs::remove_dir_all(self.root.join(BODIES_DIR)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn write_index(&self, records: &[TranscriptMeta]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.index_path(), serde_json::to_string(records)?)?;
        Ok(())
    }

    fn remove_body(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.body_path(id)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn body_path(&self, id: &str) -> PathBuf {
        self.root.join(BODIES_DIR).join(format!("{id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, HistoryStore) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = HistoryStore::at(dir.path());
        (dir, store)
    }

    fn meta(id: &str) -> TranscriptMeta {
        TranscriptMeta {
            id: id.to_string(),
            name: format!("{id}.mp3"),
            date: "2026-08-06T12:00:00+00:00".to_string(),
            duration: "1:05".to_string(),
        }
    }

    fn transcript(text: &str) -> Transcript {
        Transcript {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn saves_and_loads_a_transcript() {
        let (_dir, store) = store();

        store.save(meta("t1"), &transcript("hello")).unwrap();

        let loaded = store.load("t1").unwrap();
        assert_eq!(loaded.text, "hello");

        let records = store.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "t1.mp3");
    }

    #[test]
    fn list_is_empty_on_fresh_store() {
        let (_dir, store) = store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn corrupt_index_reads_as_empty_history() {
        let (dir, store) = store();
        fs::write(dir.path().join(INDEX_FILE), "{not json").unwrap();

        assert!(store.list().is_empty());
    }

    #[test]
    fn newest_record_comes_first() {
        let (_dir, store) = store();

        store.save(meta("old"), &transcript("a")).unwrap();
        store.save(meta("new"), &transcript("b")).unwrap();

        let ids: Vec<_> = store.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn resaving_an_id_replaces_and_moves_to_front() {
        let (_dir, store) = store();

        store.save(meta("t1"), &transcript("a")).unwrap();
        store.save(meta("t2"), &transcript("b")).unwrap();

        let mut updated = meta("t1");
        updated.name = "renamed.mp3".to_string();
        store.save(updated, &transcript("a2")).unwrap();

        let records = store.list();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "t1");
        assert_eq!(records[0].name, "renamed.mp3");
        assert_eq!(store.load("t1").unwrap().text, "a2");
    }

    #[test]
    fn eleventh_save_evicts_the_oldest() {
        let (_dir, store) = store();

        for i in 0..=HISTORY_CAP {
            store
                .save(meta(&format!("t{i}")), &transcript("x"))
                .unwrap();
        }

        let records = store.list();
        assert_eq!(records.len(), HISTORY_CAP);
        assert_eq!(records[0].id, format!("t{HISTORY_CAP}"));
        assert!(records.iter().all(|r| r.id != "t0"));

        // Evicted body is gone too
        assert!(matches!(store.load("t0"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn remove_returns_the_dropped_record() {
        let (_dir, store) = store();

        store.save(meta("t1"), &transcript("a")).unwrap();

        let removed = store.remove("t1").unwrap();
        assert_eq!(removed.map(|m| m.id).as_deref(), Some("t1"));
        assert!(store.list().is_empty());
        assert!(matches!(store.load("t1"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let (_dir, store) = store();
        assert_eq!(store.remove("missing").unwrap(), None);
    }

    #[test]
    fn clear_drops_records_and_bodies() {
        let (_dir, store) = store();

        store.save(meta("t1"), &transcript("a")).unwrap();
        store.clear().unwrap();

        assert!(store.list().is_empty());
        assert!(matches!(store.load("t1"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn duration_labels() {
        assert_eq!(TranscriptMeta::duration_label(Some(65.0)), "1:05");
        assert_eq!(TranscriptMeta::duration_label(Some(600.0)), "10:00");
        assert_eq!(TranscriptMeta::duration_label(Some(0.0)), "--:--");
        assert_eq!(TranscriptMeta::duration_label(None), "--:--");
    }
}
