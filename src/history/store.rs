use super::{HistoryEntry, HistoryLog};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The store is shared between the command loop, which records entries,
/// and the Ctrl-R handler, which reads them.
pub type SharedHistory = Arc<Mutex<HistoryStore>>;

/// In-memory history log bound to an optional backing file.
#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    log: HistoryLog,
}

impl HistoryStore {
    /// Read and deduplicate the history file. A missing or unreadable file
    /// starts an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let log = match fs::read(&path) {
            Ok(bytes) => HistoryLog::parse(&String::from_utf8_lossy(&bytes)).deduplicated(),
            Err(error) => {
                debug!(path = %path.display(), %error, "starting with empty history");
                HistoryLog::new()
            }
        };
        debug!(path = %path.display(), entries = log.len(), "history loaded");
        Self {
            path: Some(path),
            log,
        }
    }

    /// A history that is never read from or written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            log: HistoryLog::new(),
        }
    }

    pub fn record(&mut self, text: impl Into<String>) {
        self.log.push(text);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        self.log.entries()
    }

    /// Append every in-memory entry to the file. Does nothing for an empty
    /// log or a store without a file.
    pub fn try_save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if self.log.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.log.serialize().as_bytes())?;
        file.flush()?;
        debug!(path = %path.display(), entries = self.log.len(), "history saved");
        Ok(())
    }

    /// Like [`try_save`](Self::try_save), but a failure is only logged.
    pub fn save(&self) {
        if let Err(error) = self.try_save() {
            warn!(%error, "failed to save history");
        }
    }

    pub fn into_shared(self) -> SharedHistory {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn texts(store: &HistoryStore) -> Vec<&str> {
        store.entries().iter().map(HistoryEntry::text).collect()
    }

    #[test]
    fn missing_file_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = HistoryStore::load(dir.path().join("absent"));
        assert!(store.entries().is_empty());
        Ok(())
    }

    #[test]
    fn load_deduplicates_file_contents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history");
        fs::write(&path, "---\na\n---\nb\n---\n a \n---\nc\n")?;

        let store = HistoryStore::load(&path);
        assert_eq!(texts(&store), vec!["b", " a ", "c"]);
        Ok(())
    }

    #[test]
    fn save_appends_without_rewriting() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history");
        fs::write(&path, "---\nold\n")?;

        let mut store = HistoryStore::load(&path);
        store.record("SELECT 1");
        store.try_save()?;

        assert_eq!(fs::read_to_string(&path)?, "---\nold\n---\nold\n---\nSELECT 1\n");
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips_multi_line_entries() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history");

        let mut store = HistoryStore::load(&path);
        store.record("SELECT *\nFROM t");
        store.record("\\x");
        store.record("SELECT *\nFROM t");
        store.try_save()?;

        let reloaded = HistoryStore::load(&path);
        assert_eq!(texts(&reloaded), vec!["\\x", "SELECT *\nFROM t"]);
        Ok(())
    }

    #[test]
    fn empty_log_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history");
        HistoryStore::load(&path).try_save()?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn in_memory_store_never_touches_disk() -> Result<()> {
        let mut store = HistoryStore::in_memory();
        store.record("SELECT 1");
        store.try_save()?;
        assert_eq!(texts(&store), vec!["SELECT 1"]);
        Ok(())
    }

    #[test]
    fn unwritable_path_is_reported_by_try_save() -> Result<()> {
        let dir = tempdir()?;
        let mut store = HistoryStore::load(dir.path().join("missing").join("history"));
        store.record("SELECT 1");
        assert!(store.try_save().is_err());
        store.save();
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_read_lossily() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("history");
        fs::write(&path, b"---\nSELECT '\xff'\n")?;

        let store = HistoryStore::load(&path);
        assert_eq!(texts(&store), vec!["SELECT '\u{fffd}'"]);
        Ok(())
    }
}
