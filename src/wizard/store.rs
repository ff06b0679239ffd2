//! Keyed on-disk persistence for wizard drafts

use super::draft::Draft;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Keyed draft persistence, one JSON file per key.
///
/// All operations are best-effort: `load` answers `None` for anything it
/// cannot read or parse, `save` logs and swallows I/O failures so a full
/// disk never blocks the user's edit, and `clear` is idempotent. A single
/// writer per key is assumed; concurrent writers degrade to last write
/// wins with no merge.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    /// Create a store rooted at the platform data directory
    pub fn new() -> Self {
        let dir = ProjectDirs::from("io", "lingua", "lingua-tui")
            .map(|dirs| dirs.data_dir().join("drafts"))
            .unwrap_or_else(|| PathBuf::from(".lingua-drafts"));
        Self { dir }
    }

    /// Create a store rooted at an explicit directory (used by tests)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the draft stored under `key`.
    ///
    /// Missing files and malformed JSON both answer `None`; a corrupt
    /// draft degrades to a fresh start, never to an error the caller has
    /// to handle.
    pub fn load(&self, key: &str) -> Option<Draft> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!("discarding malformed draft {key}: {e}");
                None
            }
        }
    }

    /// Persist `draft` under `key`, best-effort.
    pub fn save(&self, key: &str, draft: &Draft) {
        if let Err(e) = self.try_save(key, draft) {
            tracing::warn!("failed to save draft {key}: {e}");
        }
    }

    fn try_save(&self, key: &str, draft: &Draft) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(draft)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.path_for(key), content)
    }

    /// Remove the draft stored under `key`. Idempotent.
    pub fn clear(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to clear draft {key}: {e}");
            }
        }
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}
