//! Persisted display state backing the frequency cap.
//!
//! A single [`DisplayRecord`] — not a history log — is stored under a fixed
//! key and overwritten wholesale every time a popup finishes showing. The
//! storage location is a JSON file in the user's configuration directory:
//!
//! - Linux: `~/.config/popkit/display_state.json`
//! - macOS: `~/Library/Application Support/popkit/display_state.json`
//! - Windows: `%APPDATA%/popkit/display_state.json`
//!
//! The store is a trait so hosts and tests can substitute an in-memory
//! implementation. Concurrent processes sharing the file race with
//! last-write-wins semantics; the cap is best-effort by design.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory name under the platform config dir.
const APP_DIR: &str = "popkit";

/// State file name.
const STATE_FILE: &str = "display_state.json";

// ============================================================================
// Record
// ============================================================================

/// The single most-recent display, keyed by derived popup id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// When the popup was recorded, epoch milliseconds.
    pub last_shown_at: i64,
    /// Derived id of the popup that was shown.
    pub popup_id: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No platform configuration directory could be determined.
    #[error("could not determine a configuration directory for display state")]
    NoConfigDir,
    /// Reading or writing the state file failed.
    #[error("display state io failed: {0}")]
    Io(#[from] std::io::Error),
    /// The record could not be serialized.
    #[error("display state serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Store Trait
// ============================================================================

/// Key-value persistence seam for the display record.
pub trait DisplayStore {
    /// Loads the most recent record, if any readable one exists.
    ///
    /// A missing or unreadable record is indistinguishable from "never
    /// shown" — the cap simply permits display.
    fn load(&self) -> Option<DisplayRecord>;

    /// Overwrites the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&mut self, record: &DisplayRecord) -> Result<(), StoreError>;
}

// ============================================================================
// JSON File Store
// ============================================================================

/// [`DisplayStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the platform default location, creating the
    /// application directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory exists or it cannot be
    /// created.
    pub fn at_default_location() -> Result<Self, StoreError> {
        let mut path = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        path.push(APP_DIR);
        fs::create_dir_all(&path)?;
        path.push(STATE_FILE);
        Ok(Self { path })
    }

    /// Creates a store at an explicit path.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DisplayStore for JsonFileStore {
    fn load(&self) -> Option<DisplayRecord> {
        let content = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save(&mut self, record: &DisplayRecord) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// [`DisplayStore`] that keeps the record in memory.
///
/// Used by tests and by hosts that do not want on-disk state; the cap then
/// only spans the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<DisplayRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with a record.
    #[must_use]
    pub fn with_record(record: DisplayRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl DisplayStore for MemoryStore {
    fn load(&self) -> Option<DisplayRecord> {
        self.record.clone()
    }

    fn save(&mut self, record: &DisplayRecord) -> Result<(), StoreError> {
        self.record = Some(record.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, at: i64) -> DisplayRecord {
        DisplayRecord {
            last_shown_at: at,
            popup_id: id.to_string(),
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load().is_none());

        store.save(&record("sale", 1_000)).unwrap();
        assert_eq!(store.load(), Some(record("sale", 1_000)));

        // Each save overwrites wholesale.
        store.save(&record("welcome", 2_000)).unwrap();
        assert_eq!(store.load(), Some(record("welcome", 2_000)));
    }

    #[test]
    fn record_json_shape() {
        let json = serde_json::to_string(&record("sale", 42)).unwrap();
        assert!(json.contains("\"last_shown_at\":42"));
        assert!(json.contains("\"popup_id\":\"sale\""));

        let parsed: DisplayRecord =
            serde_json::from_str(r#"{"last_shown_at": 7, "popup_id": "x"}"#).unwrap();
        assert_eq!(parsed, record("x", 7));
    }

    #[test]
    fn file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "popkit-store-test-{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::at_path(&path);

        assert!(store.load().is_none());
        store.save(&record("sale", 99)).unwrap();
        assert_eq!(store.load(), Some(record("sale", 99)));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_treats_corrupt_content_as_absent() {
        let path = std::env::temp_dir().join(format!(
            "popkit-store-corrupt-{}.json",
            std::process::id()
        ));
        fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::at_path(&path);
        assert!(store.load().is_none());

        let _ = fs::remove_file(&path);
    }
}
