//! Calculation history with JSON persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::CalcResult;

/// Default number of entries kept.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write history at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt history file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A recorded calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression entered by the user.
    pub expression: String,
    /// The result as it was displayed.
    pub result: String,
    /// The unformatted value, spliced back into input by `:recall`.
    pub value: f64,
    /// When the calculation was made, in seconds since the Unix epoch.
    pub timestamp: u64,
}

impl HistoryEntry {
    /// Create an entry from a successful result. Errors are not recorded.
    pub fn from_calc_result(result: &CalcResult) -> Option<Self> {
        match result {
            CalcResult::Success {
                expression,
                value,
                display_result,
                ..
            } => Some(Self {
                expression: expression.clone(),
                result: display_result.clone(),
                value: *value,
                timestamp: now(),
            }),
            CalcResult::Error { .. } => None,
        }
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Calculation history, newest entry first.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
    file_path: Option<PathBuf>,
}

impl History {
    /// Create an in-memory history with the given capacity.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            file_path: None,
        }
    }

    /// Create a history persisted at `path`.
    pub fn with_file(max_entries: usize, path: PathBuf) -> Self {
        let mut history = Self::new(max_entries);
        history.file_path = Some(path);
        history
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Load entries from the history file. A missing file is an empty history.
    pub fn load(&mut self) -> Result<(), HistoryError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|e| HistoryError::Read {
            path: path.clone(),
            source: e,
        })?;
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&content).map_err(|e| HistoryError::Parse {
                path: path.clone(),
                source: e,
            })?;

        self.entries = entries;
        self.entries.truncate(self.max_entries);
        Ok(())
    }

    /// Write entries to the history file, creating its directory if needed.
    pub fn save(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let write_err = |e| HistoryError::Write {
            path: path.clone(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json).map_err(write_err)
    }

    /// Record an entry, dropping the oldest one beyond capacity.
    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
    }

    /// Record a result if it was successful. Returns whether it was added.
    pub fn record(&mut self, result: &CalcResult) -> bool {
        match HistoryEntry::from_calc_result(result) {
            Some(entry) => {
                self.add(entry);
                true
            }
            None => false,
        }
    }

    /// Get all entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Get the entry at `index` (0 is the newest).
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Get the default history file path.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("infixcalc").join("history.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{DisplayOptions, evaluate_expression};

    fn entry(expression: &str, result: &str) -> HistoryEntry {
        HistoryEntry {
            expression: expression.to_string(),
            result: result.to_string(),
            value: result.parse().unwrap_or(0.0),
            timestamp: 0,
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new(10);
        history.add(entry("1+1", "2"));
        history.add(entry("2+2", "4"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().expression, "2+2");
        assert_eq!(history.get(1).unwrap().expression, "1+1");
        assert!(history.get(2).is_none());
    }

    #[test]
    fn test_max_entries() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.add(entry(&i.to_string(), &i.to_string()));
        }

        assert_eq!(history.len(), 3);
        let expressions: Vec<&str> = history
            .entries()
            .iter()
            .map(|e| e.expression.as_str())
            .collect();
        assert_eq!(expressions, vec!["4", "3", "2"]);
    }

    #[test]
    fn test_only_successes_recorded() {
        let options = DisplayOptions::default();
        let mut history = History::new(10);

        assert!(history.record(&evaluate_expression("6*7", &options)));
        assert!(!history.record(&evaluate_expression("1/0", &options)));
        assert!(!history.record(&evaluate_expression("10^400", &options)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.get(0).unwrap().result, "42");
        assert_eq!(history.get(0).unwrap().value, 42.0);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(10);
        history.add(entry("1", "1"));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut history = History::with_file(10, path.clone());
        history.add(entry("2^10", "1024"));
        history.add(entry("sqrt(2)", "1.414213562"));
        history.save().unwrap();

        let mut loaded = History::with_file(10, path);
        loaded.load().unwrap();
        assert_eq!(loaded.entries(), history.entries());
    }

    #[test]
    fn test_load_truncates_to_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = History::with_file(10, path.clone());
        for i in 0..10 {
            history.add(entry(&i.to_string(), &i.to_string()));
        }
        history.save().unwrap();

        let mut small = History::with_file(4, path);
        small.load().unwrap();
        assert_eq!(small.len(), 4);
        assert_eq!(small.get(0).unwrap().expression, "9");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::with_file(10, dir.path().join("absent.json"));
        history.load().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        let mut history = History::with_file(10, path);
        assert!(matches!(history.load(), Err(HistoryError::Parse { .. })));
    }
}
