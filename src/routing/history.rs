//! Navigation history.
//!
//! # Responsibilities
//! - Record navigation entries (push / replace)
//! - Walk the stack (back / forward) with a cursor
//! - Render paths for the configured history mode
//!
//! # Design Decisions
//! - History is a trait so an embedding shell can back it with a real
//!   location API; `MemoryHistory` is the in-process implementation
//! - Pushing after going back discards the forward entries

use std::fmt;

use serde::{Deserialize, Serialize};

/// How paths are written into the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// `/logs?status=500`
    #[default]
    Browser,
    /// `/#/logs?status=500`
    Hash,
}

impl HistoryMode {
    /// Render an application path as a location href.
    pub fn href(&self, path: &str) -> String {
        match self {
            HistoryMode::Browser => path.to_string(),
            HistoryMode::Hash => format!("/#{}", path),
        }
    }

    /// Recover the application path from a location href.
    pub fn path_from_location(&self, location: &str) -> String {
        match self {
            HistoryMode::Browser => location.to_string(),
            HistoryMode::Hash => match location.split_once('#') {
                Some((_, path)) if path.starts_with('/') => path.to_string(),
                _ => "/".to_string(),
            },
        }
    }
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryMode::Browser => f.write_str("browser"),
            HistoryMode::Hash => f.write_str("hash"),
        }
    }
}

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
    Push,
    Replace,
    /// Moving through existing entries (back / forward).
    Pop,
}

/// One entry on the history stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Application path, including any query.
    pub path: String,
    /// Location href as rendered for the history mode.
    pub href: String,
}

/// History stack driven by the router.
pub trait History: Send + fmt::Debug {
    /// Add an entry after the cursor, discarding any forward entries.
    fn push(&mut self, entry: HistoryEntry);

    /// Overwrite the entry at the cursor (or push if the stack is empty).
    fn replace(&mut self, entry: HistoryEntry);

    /// Entry at the cursor.
    fn current(&self) -> Option<&HistoryEntry>;

    /// Entry `offset` steps away from the cursor, without moving.
    fn peek(&self, offset: isize) -> Option<&HistoryEntry>;

    /// Move the cursor by `offset`. Returns false if out of range.
    fn go(&mut self, offset: isize) -> bool;

    /// Number of entries on the stack.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory history stack.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn index(&self, offset: isize) -> Option<usize> {
        let cursor = self.cursor? as isize;
        let target = cursor.checked_add(offset)?;
        if target < 0 || target as usize >= self.entries.len() {
            return None;
        }
        Some(target as usize)
    }
}

impl History for MemoryHistory {
    fn push(&mut self, entry: HistoryEntry) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    fn replace(&mut self, entry: HistoryEntry) {
        match self.cursor {
            Some(cursor) => self.entries[cursor] = entry,
            None => self.push(entry),
        }
    }

    fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.map(|cursor| &self.entries[cursor])
    }

    fn peek(&self, offset: isize) -> Option<&HistoryEntry> {
        self.index(offset).map(|index| &self.entries[index])
    }

    fn go(&mut self, offset: isize) -> bool {
        match self.index(offset) {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> HistoryEntry {
        HistoryEntry {
            path: path.to_string(),
            href: HistoryMode::Browser.href(path),
        }
    }

    #[test]
    fn test_href_rendering() {
        assert_eq!(HistoryMode::Browser.href("/logs?ip=1"), "/logs?ip=1");
        assert_eq!(HistoryMode::Hash.href("/logs?ip=1"), "/#/logs?ip=1");
        assert_eq!(HistoryMode::Hash.path_from_location("/#/logs"), "/logs");
        assert_eq!(HistoryMode::Hash.path_from_location("/"), "/");
        assert_eq!(HistoryMode::Browser.path_from_location("/logs"), "/logs");
    }

    #[test]
    fn test_push_back_forward() {
        let mut history = MemoryHistory::new();
        assert!(history.current().is_none());
        assert!(!history.go(-1));

        history.push(entry("/"));
        history.push(entry("/a"));
        history.push(entry("/b"));
        assert_eq!(history.current().unwrap().path, "/b");

        assert_eq!(history.peek(-1).unwrap().path, "/a");
        assert!(history.go(-2));
        assert_eq!(history.current().unwrap().path, "/");
        assert!(!history.go(-1));
        assert!(history.go(1));
        assert_eq!(history.current().unwrap().path, "/a");
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = MemoryHistory::new();
        history.push(entry("/"));
        history.push(entry("/a"));
        history.go(-1);
        history.push(entry("/c"));

        let paths: Vec<_> = history.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/c"]);
        assert!(history.peek(1).is_none());
    }

    #[test]
    fn test_replace() {
        let mut history = MemoryHistory::new();
        history.replace(entry("/"));
        assert_eq!(history.len(), 1);

        history.replace(entry("/a"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().path, "/a");
    }
}
