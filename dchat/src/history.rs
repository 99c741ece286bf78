//! Session summaries kept apart from turn content.
//!
//! ```rust
//! use dchat::{HistoryStore, InMemoryHistoryStore};
//! use dcommon::SessionId;
//!
//! let history = InMemoryHistoryStore::default();
//! let session = SessionId::from("s1");
//! history.ensure(&session).unwrap();
//!
//! assert!(history.set_title_if_default(&session, "Trip plans").unwrap());
//! assert!(!history.set_title_if_default(&session, "Something else").unwrap());
//! assert_eq!(history.entry(&session).unwrap().unwrap().title, "Trip plans");
//! ```

use std::sync::{Mutex, MutexGuard};

use dcommon::{Registry, SessionId};

use crate::{ChatError, HistoryEntry};

pub const DEFAULT_TITLE: &str = "New Chat";

pub trait HistoryStore: Send + Sync {
    /// Title every new entry starts with.
    fn default_title(&self) -> &str;

    fn ensure(&self, session_id: &SessionId) -> Result<(), ChatError>;

    /// Overwrites the title only while it still equals [`HistoryStore::default_title`].
    fn set_title_if_default(
        &self,
        session_id: &SessionId,
        candidate: &str,
    ) -> Result<bool, ChatError>;

    fn rename(&self, session_id: &SessionId, title: &str) -> Result<(), ChatError>;

    fn entry(&self, session_id: &SessionId) -> Result<Option<HistoryEntry>, ChatError>;

    fn entries(&self) -> Result<Vec<HistoryEntry>, ChatError>;
}

#[derive(Debug)]
pub struct InMemoryHistoryStore {
    default_title: String,
    entries: Mutex<Registry<SessionId, String>>,
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl InMemoryHistoryStore {
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            entries: Mutex::new(Registry::new()),
        }
    }

    fn entries_guard(&self) -> Result<MutexGuard<'_, Registry<SessionId, String>>, ChatError> {
        self.entries
            .lock()
            .map_err(|_| ChatError::store("history store lock poisoned"))
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn default_title(&self) -> &str {
        &self.default_title
    }

    fn ensure(&self, session_id: &SessionId) -> Result<(), ChatError> {
        let mut entries = self.entries_guard()?;
        entries.get_or_insert_with(session_id.clone(), || self.default_title.clone());
        Ok(())
    }

    fn set_title_if_default(
        &self,
        session_id: &SessionId,
        candidate: &str,
    ) -> Result<bool, ChatError> {
        let mut entries = self.entries_guard()?;
        match entries.get_mut(session_id) {
            Some(title) if *title == self.default_title => {
                *title = candidate.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn rename(&self, session_id: &SessionId, title: &str) -> Result<(), ChatError> {
        let mut entries = self.entries_guard()?;
        let current = entries
            .get_mut(session_id)
            .ok_or_else(|| ChatError::unknown_session(session_id))?;
        *current = title.to_string();
        Ok(())
    }

    fn entry(&self, session_id: &SessionId) -> Result<Option<HistoryEntry>, ChatError> {
        let entries = self.entries_guard()?;
        Ok(entries
            .get(session_id)
            .map(|title| HistoryEntry::new(session_id.clone(), title.clone())))
    }

    fn entries(&self) -> Result<Vec<HistoryEntry>, ChatError> {
        let entries = self.entries_guard()?;
        Ok(entries
            .iter()
            .map(|(id, title)| HistoryEntry::new(id.clone(), title.clone()))
            .collect())
    }
}

/// Trimmed prefix of `prompt` holding at most `max_chars` characters.
pub fn title_prefix(prompt: &str, max_chars: usize) -> String {
    let prefix = prompt.trim().chars().take(max_chars).collect::<String>();
    prefix.trim_end().to_string()
}
