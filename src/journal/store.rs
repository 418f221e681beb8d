use super::entry::{Entry, NewEntry, UserId, TIMESTAMP_FMT};
use crate::calendar::MonthCursor;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use thiserror::Error;
use time::{OffsetDateTime, PrimitiveDateTime};

/// The system of record for journal entries
pub(crate) trait EntryStore {
    /// Returns all of `user`'s entries whose timestamps fall within `month`,
    /// in the order in which they were saved
    fn month_entries(&self, user: &UserId, month: MonthCursor) -> Result<Vec<Entry>, StoreError>;

    fn save_entry(&self, user: &UserId, entry: NewEntry) -> Result<Entry, StoreError>;
}

impl<T: EntryStore + ?Sized> EntryStore for &T {
    fn month_entries(&self, user: &UserId, month: MonthCursor) -> Result<Vec<Entry>, StoreError> {
        (**self).month_entries(user, month)
    }

    fn save_entry(&self, user: &UserId, entry: NewEntry) -> Result<Entry, StoreError> {
        (**self).save_entry(user, entry)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum StoreError {
    #[error("entry store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

type Clock = Box<dyn Fn() -> PrimitiveDateTime + Send + Sync>;

/// An [`EntryStore`] that keeps every user's entries in memory for the life of
/// the process
pub(crate) struct MemoryStore {
    entries: RwLock<HashMap<UserId, Vec<Entry>>>,
    clock: Clock,
}

impl MemoryStore {
    pub(crate) fn new() -> MemoryStore {
        MemoryStore::with_clock(local_now)
    }

    pub(crate) fn with_clock<F>(clock: F) -> MemoryStore
    where
        F: Fn() -> PrimitiveDateTime + Send + Sync + 'static,
    {
        MemoryStore {
            entries: RwLock::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Appends an already-timestamped entry to `user`'s journal
    pub(crate) fn insert(&self, user: &UserId, entry: Entry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.entry(user.clone()).or_default().push(entry);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> MemoryStore {
        MemoryStore::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl EntryStore for MemoryStore {
    fn month_entries(&self, user: &UserId, month: MonthCursor) -> Result<Vec<Entry>, StoreError> {
        let prefix = format!("{month}-");
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(user).map_or_else(Vec::new, |journal| {
            journal
                .iter()
                .filter(|e| e.is_on(&prefix))
                .cloned()
                .collect()
        }))
    }

    fn save_entry(&self, user: &UserId, entry: NewEntry) -> Result<Entry, StoreError> {
        if entry.emotion.trim().is_empty() {
            return Err(StoreError::InvalidEntry(String::from("no emotion selected")));
        }
        let timestamp = (self.clock)()
            .format(&TIMESTAMP_FMT)
            .map_err(|e| StoreError::InvalidEntry(e.to_string()))?;
        let saved =
            Entry::new(timestamp, entry.emotion, entry.notes).with_chat_log(entry.chat_log);
        self.insert(user, saved.clone())?;
        tracing::debug!(
            %user,
            timestamp = saved.timestamp(),
            chat_lines = saved.chat_log().lines().count(),
            "saved entry"
        );
        Ok(saved)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable(String::from("entry lock poisoned"))
}

fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU8, Ordering};
    use time::macros::{date, datetime};

    fn user() -> UserId {
        UserId::new("ana").unwrap()
    }

    #[test]
    fn test_month_entries_scoped_to_month() {
        let store = MemoryStore::new();
        let user = user();
        for ts in [
            "2024-02-29 23:59:59",
            "2024-03-01 00:00:00",
            "2024-03-15 12:30:00",
            "2024-04-01 08:00:00",
            "2023-03-15 12:30:00",
        ] {
            store.insert(&user, Entry::new(ts, "😌 Calm", "")).unwrap();
        }
        let march = MonthCursor::containing(date!(2024 - 03 - 10));
        let got = store.month_entries(&user, march).unwrap();
        let stamps = got.iter().map(Entry::timestamp).collect::<Vec<_>>();
        assert_eq!(stamps, ["2024-03-01 00:00:00", "2024-03-15 12:30:00"]);
    }

    #[test]
    fn test_month_entries_other_user() {
        let store = MemoryStore::new();
        store
            .insert(&user(), Entry::new("2024-03-01 00:00:00", "😌 Calm", ""))
            .unwrap();
        let march = MonthCursor::containing(date!(2024 - 03 - 10));
        let bob = UserId::new("bob").unwrap();
        assert_eq!(store.month_entries(&bob, march), Ok(Vec::new()));
    }

    #[test]
    fn test_save_entry_stamps_from_clock() {
        let minute = AtomicU8::new(0);
        let store = MemoryStore::with_clock(move || {
            let m = minute.fetch_add(1, Ordering::SeqCst);
            datetime!(2024-03-05 10:00:00).replace_minute(m).unwrap()
        });
        let user = user();
        let first = store
            .save_entry(
                &user,
                NewEntry {
                    emotion: "😊 Happy".into(),
                    notes: "walked the dog".into(),
                    chat_log: "You: hi\nAI: How can I help you with that?".into(),
                },
            )
            .unwrap();
        assert_eq!(first.timestamp(), "2024-03-05 10:00:00");
        assert_eq!(first.notes(), "walked the dog");
        assert_eq!(first.chat_log(), "You: hi\nAI: How can I help you with that?");
        let second = store
            .save_entry(
                &user,
                NewEntry {
                    emotion: "😢 Sad".into(),
                    ..NewEntry::default()
                },
            )
            .unwrap();
        assert_eq!(second.timestamp(), "2024-03-05 10:01:00");
        assert_eq!(second.chat_log(), "");
        let march = MonthCursor::containing(date!(2024 - 03 - 01));
        assert_eq!(store.month_entries(&user, march), Ok(vec![first, second]));
    }

    #[test]
    fn test_chat_log_kept() {
        let store = MemoryStore::with_clock(|| datetime!(2024-03-05 10:00:00));
        let user = user();
        store
            .save_entry(
                &user,
                NewEntry {
                    emotion: "😊 Happy".into(),
                    notes: String::new(),
                    chat_log: "You: rough morning\nAI: How can I help you with that?".into(),
                },
            )
            .unwrap();
        let march = MonthCursor::containing(date!(2024 - 03 - 05));
        let fetched = store.month_entries(&user, march).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(
            fetched[0].chat_log(),
            "You: rough morning\nAI: How can I help you with that?"
        );
    }

    #[test]
    fn test_save_entry_without_emotion() {
        let store = MemoryStore::new();
        let r = store.save_entry(&user(), NewEntry::default());
        assert!(matches!(r, Err(StoreError::InvalidEntry(_))));
    }
}
