use std::fmt;
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, PrimitiveDateTime,
};

/// Format of the timestamps that entry stores hand out
pub(crate) static TIMESTAMP_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

static DISPLAY_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

const NOTES_PLACEHOLDER: &str = "No notes";

/// The emotions offered by the log form, each a leading emoji followed by a
/// label
pub(crate) static EMOTIONS: &[&str] = &[
    "😊 Happy",
    "😢 Sad",
    "😡 Angry",
    "😲 Surprised",
    "😰 Anxious",
    "😌 Calm",
];

/// Opaque identity of the journal's owner, used as the store's query key
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct UserId(String);

impl UserId {
    /// Returns `None` for an empty or all-whitespace identifier, which is
    /// treated the same as no identity at all
    pub(crate) fn new<S: Into<String>>(s: S) -> Option<UserId> {
        let s = s.into();
        (!s.trim().is_empty()).then_some(UserId(s))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logged mood record.  Entries are snapshots handed out by a store and
/// are never modified afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Entry {
    timestamp: String,
    emotion: String,
    notes: String,
    chat_log: String,
}

impl Entry {
    pub(crate) fn new<T, E, N>(timestamp: T, emotion: E, notes: N) -> Entry
    where
        T: Into<String>,
        E: Into<String>,
        N: Into<String>,
    {
        Entry {
            timestamp: timestamp.into(),
            emotion: emotion.into(),
            notes: notes.into(),
            chat_log: String::new(),
        }
    }

    /// Attaches the conversation held while the entry was being written
    pub(crate) fn with_chat_log<C: Into<String>>(mut self, chat_log: C) -> Entry {
        self.chat_log = chat_log.into();
        self
    }

    pub(crate) fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub(crate) fn emotion(&self) -> &str {
        &self.emotion
    }

    pub(crate) fn notes(&self) -> &str {
        &self.notes
    }

    pub(crate) fn chat_log(&self) -> &str {
        &self.chat_log
    }

    pub(crate) fn notes_or_placeholder(&self) -> &str {
        if self.notes().is_empty() {
            NOTES_PLACEHOLDER
        } else {
            self.notes()
        }
    }

    /// The leading emoji token of the emotion, shown in calendar cells
    pub(crate) fn emoji(&self) -> &str {
        self.emotion.split_whitespace().next().unwrap_or_default()
    }

    pub(crate) fn is_on(&self, date_prefix: &str) -> bool {
        self.timestamp.starts_with(date_prefix)
    }

    pub(crate) fn datetime(&self) -> Result<PrimitiveDateTime, TimestampError> {
        PrimitiveDateTime::parse(&self.timestamp, &TIMESTAMP_FMT).map_err(|source| {
            TimestampError {
                timestamp: self.timestamp.clone(),
                source,
            }
        })
    }

    /// `DD/MM/YYYY HH:MM`, or the raw timestamp if it cannot be parsed
    pub(crate) fn display_timestamp(&self) -> String {
        self.datetime()
            .ok()
            .and_then(|dt| dt.format(&DISPLAY_FMT).ok())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

#[derive(Debug, Error)]
#[error("invalid entry timestamp {timestamp:?}")]
pub(crate) struct TimestampError {
    timestamp: String,
    source: time::error::Parse,
}

/// A mood record that has not been saved yet; the store assigns its
/// timestamp
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct NewEntry {
    pub(crate) emotion: String,
    pub(crate) notes: String,
    pub(crate) chat_log: String,
}
