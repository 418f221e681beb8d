use super::grid::{MonthGrid, WeekStart};
use super::month::{MonthCursor, OutOfTimeError};
use crate::journal::{Entry, EntryStore, StoreError, UserId};
use serde::Deserialize;
use thiserror::Error;
use time::Date;

/// What happens to the displayed entries when a fetch fails
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FailurePolicy {
    /// Keep showing the last successfully loaded month
    #[default]
    Retain,
    /// Empty the entry list as soon as a fetch starts
    Clear,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct NavigatorConfig {
    pub(crate) week_start: WeekStart,
    pub(crate) on_failure: FailurePolicy,
}

/// Entries of one month as last handed out by the store
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LoadedMonth {
    month: MonthCursor,
    entries: Vec<Entry>,
}

impl LoadedMonth {
    pub(crate) fn month(&self) -> MonthCursor {
        self.month
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// A request to fetch one month's entries, issued by
/// [`CalendarNavigator::begin_reload()`] or
/// [`CalendarNavigator::begin_advance()`] and redeemed with
/// [`CalendarNavigator::complete()`].  A ticket can be redeemed only once.
#[derive(Debug, Eq, PartialEq)]
#[must_use]
pub(crate) struct FetchTicket {
    generation: u64,
    month: MonthCursor,
    user: Option<UserId>,
}

impl FetchTicket {
    pub(crate) fn month(&self) -> MonthCursor {
        self.month
    }

    /// Performs the fetch.  Without a user there is nothing to fetch, and the
    /// store is not consulted.
    pub(crate) fn fetch<S: EntryStore>(&self, store: &S) -> Result<Vec<Entry>, StoreError> {
        match self.user {
            Some(ref user) => store.month_entries(user, self.month),
            None => Ok(Vec::new()),
        }
    }
}

/// Owns the month currently shown by the calendar and the entries loaded for
/// it.
///
/// Every `begin_*` call supersedes any fetch still outstanding: completing an
/// older ticket is rejected with [`NavigatorError::Superseded`] and leaves the
/// navigator untouched, so a slow fetch for one month can never overwrite the
/// entries of a month requested after it.  The blocking [`advance()`] and
/// [`reload()`] take `&mut self` and so can never overlap on one navigator.
///
/// [`advance()`]: CalendarNavigator::advance
/// [`reload()`]: CalendarNavigator::reload
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarNavigator<S> {
    store: S,
    user: Option<UserId>,
    config: NavigatorConfig,
    cursor: MonthCursor,
    loaded: Option<LoadedMonth>,
    generation: u64,
}

impl<S: EntryStore> CalendarNavigator<S> {
    /// Creates a navigator positioned on the month containing `today`.
    /// Nothing is fetched until [`initialize()`](CalendarNavigator::initialize)
    /// is called.
    pub(crate) fn new(store: S, today: Date, config: NavigatorConfig) -> Self {
        CalendarNavigator {
            store,
            user: None,
            config,
            cursor: MonthCursor::containing(today),
            loaded: None,
            generation: 0,
        }
    }

    pub(crate) fn user(mut self, user: Option<UserId>) -> Self {
        self.user = user;
        self
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub(crate) fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    /// The month the calendar shows: the loaded month, or the cursor's month
    /// if nothing is loaded.  This differs from
    /// [`cursor()`](CalendarNavigator::cursor) only after a failed fetch under
    /// [`FailurePolicy::Retain`] or while a fetch is outstanding.
    pub(crate) fn displayed_month(&self) -> MonthCursor {
        self.loaded.as_ref().map_or(self.cursor, LoadedMonth::month)
    }

    pub(crate) fn initialize(&mut self, today: Date) -> Result<(), NavigatorError> {
        self.cursor = MonthCursor::containing(today);
        tracing::debug!(month = %self.cursor, "initialized calendar");
        self.reload()
    }

    pub(crate) fn advance(&mut self, delta: i32) -> Result<(), NavigatorError> {
        let ticket = self.begin_advance(delta)?;
        let result = ticket.fetch(&self.store);
        self.complete(ticket, result)
    }

    pub(crate) fn reload(&mut self) -> Result<(), NavigatorError> {
        let ticket = self.begin_reload();
        let result = ticket.fetch(&self.store);
        self.complete(ticket, result)
    }

    /// Moves the cursor by `delta` months and returns the ticket for fetching
    /// the new month's entries.  On error, nothing changes.
    pub(crate) fn begin_advance(&mut self, delta: i32) -> Result<FetchTicket, NavigatorError> {
        let cursor = self.cursor.checked_add_months(delta)?;
        tracing::debug!(from = %self.cursor, to = %cursor, delta, "moving calendar");
        self.cursor = cursor;
        Ok(self.begin_reload())
    }

    pub(crate) fn begin_reload(&mut self) -> FetchTicket {
        self.generation += 1;
        if self.config.on_failure == FailurePolicy::Clear {
            self.loaded = None;
        }
        FetchTicket {
            generation: self.generation,
            month: self.cursor,
            user: self.user.clone(),
        }
    }

    /// Applies the outcome of a fetch.  On success, the entry list is replaced
    /// wholesale.
    pub(crate) fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Entry>, StoreError>,
    ) -> Result<(), NavigatorError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                requested = %ticket.month(),
                current = %self.cursor,
                "discarding superseded fetch"
            );
            return Err(NavigatorError::Superseded {
                requested: ticket.month(),
                current: self.cursor,
            });
        }
        match result {
            Ok(entries) => {
                tracing::debug!(month = %ticket.month(), entries = entries.len(), "loaded entries");
                self.loaded = Some(LoadedMonth {
                    month: ticket.month(),
                    entries,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(month = %ticket.month(), error = %e, "failed to load entries");
                Err(NavigatorError::StoreUnavailable(e))
            }
        }
    }

    /// Entries of the loaded month whose timestamps fall on `day`, in fetch
    /// order
    pub(crate) fn entries_for_day(&self, day: u8) -> Vec<&Entry> {
        let Some(ref loaded) = self.loaded else {
            return Vec::new();
        };
        if !loaded.month.contains_day(day) {
            return Vec::new();
        }
        let prefix = loaded.month.day_prefix(day);
        loaded
            .entries()
            .iter()
            .filter(|e| e.is_on(&prefix))
            .collect()
    }

    /// Layout of the [displayed month](CalendarNavigator::displayed_month)
    pub(crate) fn month_grid(&self) -> MonthGrid {
        MonthGrid::new(self.displayed_month(), self.config.week_start)
    }
}

#[derive(Debug, Error)]
pub(crate) enum NavigatorError {
    #[error("could not load entries")]
    StoreUnavailable(#[source] StoreError),
    #[error("fetch for {requested} was superseded by a request for {current}")]
    Superseded {
        requested: MonthCursor,
        current: MonthCursor,
    },
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}
