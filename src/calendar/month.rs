use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, Month::*};

const MONTHS_IN_YEAR: i64 = 12;

/// A `(year, month)` pair identifying one page of the calendar.
///
/// Internally this is the first day of the month, so every cursor is a month
/// that `time` can represent and the month number is always in `1..=12`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct MonthCursor {
    first: Date,
}

impl MonthCursor {
    pub(crate) fn containing(date: Date) -> Self {
        MonthCursor {
            first: date.replace_day(1).unwrap_or(date),
        }
    }

    pub(crate) fn new(year: i32, month: Month) -> Result<Self, OutOfTimeError> {
        Date::from_calendar_date(year, month, 1)
            .map(|first| MonthCursor { first })
            .map_err(|_| OutOfTimeError)
    }

    pub(crate) fn year(self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(self) -> Month {
        self.first.month()
    }

    pub(crate) fn first_day(self) -> Date {
        self.first
    }

    /// Moves the cursor by `delta` months in either direction, carrying
    /// overflow and underflow into the year.
    pub(crate) fn checked_add_months(self, delta: i32) -> Result<Self, OutOfTimeError> {
        let total = i64::from(self.year()) * MONTHS_IN_YEAR
            + i64::from(u8::from(self.month()) - 1)
            + i64::from(delta);
        let year = i32::try_from(total.div_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let month = u8::try_from(total.rem_euclid(MONTHS_IN_YEAR) + 1)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(OutOfTimeError)?;
        MonthCursor::new(year, month)
    }

    /// Number of days in the month
    pub(crate) fn length(self) -> u8 {
        match self.month() {
            February => {
                if Date::from_calendar_date(self.year(), February, 29).is_ok() {
                    29
                } else {
                    28
                }
            }
            April | June | September | November => 30,
            _ => 31,
        }
    }

    pub(crate) fn contains_day(self, day: u8) -> bool {
        (1..=self.length()).contains(&day)
    }

    /// The `YYYY-MM-DD` prefix that timestamps on `day` of this month start
    /// with
    pub(crate) fn day_prefix(self, day: u8) -> String {
        format!("{self}-{day:02}")
    }

    /// Title shown above the month grid, e.g. "MARCH 2024"
    pub(crate) fn title(self) -> String {
        format!("{} {}", self.month().to_string().to_uppercase(), self.year())
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

/// Parses `YYYY-MM`
impl FromStr for MonthCursor {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<MonthCursor, ParseMonthError> {
        let err = || ParseMonthError(s.to_owned());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() < 4 || month.len() != 2 {
            return Err(err());
        }
        let year = year.parse::<i32>().map_err(|_| err())?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(err)?;
        MonthCursor::new(year, month).map_err(|_| err())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid month {0:?}; expected YYYY-MM")]
pub(crate) struct ParseMonthError(String);
