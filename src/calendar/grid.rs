use super::month::MonthCursor;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;
use time::{Weekday, Weekday::*};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Which weekday occupies the leftmost column of the month grid
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column of `wd` in a grid starting on this weekday
    pub(crate) fn column(self, wd: Weekday) -> usize {
        usize::from(match self {
            WeekStart::Sunday => wd.number_days_from_sunday(),
            WeekStart::Monday => wd.number_days_from_monday(),
        })
    }

    pub(crate) fn first_weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Sunday,
            WeekStart::Monday => Monday,
        }
    }

    /// The seven weekdays in column order
    pub(crate) fn weekdays(self) -> impl Iterator<Item = Weekday> {
        std::iter::successors(Some(self.first_weekday()), |wd| Some(wd.next())).take(DAYS_IN_WEEK)
    }
}

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(ParseWeekStartError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid week start {0:?}; expected \"sunday\" or \"monday\"")]
pub(crate) struct ParseWeekStartError(String);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum DayCell {
    #[default]
    Blank,
    Day(u8),
}

impl DayCell {
    pub(crate) fn day(self) -> Option<u8> {
        match self {
            DayCell::Blank => None,
            DayCell::Day(d) => Some(d),
        }
    }
}

pub(crate) type Week = [DayCell; DAYS_IN_WEEK];

/// The layout of one month as rows of seven cells, with blank cells padding
/// the first and last weeks
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month: MonthCursor,
    week_start: WeekStart,
    // Invariant: Every day of `month` appears exactly once, in order
    weeks: Vec<Week>,
}

impl MonthGrid {
    pub(crate) fn new(month: MonthCursor, week_start: WeekStart) -> MonthGrid {
        let mut weeks = Vec::with_capacity(6);
        let mut week = [DayCell::Blank; DAYS_IN_WEEK];
        let mut col = week_start.column(month.first_day().weekday());
        for day in 1..=month.length() {
            week[col] = DayCell::Day(day);
            col += 1;
            if col == DAYS_IN_WEEK {
                weeks.push(std::mem::take(&mut week));
                col = 0;
            }
        }
        if col > 0 {
            weeks.push(week);
        }
        MonthGrid {
            month,
            week_start,
            weeks,
        }
    }

    pub(crate) fn month(&self) -> MonthCursor {
        self.month
    }

    pub(crate) fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }
}
