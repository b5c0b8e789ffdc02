//! Month grids with a per-day activity flag.

use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

use crate::date_key::DateKey;
use crate::store::SessionStore;

pub const DAYS_PER_WEEK: usize = 7;

/// A calendar month. Navigation rolls the year over at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// `month` is 1-based; `None` if it is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Move by `delta` months, negative to go back.
    pub fn shift(self, delta: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(delta);
        let year = index
            .div_euclid(12)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let month = index.rem_euclid(12) as u32 + 1;
        Self { year, month }
    }

    /// Weekday of the 1st, counting Sunday as 0.
    pub fn first_weekday(&self) -> u32 {
        self.day(1)
            .map(|key| key.date().weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Key for `day` of this month, if that day exists.
    pub fn day(&self, day: u32) -> Option<DateKey> {
        DateKey::from_ymd(self.year, self.month, day)
    }

    /// Long English month name, e.g. "October".
    pub fn name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day { day: u32, has_activity: bool },
}

impl CalendarCell {
    pub fn is_blank(&self) -> bool {
        matches!(self, CalendarCell::Blank)
    }
}

/// Week rows for one month, Sunday first. Every row has exactly seven cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub month: CalendarMonth,
    pub title: String,
    pub rows: Vec<[CalendarCell; DAYS_PER_WEEK]>,
}

impl CalendarGrid {
    /// Number of cells holding a day.
    pub fn day_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_blank())
            .count()
    }
}

/// Lay out `month`, flagging every day that has at least one session.
pub fn build_grid(month: CalendarMonth, store: &SessionStore) -> CalendarGrid {
    let mut cells: Vec<CalendarCell> = Vec::new();

    for _ in 0..month.first_weekday() {
        cells.push(CalendarCell::Blank);
    }

    for day in 1..=month.days_in_month() {
        let has_activity = month
            .day(day)
            .map(|key| !store.sessions_for(key).is_empty())
            .unwrap_or(false);
        cells.push(CalendarCell::Day { day, has_activity });
    }

    while cells.len() % DAYS_PER_WEEK != 0 {
        cells.push(CalendarCell::Blank);
    }

    let rows = cells
        .chunks_exact(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut row = [CalendarCell::Blank; DAYS_PER_WEEK];
            row.copy_from_slice(chunk);
            row
        })
        .collect();

    CalendarGrid {
        month,
        title: month.to_string(),
        rows,
    }
}
