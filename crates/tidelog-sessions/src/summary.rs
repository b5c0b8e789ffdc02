//! Rolling distance totals for the current week, month and year.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::store::SessionStore;

/// Distance totals for the windows ending at "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceSummary {
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

impl DistanceSummary {
    /// Each total rounded to one decimal place, for display.
    pub fn rounded(&self) -> Self {
        Self {
            week: round_tenth(self.week),
            month: round_tenth(self.month),
            year: round_tenth(self.year),
        }
    }
}

/// Start dates of the three windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryWindows {
    /// Most recent Sunday on or before today.
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
    pub year_start: NaiveDate,
}

impl SummaryWindows {
    pub fn anchored_at(now: NaiveDateTime) -> Self {
        let today = now.date();
        let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
        Self {
            week_start,
            month_start: today.with_day(1).unwrap_or(today),
            year_start: today.with_ordinal(1).unwrap_or(today),
        }
    }
}

/// Sum distances per window. A day counts toward every window it falls in;
/// each total is accumulated on its own rather than derived from another.
pub fn summarize(store: &SessionStore, now: NaiveDateTime) -> DistanceSummary {
    let windows = SummaryWindows::anchored_at(now);
    let mut summary = DistanceSummary::default();

    for (date, sessions) in store.entries() {
        let date = date.date();
        let day_sum: f64 = sessions.iter().map(|s| s.details.distance).sum();

        if date >= windows.year_start {
            summary.year += day_sum;
        }
        if date >= windows.month_start {
            summary.month += day_sum;
        }
        if date >= windows.week_start {
            summary.week += day_sum;
        }
    }

    tracing::debug!(
        week = summary.week,
        month = summary.month,
        year = summary.year,
        "Computed distance summary"
    );

    summary
}

/// Round to one decimal place, halves away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionDetails;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(15, 45, 0)
            .unwrap()
    }

    fn add(store: &mut SessionStore, date: &str, distance: f64) {
        store.create(
            date.parse().unwrap(),
            SessionDetails {
                time_of_day: "10:00".to_string(),
                wind_speed: 12.0,
                wind_direction: "NE".to_string(),
                tide: "Mid".to_string(),
                equipment: "foil".to_string(),
                distance,
                notes: String::new(),
            },
        );
    }

    #[test]
    fn test_windows_from_a_saturday() {
        // 2024-02-10 is a Saturday
        let windows = SummaryWindows::anchored_at(at("2024-02-10"));
        assert_eq!(windows.week_start, NaiveDate::from_ymd_opt(2024, 2, 4).unwrap());
        assert_eq!(windows.month_start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(windows.year_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_week_starts_today_on_sunday() {
        let windows = SummaryWindows::anchored_at(at("2024-02-04"));
        assert_eq!(windows.week_start, NaiveDate::from_ymd_opt(2024, 2, 4).unwrap());
    }

    #[test]
    fn test_week_can_start_in_previous_year() {
        // 2025-01-02 is a Thursday; the week began Sunday 2024-12-29
        let windows = SummaryWindows::anchored_at(at("2025-01-02"));
        assert_eq!(windows.week_start, NaiveDate::from_ymd_opt(2024, 12, 29).unwrap());
    }

    #[test]
    fn test_example_totals() {
        let mut store = SessionStore::new();
        add(&mut store, "2024-01-05", 3.0);
        add(&mut store, "2024-01-20", 2.0);
        add(&mut store, "2024-02-01", 5.0);

        let summary = summarize(&store, at("2024-02-10"));
        assert_eq!(summary.month, 5.0);
        assert_eq!(summary.year, 10.0);
        assert_eq!(summary.week, 0.0);
        assert!(summary.week <= summary.month);
    }

    #[test]
    fn test_week_counts_days_since_sunday() {
        let mut store = SessionStore::new();
        add(&mut store, "2024-02-03", 1.0); // Saturday before
        add(&mut store, "2024-02-04", 2.0); // Sunday
        add(&mut store, "2024-02-04", 0.5);
        add(&mut store, "2024-02-08", 4.0);

        let summary = summarize(&store, at("2024-02-10"));
        assert_eq!(summary.week, 6.5);
        assert_eq!(summary.month, 7.5);
    }

    #[test]
    fn test_previous_years_are_excluded() {
        let mut store = SessionStore::new();
        add(&mut store, "2023-12-31", 9.0);

        let summary = summarize(&store, at("2024-01-01"));
        assert_eq!(summary, DistanceSummary::default());
    }

    #[test]
    fn test_empty_store() {
        let summary = summarize(&SessionStore::new(), at("2024-06-15"));
        assert_eq!(summary, DistanceSummary::default());
    }

    #[test]
    fn test_rounding_is_for_display_only() {
        let mut store = SessionStore::new();
        add(&mut store, "2024-02-05", 0.04);
        add(&mut store, "2024-02-06", 0.04);

        let summary = summarize(&store, at("2024-02-10"));
        assert!((summary.week - 0.08).abs() < 1e-9);
        assert_eq!(summary.rounded().week, 0.1);
    }
}
