use serde::Serialize;

use crate::date_key::DateKey;
use crate::store::SessionStore;
use crate::summary::round_tenth;
use crate::types::Session;

/// A session as shown in the day view, with its position in storage.
///
/// Edits and deletes must address `index` (or the session id), never the
/// display position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub index: usize,
    pub session: Session,
}

/// One day's sessions sorted by time of day, with the day's total distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: DateKey,
    pub entries: Vec<DayEntry>,
    pub total_distance: f64,
}

impl DayView {
    /// Total distance rounded to one decimal place, for display.
    pub fn rounded_total(&self) -> f64 {
        round_tenth(self.total_distance)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the view for `date`. Sessions with equal times keep storage order.
pub fn build_day_view(date: DateKey, store: &SessionStore) -> DayView {
    let sessions = store.sessions_for(date);

    let mut entries: Vec<DayEntry> = sessions
        .iter()
        .enumerate()
        .map(|(index, session)| DayEntry {
            index,
            session: session.clone(),
        })
        .collect();
    entries.sort_by(|a, b| {
        a.session
            .details
            .time_of_day
            .cmp(&b.session.details.time_of_day)
    });

    let total_distance = sessions.iter().map(|s| s.details.distance).sum();

    DayView {
        date,
        entries,
        total_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionDetails;

    fn details(time: &str, distance: f64) -> SessionDetails {
        SessionDetails {
            time_of_day: time.to_string(),
            wind_speed: 22.0,
            wind_direction: "WSW".to_string(),
            tide: "Ebb".to_string(),
            equipment: "5.3 wave sail".to_string(),
            distance,
            notes: String::new(),
        }
    }

    #[test]
    fn test_sorted_by_time_with_original_indices() {
        let date: DateKey = "2024-07-01".parse().unwrap();
        let mut store = SessionStore::new();
        store.create(date, details("14:00", 1.0));
        store.create(date, details("09:30", 2.0));
        store.create(date, details("09:30", 3.0));

        let view = build_day_view(date, &store);
        let times: Vec<&str> = view
            .entries
            .iter()
            .map(|e| e.session.details.time_of_day.as_str())
            .collect();
        assert_eq!(times, vec!["09:30", "09:30", "14:00"]);

        let indices: Vec<usize> = view.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_total_is_order_independent() {
        let date: DateKey = "2024-07-01".parse().unwrap();
        let mut store = SessionStore::new();
        store.create(date, details("18:00", 1.25));
        store.create(date, details("07:00", 2.5));

        let view = build_day_view(date, &store);
        assert_eq!(view.total_distance, 3.75);
        assert_eq!(view.rounded_total(), 3.8);
    }

    #[test]
    fn test_empty_day() {
        let view = build_day_view("2024-07-02".parse().unwrap(), &SessionStore::new());
        assert!(view.is_empty());
        assert_eq!(view.total_distance, 0.0);
    }

    #[test]
    fn test_view_does_not_reorder_storage() {
        let date: DateKey = "2024-07-01".parse().unwrap();
        let mut store = SessionStore::new();
        store.create(date, details("14:00", 1.0));
        store.create(date, details("09:30", 2.0));

        let _ = build_day_view(date, &store);
        assert_eq!(store.sessions_for(date)[0].details.time_of_day, "14:00");
    }
}
