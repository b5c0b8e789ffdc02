use chrono::NaiveDate;

use tidelog_sessions::{
    build_day_view, build_grid, export_csv, summarize, CalendarCell, CalendarMonth, DateKey,
    SessionDetails, SessionStore, StoreError, CSV_HEADER,
};

fn details(time: &str, distance: f64, notes: &str) -> SessionDetails {
    SessionDetails {
        time_of_day: time.to_string(),
        wind_speed: 17.5,
        wind_direction: "SSW".to_string(),
        tide: "Rising".to_string(),
        equipment: "12m kite".to_string(),
        distance,
        notes: notes.to_string(),
    }
}

fn day(s: &str) -> DateKey {
    s.parse().unwrap()
}

/// Helper: a store with a few days of sessions, stored out of time order.
fn create_test_store() -> SessionStore {
    let mut store = SessionStore::new();
    store.create(day("2024-01-05"), details("14:00", 3.0, "gusty"));
    store.create(day("2024-01-05"), details("09:30", 1.5, ""));
    store.create(day("2024-01-20"), details("11:15", 2.0, "flat water\nnice"));
    store.create(day("2024-02-01"), details("16:45", 5.0, "long downwinder"));
    store
}

// ============================================================
// Blob tests
// ============================================================

/// Data written by the original browser app: no ids, numbers only.
const LEGACY_BLOB: &str = r#"{"2024-03-02":[{"timeOfDay":"10:00","windSpeed":18,"windDirection":"NW","tide":"Low","equipment":"Freeride 120l","distance":7.5,"notes":""},{"timeOfDay":"08:00","windSpeed":null,"windDirection":"NW","tide":"Low","equipment":"Freeride 120l","distance":2}],"2024-01-15":[{"timeOfDay":"12:00","windSpeed":25,"windDirection":"W","tide":"High","equipment":"Wave 86l","distance":3.25,"notes":"big\nwaves"}]}"#;

#[test]
fn test_legacy_blob_loads() {
    let store = SessionStore::from_blob(LEGACY_BLOB).unwrap();

    assert_eq!(store.date_count(), 2);
    assert_eq!(store.session_count(), 3);

    let march = store.sessions_for(day("2024-03-02"));
    assert_eq!(march[0].details.distance, 7.5);
    assert_eq!(march[1].details.wind_speed, 0.0);
    assert_eq!(march[1].details.notes, "");
    assert_ne!(march[0].id, march[1].id);
}

#[test]
fn test_legacy_blob_ids_are_stable_once_saved() {
    let store = SessionStore::from_blob(LEGACY_BLOB).unwrap();
    let saved = store.to_blob().unwrap();

    let reloaded = SessionStore::from_blob(&saved).unwrap();
    assert_eq!(reloaded, store);
    assert_eq!(reloaded.to_blob().unwrap(), saved);
}

#[test]
fn test_idempotent_resave() {
    let store = create_test_store();
    assert_eq!(store.to_blob().unwrap(), store.to_blob().unwrap());
}

// ============================================================
// Invariant tests
// ============================================================

#[test]
fn test_deleting_only_session_clears_date_everywhere() {
    let mut store = SessionStore::new();
    store.create(day("2024-02-14"), details("10:00", 4.0, ""));

    let grid = build_grid(CalendarMonth::new(2024, 2).unwrap(), &store);
    assert!(grid
        .rows
        .iter()
        .flatten()
        .any(|c| *c == CalendarCell::Day { day: 14, has_activity: true }));

    store.delete(day("2024-02-14"), 0).unwrap();

    assert!(store.sessions_for(day("2024-02-14")).is_empty());
    assert!(store.entries().all(|(date, _)| date != day("2024-02-14")));
    assert!(!store.to_blob().unwrap().contains("2024-02-14"));

    let grid = build_grid(CalendarMonth::new(2024, 2).unwrap(), &store);
    assert!(grid
        .rows
        .iter()
        .flatten()
        .any(|c| *c == CalendarCell::Day { day: 14, has_activity: false }));
}

#[test]
fn test_edit_addresses_storage_slot_not_display_slot() {
    let mut store = SessionStore::new();
    store.create(day("2024-01-05"), details("14:00", 3.0, "afternoon"));
    store.create(day("2024-01-05"), details("09:30", 1.5, "morning"));

    // Display order is morning, afternoon; the second displayed item is storage slot 0.
    let view = build_day_view(day("2024-01-05"), &store);
    let second = &view.entries[1];
    assert_eq!(second.session.details.notes, "afternoon");
    assert_eq!(second.index, 0);

    store
        .update(day("2024-01-05"), second.index, details("15:00", 4.0, "afternoon, edited"))
        .unwrap();

    let stored = store.sessions_for(day("2024-01-05"));
    assert_eq!(stored[0].details.notes, "afternoon, edited");
    assert_eq!(stored[1].details.notes, "morning");
    assert_eq!(stored[0].id, second.session.id);

    let view = build_day_view(day("2024-01-05"), &store);
    store.delete(day("2024-01-05"), view.entries[0].index).unwrap();
    let stored = store.sessions_for(day("2024-01-05"));
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].details.notes, "afternoon, edited");
}

#[test]
fn test_stale_index_is_rejected() {
    let mut store = SessionStore::new();
    store.create(day("2024-01-05"), details("09:30", 1.5, ""));
    store.delete(day("2024-01-05"), 0).unwrap();

    let err = store.delete(day("2024-01-05"), 0).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 0, len: 0, .. }));
    assert_eq!(
        err.to_string(),
        "No session at position 0 on 2024-01-05 (0 stored)"
    );
}

// ============================================================
// Summary tests
// ============================================================

#[test]
fn test_summary_example() {
    let mut store = SessionStore::new();
    store.create(day("2024-01-05"), details("10:00", 3.0, ""));
    store.create(day("2024-01-20"), details("10:00", 2.0, ""));
    store.create(day("2024-02-01"), details("10:00", 5.0, ""));

    let now = NaiveDate::from_ymd_opt(2024, 2, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let summary = summarize(&store, now);

    assert_eq!(summary.month, 5.0);
    assert_eq!(summary.year, 10.0);
    assert!(summary.week <= summary.month);
}

// ============================================================
// CSV tests
// ============================================================

/// Parse an export produced from fields without commas.
fn parse_csv(csv: &str) -> Vec<(DateKey, usize, SessionDetails)> {
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));

    lines
        .map(|line| {
            let cols: Vec<&str> = line.split(',').collect();
            assert_eq!(cols.len(), 9, "unexpected row: {}", line);
            let position: usize = cols[1].parse().unwrap();
            (
                cols[0].parse().unwrap(),
                position - 1,
                SessionDetails {
                    time_of_day: cols[2].to_string(),
                    wind_speed: cols[3].parse().unwrap(),
                    wind_direction: cols[4].to_string(),
                    tide: cols[5].to_string(),
                    equipment: cols[6].to_string(),
                    distance: cols[7].parse().unwrap(),
                    notes: cols[8].to_string(),
                },
            )
        })
        .collect()
}

#[test]
fn test_csv_round_trip() {
    let store = create_test_store();
    let csv = export_csv(&store);
    assert!(csv.ends_with('\n'));

    let rows = parse_csv(&csv);
    assert_eq!(rows.len(), store.session_count());

    for (date, index, parsed) in rows {
        let stored = &store.sessions_for(date)[index].details;
        let mut expected = stored.clone();
        expected.notes = stored.notes.replace('\n', " ");
        assert_eq!(parsed, expected);
    }
}

#[test]
fn test_csv_keeps_storage_order_within_a_day() {
    let csv = export_csv(&create_test_store());
    let jan5: Vec<&str> = csv
        .lines()
        .filter(|l| l.starts_with("2024-01-05"))
        .collect();

    assert_eq!(jan5.len(), 2);
    assert!(jan5[0].starts_with("2024-01-05,1,14:00,"));
    assert!(jan5[1].starts_with("2024-01-05,2,09:30,"));
}
