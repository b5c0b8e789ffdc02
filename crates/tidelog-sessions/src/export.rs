//! Flat CSV export of the whole store.
//!
//! Fields are written as-is: commas and quotes inside a field are not
//! escaped, so free-text fields containing them shift columns for strict CSV
//! readers. Line breaks in notes become single spaces.
//!
//! The legacy browser export replaced only `\n`. Here `\r\n` and lone `\r`
//! are flattened as well, so notes typed on Windows or classic Mac OS never
//! leave a stray carriage return inside a row.

use crate::store::SessionStore;

pub const CSV_FILE_NAME: &str = "water_sports_data.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const CSV_HEADER: &str =
    "Date,Session,Time of Day,Wind Speed,Wind Direction,Tide,Equipment,Distance,Notes";

/// One row per session in store order; `Session` is the 1-based storage position.
pub fn export_csv(store: &SessionStore) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');

    for (date, sessions) in store.entries() {
        for (index, session) in sessions.iter().enumerate() {
            let d = &session.details;
            let row = [
                date.to_string(),
                (index + 1).to_string(),
                d.time_of_day.clone(),
                d.wind_speed.to_string(),
                d.wind_direction.clone(),
                d.tide.clone(),
                d.equipment.clone(),
                d.distance.to_string(),
                flatten_notes(&d.notes),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
    }

    out
}

/// Number of data rows `export_csv` would write.
pub fn row_count(store: &SessionStore) -> usize {
    store.session_count()
}

fn flatten_notes(notes: &str) -> String {
    notes.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
