//! # tidelog-sessions
//!
//! Session model and derived views for the tidelog water-sports log.
//!
//! ## Key Types
//!
//! - [`SessionStore`] - Sessions bucketed by [`DateKey`], with CRUD
//! - [`SessionInput`] - Raw form input, validated into [`SessionDetails`]
//! - [`DistanceSummary`] - Week/month/year distance totals
//! - [`CalendarGrid`] - A month laid out in Sunday-first week rows
//! - [`DayView`] - One day's sessions sorted by time of day
//!
//! Persistence is not handled here; see `tidelog-db`.

mod calendar;
mod date_key;
mod day_view;
mod error;
mod export;
mod input;
mod store;
mod summary;
mod types;

pub use calendar::{build_grid, CalendarCell, CalendarGrid, CalendarMonth, DAYS_PER_WEEK};
pub use date_key::DateKey;
pub use day_view::{build_day_view, DayEntry, DayView};
pub use error::{DateKeyError, StoreError, ValidationError};
pub use export::{export_csv, row_count, CSV_FILE_NAME, CSV_HEADER, CSV_MIME_TYPE};
pub use input::SessionInput;
pub use store::SessionStore;
pub use summary::{round_tenth, summarize, DistanceSummary, SummaryWindows};
pub use types::{Session, SessionDetails, SessionId};
