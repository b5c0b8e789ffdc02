//! Persistence layer for tidelog.
//!
//! The store is saved as one serialized blob through a [`PersistenceGateway`].
//! [`Logbook`] pairs a [`tidelog_sessions::SessionStore`] with a gateway and
//! writes the whole store after every mutation.

mod gateway;
mod json_file;
mod logbook;
mod sqlite;

pub use gateway::{GatewayError, MemoryGateway, PersistenceGateway};
pub use json_file::JsonFileGateway;
pub use logbook::{LoadOutcome, Logbook};
pub use sqlite::{SqliteGateway, DATA_KEY};
