use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use thiserror::Error;
use tidelog_sessions::StoreError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Whole-store persistence as one opaque text blob.
///
/// `save` overwrites whatever was stored before; there are no partial writes.
pub trait PersistenceGateway {
    /// The stored blob, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, GatewayError>;

    fn save(&self, blob: &str) -> Result<(), GatewayError>;

    /// Where the blob lives, for log output.
    fn location(&self) -> String;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    fn load(&self) -> Result<Option<String>, GatewayError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), GatewayError> {
        (**self).save(blob)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// In-process gateway, useful for testing.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    blob: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob, as if written by an earlier run.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
            saves: Cell::new(0),
        }
    }

    /// The current blob.
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    /// Number of saves performed.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self) -> Result<Option<String>, GatewayError> {
        Ok(self.blob())
    }

    fn save(&self, blob: &str) -> Result<(), GatewayError> {
        *self.blob.borrow_mut() = Some(blob.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
