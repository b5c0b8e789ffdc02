use std::fs;
use std::path::PathBuf;

use crate::gateway::{GatewayError, PersistenceGateway};

/// Keeps the store blob as a single JSON file.
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.local/share/tidelog/sessions.json` (or the platform equivalent).
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tidelog")
            .join("sessions.json")
    }

    fn io_error(&self, source: std::io::Error) -> GatewayError {
        GatewayError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&self) -> Result<Option<String>, GatewayError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    // Written to a sibling temp file first so a crash never leaves half a blob.
    fn save(&self, blob: &str) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(bytes = blob.len(), path = ?self.path, "Saved store to file");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
