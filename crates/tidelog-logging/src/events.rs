use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// User-facing events emitted while working with the logbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    StoreLoaded {
        location: String,
        dates: usize,
        sessions: usize,
    },
    /// Stored data could not be read and an empty logbook was used instead
    StoreRecovered {
        location: String,
        reason: String,
    },
    SessionAdded {
        date: String,
        /// 1-based storage position within the day
        position: usize,
        id: String,
    },
    SessionUpdated {
        date: String,
        position: usize,
        id: String,
    },
    SessionDeleted {
        date: String,
        position: usize,
        /// The day has no sessions left
        date_cleared: bool,
    },
    CsvExported {
        destination: String,
        rows: usize,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for tidelog events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        let line = match self.format {
            LogFormat::Json => serde_json::to_string(event).ok(),
            LogFormat::Pretty => Some(Self::render_pretty(event)),
            LogFormat::Compact => Some(Self::render_compact(event)),
        };
        if let Some(line) = line {
            let _ = writeln!(std::io::stderr(), "{}", line);
        }
    }

    fn render_pretty(event: &LogEvent) -> String {
        match event {
            LogEvent::StoreLoaded {
                location,
                dates,
                sessions,
            } => format!(
                "{} {} {} across {} {} {}",
                "•".dimmed(),
                sessions,
                plural(*sessions, "session", "sessions"),
                dates,
                plural(*dates, "day", "days"),
                format!("({})", location).dimmed()
            ),
            LogEvent::StoreRecovered { location, reason } => format!(
                "{} Could not read {}: {}\n  {}",
                "⚠".bright_yellow(),
                location,
                reason.bright_yellow(),
                "Starting with an empty logbook; the old data is kept until the next change."
                    .dimmed()
            ),
            LogEvent::SessionAdded { date, position, id } => format!(
                "{} Added session #{} on {} {}",
                "✓".bright_green(),
                position,
                date.bright_white(),
                format!("({})", id).dimmed()
            ),
            LogEvent::SessionUpdated { date, position, id } => format!(
                "{} Updated session #{} on {} {}",
                "✓".bright_green(),
                position,
                date.bright_white(),
                format!("({})", id).dimmed()
            ),
            LogEvent::SessionDeleted {
                date,
                position,
                date_cleared,
            } => {
                let mut line = format!(
                    "{} Deleted session #{} on {}",
                    "✗".bright_red(),
                    position,
                    date.bright_white()
                );
                if *date_cleared {
                    line.push_str(&format!(" {}", "(no sessions left that day)".dimmed()));
                }
                line
            }
            LogEvent::CsvExported { destination, rows } => format!(
                "{} Exported {} {} to {}",
                "✓".bright_green(),
                rows,
                plural(*rows, "row", "rows"),
                destination.bright_cyan()
            ),
        }
    }

    fn render_compact(event: &LogEvent) -> String {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        match event {
            LogEvent::StoreLoaded {
                dates, sessions, ..
            } => format!("[{}] store:load {}d {}s", timestamp, dates, sessions),
            LogEvent::StoreRecovered { reason, .. } => {
                format!("[{}] store:recover {}", timestamp, reason)
            }
            LogEvent::SessionAdded { date, position, .. } => {
                format!("[{}] session:add {}#{}", timestamp, date, position)
            }
            LogEvent::SessionUpdated { date, position, .. } => {
                format!("[{}] session:edit {}#{}", timestamp, date, position)
            }
            LogEvent::SessionDeleted { date, position, .. } => {
                format!("[{}] session:delete {}#{}", timestamp, date, position)
            }
            LogEvent::CsvExported { destination, rows } => {
                format!("[{}] csv:export {} rows={}", timestamp, destination, rows)
            }
        }
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LogEvent::SessionDeleted {
            date: "2024-01-05".to_string(),
            position: 2,
            date_cleared: false,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"session_deleted","date":"2024-01-05","position":2,"date_cleared":false}"#
        );
    }

    #[test]
    fn test_compact_line() {
        let line = Logger::render_compact(&LogEvent::SessionAdded {
            date: "2024-01-05".to_string(),
            position: 1,
            id: "abc".to_string(),
        });
        assert!(line.ends_with("session:add 2024-01-05#1"));
    }

    #[test]
    fn test_file_output_is_json_lines_with_timestamp() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("tidelog.log");
        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();

        logger.log(&LogEvent::CsvExported {
            destination: "out.csv".to_string(),
            rows: 3,
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["event"], "csv_exported");
        assert_eq!(value["rows"], 3);
        assert!(value["timestamp"].is_string());
    }
}
