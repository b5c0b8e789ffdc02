use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable identifier assigned to a session when it is first created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display, the first block of the UUID.
    pub fn short(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user-entered fields of one outing.
///
/// Deserialization is lenient so that older stored data still loads: missing
/// or `null` text becomes an empty string and missing, `null` or
/// non-numeric numbers become `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_of_day: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub wind_speed: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_direction: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tide: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub equipment: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
}

/// A stored session: its details plus a stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "SessionId::generate")]
    pub id: SessionId,
    #[serde(flatten)]
    pub details: SessionDetails,
}

impl Session {
    /// Wrap details in a new session with a freshly generated id.
    pub fn new(details: SessionDetails) -> Self {
        Self {
            id: SessionId::generate(),
            details,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()).unwrap_or(0.0))
}
