use chrono::Utc;
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{de, Deserialize, Deserializer, Serialize};

pub const MESSAGES_COLLECTION: &str = "messages";

/// Longest stored message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 50;

/// One danmaku entry. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub message: String,
    /// Milliseconds since the Unix epoch, assigned by the server.
    #[serde(deserialize_with = "millis_from_bson")]
    pub timestamp: i64,
}

impl MessageRecord {
    /// Stamps `message` with the current server time.
    pub fn new(message: String) -> Self {
        Self::at(message, Utc::now().timestamp_millis())
    }

    pub fn at(message: String, timestamp: i64) -> Self {
        Self {
            id: None,
            message,
            timestamp,
        }
    }
}

/// Reads a timestamp stored as any BSON number.
///
/// Older writers stored epoch milliseconds as doubles, so whole-number
/// doubles are accepted alongside Int32 and Int64.
fn millis_from_bson<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Int32(n) => Ok(i64::from(n)),
        Bson::Int64(n) => Ok(n),
        Bson::Double(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(f as i64)
        }
        other => Err(de::Error::custom(format!(
            "expected an integral timestamp, found {}",
            other
        ))),
    }
}
