use crate::dtos::MessageQuery;
use crate::models::{MessageRecord, MAX_MESSAGE_CHARS};
use crate::services::store::MessageStore;
use metrics::counter;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Records returned in limit mode when `limit` is missing a usable value.
pub const DEFAULT_LIMIT: i64 = 200;

/// Most records a single poll returns.
pub const SINCE_CAP: i64 = 100;

const MESSAGE_REQUIRED: &str = "Message content is required.";

/// How a `GET` selects records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// The most recent N records.
    Latest(i64),
    /// Records newer than the given timestamp.
    Since(i64),
}

impl FetchMode {
    fn label(&self) -> &'static str {
        match self {
            FetchMode::Latest(_) => "limit",
            FetchMode::Since(_) => "since",
        }
    }
}

impl From<&MessageQuery> for FetchMode {
    /// `limit` wins when present; otherwise poll from `since` (default 0).
    fn from(query: &MessageQuery) -> Self {
        match &query.limit {
            Some(raw) => FetchMode::Latest(
                leading_integer(raw)
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_LIMIT),
            ),
            None => FetchMode::Since(
                query
                    .since
                    .as_deref()
                    .and_then(leading_integer)
                    .unwrap_or(0),
            ),
        }
    }
}

/// Parses the integer prefix of a query value, so `"10abc"` reads as 10.
///
/// Leading whitespace and one sign are allowed. `None` when no digit follows.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let unsigned = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = raw.len() - unsigned.len();
    raw[..sign_len + digits].parse::<i64>().ok()
}

/// Extracts the text to store from a `POST` body.
///
/// The message must be a string that is non-empty once trimmed. The trimmed
/// text is cut to [`MAX_MESSAGE_CHARS`] characters.
pub fn normalize_message(body: &Value) -> Result<String, AppError> {
    let text = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::InvalidInput(MESSAGE_REQUIRED.to_string()))?;

    Ok(text.chars().take(MAX_MESSAGE_CHARS).collect())
}

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Validates and appends a message stamped with the server clock.
    pub async fn post(&self, body: &Value) -> Result<ObjectId, AppError> {
        let text = normalize_message(body)?;
        let id = self.store.insert(MessageRecord::new(text)).await?;
        counter!("messages_posted_total").increment(1);
        tracing::debug!(message_id = %id, "Message stored");
        Ok(id)
    }

    /// Records for `mode`, always oldest first.
    pub async fn fetch(&self, mode: FetchMode) -> Result<Vec<MessageRecord>, AppError> {
        let records = match mode {
            FetchMode::Latest(limit) => {
                let mut latest = self.store.latest(limit).await?;
                latest.reverse();
                latest
            }
            FetchMode::Since(since) => self.store.since(since, SINCE_CAP).await?,
        };

        counter!("messages_fetched_total", "mode" => mode.label()).increment(records.len() as u64);
        Ok(records)
    }
}
