use crate::models::MessageRecord;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use service_core::health::HealthCheck;
use std::cmp::Reverse;
use tokio::sync::RwLock;

/// Append-only message log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends `record` and returns its new id.
    async fn insert(&self, record: MessageRecord) -> Result<ObjectId, AppError>;

    /// Up to `limit` records, newest first.
    async fn latest(&self, limit: i64) -> Result<Vec<MessageRecord>, AppError>;

    /// Up to `limit` records with `timestamp > since`, oldest first.
    async fn since(&self, since: i64, limit: i64) -> Result<Vec<MessageRecord>, AppError>;
}

/// Process-local log for tests and `STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    records: RwLock<Vec<MessageRecord>>,
}

impl InMemoryMessageStore {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn as_len(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, mut record: MessageRecord) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        record.id = Some(id);
        self.records.write().await.push(record);
        Ok(id)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<MessageRecord>, AppError> {
        let records = self.records.read().await;
        // Reverse first so equal timestamps keep newest-inserted first.
        let mut latest: Vec<MessageRecord> = records.iter().rev().cloned().collect();
        latest.sort_by_key(|r| Reverse(r.timestamp));
        latest.truncate(as_len(limit));
        Ok(latest)
    }

    async fn since(&self, since: i64, limit: i64) -> Result<Vec<MessageRecord>, AppError> {
        let records = self.records.read().await;
        let mut newer: Vec<MessageRecord> = records
            .iter()
            .filter(|r| r.timestamp > since)
            .cloned()
            .collect();
        newer.sort_by_key(|r| r.timestamp);
        newer.truncate(as_len(limit));
        Ok(newer)
    }
}

#[async_trait]
impl HealthCheck for InMemoryMessageStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
