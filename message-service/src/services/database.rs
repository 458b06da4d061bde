use crate::models::{MessageRecord, MESSAGES_COLLECTION};
use crate::services::store::MessageStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};
use service_core::db::MongoConnector;
use service_core::error::AppError;
use service_core::health::HealthCheck;

#[derive(Clone)]
pub struct MongoMessageStore {
    connector: MongoConnector,
}

impl MongoMessageStore {
    pub fn new(connector: MongoConnector) -> Self {
        Self { connector }
    }

    async fn messages(&self) -> Result<Collection<MessageRecord>, AppError> {
        Ok(self
            .connector
            .database()
            .await?
            .collection(MESSAGES_COLLECTION))
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for message-service");

        // Both read modes sort and filter on timestamp.
        let timestamp_index = IndexModel::builder()
            .keys(doc! { "timestamp": 1 })
            .options(
                IndexOptions::builder()
                    .name("timestamp_lookup".to_string())
                    .build(),
            )
            .build();

        self.messages()
            .await?
            .create_index(timestamp_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create timestamp index on messages collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on messages.timestamp");

        Ok(())
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    async fn insert(&self, record: MessageRecord) -> Result<ObjectId, AppError> {
        let result = self
            .messages()
            .await?
            .insert_one(record, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert message: {}", e);
                AppError::from(e)
            })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::UnexpectedStoreResult(format!(
                "insert returned non-ObjectId id: {}",
                result.inserted_id
            ))
        })
    }

    async fn latest(&self, limit: i64) -> Result<Vec<MessageRecord>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .build();

        let cursor = self.messages().await?.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn since(&self, since: i64, limit: i64) -> Result<Vec<MessageRecord>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "timestamp": 1 })
            .limit(limit)
            .build();

        let cursor = self
            .messages()
            .await?
            .find(doc! { "timestamp": { "$gt": since } }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl HealthCheck for MongoMessageStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.connector.health_check().await
    }
}
