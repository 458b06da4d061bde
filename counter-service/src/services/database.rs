use crate::models::{CounterDocument, COUNTER_ID, COUNTS_COLLECTION};
use crate::services::store::CounterStore;
use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};
use service_core::db::MongoConnector;
use service_core::error::AppError;
use service_core::health::HealthCheck;

/// Counter kept in the `counts` collection, incremented with `$inc`.
#[derive(Clone)]
pub struct MongoCounterStore {
    connector: MongoConnector,
}

impl MongoCounterStore {
    pub fn new(connector: MongoConnector) -> Self {
        Self { connector }
    }

    async fn counts(&self) -> Result<Collection<CounterDocument>, AppError> {
        Ok(self.connector.database().await?.collection(COUNTS_COLLECTION))
    }
}

#[async_trait]
impl CounterStore for MongoCounterStore {
    async fn total(&self) -> Result<i64, AppError> {
        let counter = self
            .counts()
            .await?
            .find_one(doc! { "_id": COUNTER_ID }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read counter document: {}", e);
                AppError::from(e)
            })?;

        Ok(counter.map(|c| c.value).unwrap_or(0))
    }

    async fn increment(&self, by: i64) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .counts()
            .await?
            .find_one_and_update(
                doc! { "_id": COUNTER_ID },
                doc! { "$inc": { "value": by } },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to increment counter document: {}", e);
                AppError::from(e)
            })?;

        updated.map(|c| c.value).ok_or_else(|| {
            AppError::UnexpectedStoreResult(
                "counter upsert returned no document".to_string(),
            )
        })
    }
}

#[async_trait]
impl HealthCheck for MongoCounterStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.connector.health_check().await
    }
}
