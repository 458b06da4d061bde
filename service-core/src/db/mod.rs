//! Lazily established MongoDB handle.
//!
//! A [`MongoConnector`] is built once at startup and cloned into request
//! state. The first call to [`MongoConnector::database`] connects and pings
//! the server; every later call returns the memoized handle. A failed attempt
//! leaves nothing cached, so the next caller connects afresh. There is no
//! internal retry.

use crate::config::MongoConfig;
use crate::error::AppError;
use mongodb::{bson::doc, Client as MongoClient, Database};
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Clone)]
struct MongoHandle {
    client: MongoClient,
    db: Database,
}

struct Inner {
    uri: String,
    database: String,
    handle: OnceCell<MongoHandle>,
}

#[derive(Clone)]
pub struct MongoConnector {
    inner: Arc<Inner>,
}

impl MongoConnector {
    pub fn new(config: &MongoConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                uri: config.uri.clone(),
                database: config.database.clone(),
                handle: OnceCell::new(),
            }),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.inner.database
    }

    /// Whether a connection has been established in this process.
    pub fn is_connected(&self) -> bool {
        self.inner.handle.initialized()
    }

    /// Returns the selected database, connecting on first use.
    pub async fn database(&self) -> Result<Database, AppError> {
        Ok(self.handle().await?.db.clone())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        let handle = self.handle().await?;
        handle
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn handle(&self) -> Result<&MongoHandle, AppError> {
        self.inner.handle.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<MongoHandle, AppError> {
        if self.inner.uri.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "MONGODB_URI is required but empty"
            )));
        }

        tracing::info!(database = %self.inner.database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(&self.inner.uri)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create MongoDB client: {}", e);
                AppError::ConnectionError(anyhow::Error::new(e))
            })?;

        // The driver connects lazily; ping so an unreachable server fails here.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach MongoDB: {}", e);
                AppError::ConnectionError(anyhow::Error::new(e))
            })?;

        let db = client.database(&self.inner.database);
        tracing::info!(database = %self.inner.database, "Successfully connected to MongoDB database");
        Ok(MongoHandle { client, db })
    }
}
