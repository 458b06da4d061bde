//! Application startup and lifecycle management.

use crate::config::MessageConfig;
use crate::handlers;
use crate::services::{InMemoryMessageStore, MessageService, MessageStore, MongoMessageStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::config::StoreBackend;
use service_core::db::MongoConnector;
use service_core::error::{method_not_allowed, AppError};
use service_core::health::{health_router, HealthCheck, HealthState};
use service_core::middleware::{
    cors::{cors_headers_middleware, preflight},
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "message-service";

#[derive(Clone)]
pub struct AppState {
    pub messages: MessageService,
}

/// Builds the store selected by `config`.
///
/// Index creation for the Mongo backend runs in the background so startup
/// does not wait on the first connection.
fn build_store(
    config: &MessageConfig,
) -> Result<(Arc<dyn MessageStore>, Arc<dyn HealthCheck>), AppError> {
    match config.store {
        StoreBackend::Mongo => {
            if config.mongodb.uri.trim().is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_URI is required when STORE_BACKEND is mongo"
                )));
            }
            let store = Arc::new(MongoMessageStore::new(MongoConnector::new(&config.mongodb)));

            let indexer = store.clone();
            tokio::spawn(async move {
                if let Err(e) = indexer.initialize_indexes().await {
                    tracing::warn!("Message indexes not created: {}", e);
                }
            });

            let health: Arc<dyn HealthCheck> = store.clone();
            Ok((store as Arc<dyn MessageStore>, health))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory message store; messages are lost on restart");
            let store = Arc::new(InMemoryMessageStore::default());
            let health: Arc<dyn HealthCheck> = store.clone();
            Ok((store as Arc<dyn MessageStore>, health))
        }
    }
}

pub fn build_router(state: AppState, health: Arc<dyn HealthCheck>) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(handlers::list_messages)
                .post(handlers::post_message)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
        .merge(health_router(HealthState {
            service: SERVICE_NAME,
            checker: health,
        }))
        .layer(from_fn(cors_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    store: Arc<dyn MessageStore>,
}

impl Application {
    pub async fn build(config: MessageConfig) -> Result<Self, AppError> {
        let (store, health) = build_store(&config)?;
        let state = AppState {
            messages: MessageService::new(store.clone()),
        };
        let router = build_router(state, health);

        // Port 0 picks a random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Message service listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
            store,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn MessageStore> {
        self.store.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
