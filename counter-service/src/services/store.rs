use async_trait::async_trait;
use service_core::error::AppError;
use service_core::health::HealthCheck;
use std::sync::atomic::{AtomicI64, Ordering};

/// Persistence for the singleton counter.
///
/// `increment` must be a single atomic increment-and-fetch at the store; no
/// caller-side locking is layered on top.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current total, 0 when the counter has never been incremented.
    async fn total(&self) -> Result<i64, AppError>;

    /// Adds `by` and returns the total after the update.
    async fn increment(&self, by: i64) -> Result<i64, AppError>;
}

/// Process-local counter for tests and `STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    value: AtomicI64,
}

impl InMemoryCounterStore {
    pub fn with_total(total: i64) -> Self {
        Self {
            value: AtomicI64::new(total),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn total(&self) -> Result<i64, AppError> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    async fn increment(&self, by: i64) -> Result<i64, AppError> {
        Ok(self.value.fetch_add(by, Ordering::SeqCst) + by)
    }
}

#[async_trait]
impl HealthCheck for InMemoryCounterStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
