use crate::services::store::CounterStore;
use metrics::counter;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Largest step a single request may add; larger requests are clamped.
pub const MAX_INCREMENT: i64 = 20;

const INVALID_INCREMENT: &str = "incrementBy must be a positive integer";

/// A validated step, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Increment {
    pub applied: i64,
    pub clamped: bool,
}

/// Validates the `incrementBy` field of a request body.
///
/// Accepts JSON numbers that are whole (`5` and `5.0` alike) and strictly
/// positive, then clamps to [`MAX_INCREMENT`].
pub fn validate_increment(body: &Value) -> Result<Increment, AppError> {
    let invalid = || AppError::InvalidInput(INVALID_INCREMENT.to_string());

    let number = match body.get("incrementBy") {
        Some(Value::Number(n)) => n,
        _ => return Err(invalid()),
    };

    let requested = if let Some(i) = number.as_i64() {
        i
    } else if number.as_u64().is_some() {
        // Beyond i64 but still a positive integer.
        i64::MAX
    } else {
        match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(invalid()),
        }
    };

    if requested <= 0 {
        return Err(invalid());
    }

    Ok(Increment {
        applied: requested.min(MAX_INCREMENT),
        clamped: requested > MAX_INCREMENT,
    })
}

#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn CounterStore>,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    pub async fn total(&self) -> Result<i64, AppError> {
        self.store.total().await
    }

    /// Validates `body`, then atomically adds the clamped step.
    ///
    /// Invalid input never reaches the store.
    pub async fn increment(&self, body: &Value) -> Result<i64, AppError> {
        let increment = validate_increment(body)?;
        if increment.clamped {
            tracing::debug!(applied = increment.applied, "Clamped oversized increment");
            counter!("counter_increment_clamped_total").increment(1);
        }

        let total = self.store.increment(increment.applied).await?;
        counter!("counter_increments_total").increment(1);
        tracing::info!(by = increment.applied, total, "Counter incremented");
        Ok(total)
    }
}
