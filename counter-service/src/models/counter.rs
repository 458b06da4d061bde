use serde::{Deserialize, Serialize};

/// Collection holding the singleton counter document.
pub const COUNTS_COLLECTION: &str = "counts";

/// Fixed `_id` of the one counter document per deployment.
pub const COUNTER_ID: &str = "total_count";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn int32_values_are_read_as_totals() {
        let stored = doc! { "_id": COUNTER_ID, "value": 42_i32 };
        let counter: CounterDocument = bson::from_document(stored).unwrap();
        assert_eq!(counter.value, 42);
    }

    #[test]
    fn missing_value_reads_as_zero() {
        let stored = doc! { "_id": COUNTER_ID };
        let counter: CounterDocument = bson::from_document(stored).unwrap();
        assert_eq!(counter.id, COUNTER_ID);
        assert_eq!(counter.value, 0);
    }
}
