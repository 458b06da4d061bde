pub mod counter;

pub use counter::{CounterDocument, COUNTER_ID, COUNTS_COLLECTION};
