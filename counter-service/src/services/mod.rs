pub mod counter;
pub mod database;
pub mod store;

pub use counter::{validate_increment, CounterService, Increment, MAX_INCREMENT};
pub use database::MongoCounterStore;
pub use store::{CounterStore, InMemoryCounterStore};
