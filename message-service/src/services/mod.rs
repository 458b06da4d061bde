pub mod database;
pub mod messages;
pub mod store;

pub use database::MongoMessageStore;
pub use messages::{normalize_message, FetchMode, MessageService, DEFAULT_LIMIT, SINCE_CAP};
pub use store::{InMemoryMessageStore, MessageStore};
