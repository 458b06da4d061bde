pub mod message;

pub use message::{MessageRecord, MAX_MESSAGE_CHARS, MESSAGES_COLLECTION};
