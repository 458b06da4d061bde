pub mod messages;

pub use messages::{list_messages, post_message};
