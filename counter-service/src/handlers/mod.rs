pub mod counter;

pub use counter::{get_total, increment};
