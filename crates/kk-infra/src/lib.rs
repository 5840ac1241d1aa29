pub mod db;
pub mod fs;
pub mod memory;
pub mod settings;
pub mod time;

pub use time::{SystemClock, TokioScheduler};
