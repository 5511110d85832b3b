pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod report;

pub use error::AppError;
pub use report::{AccountOutcome, RunReport};
