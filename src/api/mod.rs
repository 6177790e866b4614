pub mod connection;
pub mod repositories;

pub use connection::{ApiClient, ApiError, RETRY_LATER_MESSAGE};
