pub mod config;
pub mod dates;
pub mod formatting;

// Re-exports
pub use config::*;
