pub mod auth_service;
pub mod booking_service;
pub mod cart_service;
pub mod catalog_service;
pub mod user_service;

pub use auth_service::*;
pub use booking_service::*;
pub use cart_service::*;
pub use catalog_service::*;
pub use user_service::*;
