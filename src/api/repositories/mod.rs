pub mod booking_repository;
pub mod cart_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use booking_repository::{BookingRepository, HttpBookingRepository};
pub use cart_repository::{CartRepository, HttpCartRepository};
pub use user_repository::{HttpUserRepository, UserRepository};
pub use vehicle_repository::{HttpVehicleRepository, VehicleRepository};
