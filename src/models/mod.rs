pub mod booking;
pub mod cart;
pub mod pricing;
pub mod user;
pub mod vehicle;

pub use booking::{Booking, BookingStatus, CardInfo, CreateBookingRequest, PaymentMethod};
pub use cart::{AddToCartRequest, Cart, CartItem, CartVehicle, DateEdit, RemoveFromCartRequest};
pub use pricing::{DateRange, Quote};
pub use user::{LoginRequest, LoginResponse, StoreUserRequest, UserProfile};
pub use vehicle::{Vehicle, VehicleFilter, VehicleForm};
