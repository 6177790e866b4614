use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    api::{repositories::BookingRepository, ApiError},
    models::{
        booking::{Booking, CancelRefusal, CreateBookingRequest, PaymentMethod},
        cart::Cart,
    },
    services::auth_service::{NotAuthenticated, Session},
};

#[derive(Error, Debug)]
pub enum BookingServiceError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticated),

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Pickup address is required")]
    MissingPickupAddress,

    #[error("Card details are required for card payments")]
    MissingCardDetails,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error(transparent)]
    CancelRefused(#[from] CancelRefusal),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl BookingServiceError {
    /// Text to show the user. API failures follow [`ApiError::user_message`];
    /// everything else is reported as is.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BookingServiceError::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

/// What the user is told after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    pub payment_method: PaymentMethod,
    pub pickup_address: String,
    pub item_count: usize,
    pub total: Decimal,
}

pub struct BookingService {
    booking_repository: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(booking_repository: Arc<dyn BookingRepository>) -> Self {
        Self { booking_repository }
    }

    /// Book everything in `cart`. A failed submission is reported, never retried.
    pub async fn checkout(
        &self,
        session: &Session,
        cart: &Cart,
        request: CreateBookingRequest,
    ) -> Result<BookingReceipt, BookingServiceError> {
        let token = session.require_token()?;

        if cart.is_empty() {
            return Err(BookingServiceError::EmptyCart);
        }
        if request.pickup_address.is_empty() {
            return Err(BookingServiceError::MissingPickupAddress);
        }
        if request.payment_method == PaymentMethod::Card {
            let card = request
                .card_info
                .as_ref()
                .ok_or(BookingServiceError::MissingCardDetails)?;
            card.validate()
                .map_err(|e| BookingServiceError::ValidationError {
                    message: format!("Card validation failed: {}", e),
                })?;
        }

        info!(
            "Submitting booking for {} items, paying by {}",
            cart.items().len(),
            request.payment_method
        );

        if let Err(e) = self.booking_repository.store(token, &request).await {
            error!("Booking submission failed: {}", e);
            return Err(e.into());
        }

        let receipt = BookingReceipt {
            payment_method: request.payment_method,
            pickup_address: request.pickup_address,
            item_count: cart.items().len(),
            total: cart.computed_total(),
        };
        info!("Booking confirmed, total {}", receipt.total);
        Ok(receipt)
    }

    pub async fn list_bookings(&self, session: &Session) -> Result<Vec<Booking>, BookingServiceError> {
        let token = session.require_token()?;
        Ok(self.booking_repository.find_all(token).await?)
    }

    pub async fn find_booking(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Booking, BookingServiceError> {
        self.list_bookings(session)
            .await?
            .into_iter()
            .find(|booking| booking.id == id)
            .ok_or_else(|| BookingServiceError::BookingNotFound(id.to_string()))
    }

    /// Cancel `booking` if the cutoff allows it; refusals never reach the server.
    pub async fn cancel_booking(
        &self,
        session: &Session,
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> Result<(), BookingServiceError> {
        let token = session.require_token()?;

        if let Err(refusal) = booking.check_cancellable(now) {
            warn!("Refusing to cancel booking {}: {}", booking.id, refusal);
            return Err(refusal.into());
        }

        info!("Cancelling booking {}", booking.id);
        self.booking_repository.cancel(token, &booking.id).await?;

        info!("Booking {} cancelled", booking.id);
        Ok(())
    }
}
