use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::api::connection::{server_message, ApiClient, ApiError};
use crate::models::booking::{Booking, CreateBookingRequest};

/// Booking operations for the authenticated user
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Books the contents of the user's server-side cart.
    async fn store(&self, token: &str, request: &CreateBookingRequest) -> Result<(), ApiError>;
    async fn find_all(&self, token: &str) -> Result<Vec<Booking>, ApiError>;
    async fn cancel(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of BookingRepository
pub struct HttpBookingRepository {
    client: ApiClient,
}

impl HttpBookingRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BookingRepository for HttpBookingRepository {
    async fn store(&self, token: &str, request: &CreateBookingRequest) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::POST, &["bookings"], Some(token))?
            .json(request);
        let response = self.client.send(request).await?;

        // only 201 confirms the booking
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: server_message(&body),
            });
        }

        Ok(())
    }

    async fn find_all(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        let request = self.client.request(Method::GET, &["bookings"], Some(token))?;
        match self.client.send_json(request).await {
            Ok(bookings) => Ok(bookings),
            // the API answers 400 when the user has never booked
            Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                ..
            }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn cancel(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::DELETE, &["bookings", id], Some(token))?;
        self.client.send(request).await?;
        Ok(())
    }
}
