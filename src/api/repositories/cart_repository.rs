use async_trait::async_trait;
use reqwest::Method;

use crate::api::connection::{ApiClient, ApiError};
use crate::models::cart::{AddToCartRequest, Cart, RemoveFromCartRequest};

/// Server-side cart of the authenticated user
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find(&self, token: &str) -> Result<Cart, ApiError>;
    async fn add_item(&self, token: &str, request: &AddToCartRequest) -> Result<(), ApiError>;
    /// Returns the cart as the server left it after the removal.
    async fn remove_item(&self, token: &str, vehicle_id: &str) -> Result<Cart, ApiError>;
}

/// HTTP implementation of CartRepository
pub struct HttpCartRepository {
    client: ApiClient,
}

impl HttpCartRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartRepository for HttpCartRepository {
    async fn find(&self, token: &str) -> Result<Cart, ApiError> {
        let request = self.client.request(Method::GET, &["cart"], Some(token))?;
        self.client.send_json(request).await
    }

    async fn add_item(&self, token: &str, request: &AddToCartRequest) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::POST, &["cart", "add"], Some(token))?
            .json(request);
        self.client.send(request).await?;
        Ok(())
    }

    async fn remove_item(&self, token: &str, vehicle_id: &str) -> Result<Cart, ApiError> {
        let body = RemoveFromCartRequest {
            car_id: vehicle_id.to_string(),
        };
        let request = self
            .client
            .request(Method::DELETE, &["cart", "item"], Some(token))?
            .json(&body);
        self.client.send_json(request).await
    }
}
