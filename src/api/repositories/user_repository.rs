use async_trait::async_trait;
use reqwest::Method;

use crate::api::connection::{ApiClient, ApiError};
use crate::models::user::{LoginRequest, LoginResponse, StoreUserRequest, UserProfile};

/// User account operations against the rental API
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn store(&self, request: &StoreUserRequest) -> Result<(), ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn find_profile(&self, token: &str) -> Result<UserProfile, ApiError>;
}

/// HTTP implementation of UserRepository
pub struct HttpUserRepository {
    client: ApiClient,
}

impl HttpUserRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn store(&self, request: &StoreUserRequest) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::POST, &["user", "register"], None)?
            .json(request);
        self.client.send(request).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["user", "login"], None)?
            .json(request);
        self.client.send_json(request).await
    }

    async fn find_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self
            .client
            .request(Method::GET, &["user", "profile"], Some(token))?;
        self.client.send_json(request).await
    }
}
