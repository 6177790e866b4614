use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

use crate::{
    api::{repositories::UserRepository, ApiError},
    models::user::{StoreUserRequest, UserProfile},
    services::auth_service::{NotAuthenticated, Session},
};

#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticated),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl UserServiceError {
    /// Text to show the user. API failures follow [`ApiError::user_message`];
    /// everything else is reported as is.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            UserServiceError::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Register a new account; the user logs in separately afterwards
    pub async fn register(&self, request: StoreUserRequest) -> Result<(), UserServiceError> {
        info!("Attempting to register user: {}", request.email);

        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError {
                message: format!("Registration validation failed: {}", e),
            })?;

        self.user_repository.store(&request).await.map_err(|e| {
            error!("Registration rejected: {}", e);
            UserServiceError::Api(e)
        })?;

        info!("Successfully registered user: {}", request.email);
        Ok(())
    }

    pub async fn get_profile(&self, session: &Session) -> Result<UserProfile, UserServiceError> {
        let token = session.require_token()?;
        Ok(self.user_repository.find_profile(token).await?)
    }
}
