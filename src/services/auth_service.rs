use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{repositories::UserRepository, ApiError},
    models::user::LoginRequest,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Please log in first!")]
pub struct NotAuthenticated;

/// Authentication state handed to every component that talks to protected
/// endpoints. Holding a token is all it takes to count as logged in; the
/// server is the one that rejects stale tokens.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: String) -> Self {
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self { token: Some(token) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn require_token(&self) -> Result<&str, NotAuthenticated> {
        self.token().ok_or(NotAuthenticated)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum AuthServiceError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    created_at: DateTime<Utc>,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    session_file_path: PathBuf,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_dir: Option<PathBuf>,
    ) -> Result<Self, AuthServiceError> {
        let session_dir = session_dir.unwrap_or_else(|| {
            let mut path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            path.push(".rental-cli");
            path
        });

        if !session_dir.exists() {
            fs::create_dir_all(&session_dir).context("Failed to create session directory")?;
        }

        let mut session_file_path = session_dir;
        session_file_path.push("session.json");

        Ok(Self {
            user_repository,
            session_file_path,
        })
    }

    /// Exchange credentials for a token and store it
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            warn!("Login rejected locally: empty credentials");
            return Err(AuthServiceError::MissingCredentials);
        }

        info!("Login attempt for user: {}", email);

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.user_repository.login(&request).await?;

        self.save_session(&StoredSession {
            token: response.token.clone(),
            created_at: Utc::now(),
        })?;

        info!("User {} logged in successfully", request.email);
        Ok(Session::with_token(response.token))
    }

    /// Forget the stored token
    pub async fn logout(&self) -> Result<(), AuthServiceError> {
        info!("Logging out user");

        if self.session_file_path.exists() {
            fs::remove_file(&self.session_file_path).context("Failed to remove session file")?;
            info!("Session cleared successfully");
        }

        Ok(())
    }

    /// Session built from whatever token is on disk; anonymous when there is none.
    pub fn current_session(&self) -> Session {
        if !self.session_file_path.exists() {
            return Session::anonymous();
        }

        match self.load_session() {
            Ok(stored) => Session::with_token(stored.token),
            Err(e) => {
                debug!("Failed to load session: {}", e);
                Session::anonymous()
            }
        }
    }

    fn save_session(&self, session: &StoredSession) -> Result<(), AuthServiceError> {
        let json_data = serde_json::to_string_pretty(session)?;

        let mut file = fs::File::create(&self.session_file_path)?;
        file.write_all(json_data.as_bytes())?;
        file.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata()?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.session_file_path, perms)?;
        }

        debug!("Session saved successfully");
        Ok(())
    }

    fn load_session(&self) -> Result<StoredSession, AuthServiceError> {
        let json_data = fs::read_to_string(&self.session_file_path)?;
        let session: StoredSession = serde_json::from_str(&json_data)?;
        Ok(session)
    }
}
