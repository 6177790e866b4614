use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const ADMIN_ROLE: &str = "admin";

/// Body of `POST /api/user/register`.
#[derive(Debug, Validate, Serialize)]
pub struct StoreUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: String,

    #[validate(custom = "validate_password")]
    pub password: String,
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password_required"));
    }

    if password.len() > 128 {
        return Err(ValidationError::new("password_too_long"));
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Validation error: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl StoreUserRequest {
    pub fn new(
        name: String,
        email: String,
        phone: String,
        password: String,
        confirm_password: &str,
    ) -> Result<Self, RegistrationError> {
        if password != confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        let request = Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            password,
        };

        request.validate()?;
        Ok(request)
    }
}

/// Body of `POST /api/user/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub role: String,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_register_request() {
        let request = StoreUserRequest::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "555-0100".to_string(),
            "hunter22".to_string(),
            "hunter22",
        );
        assert!(request.is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        let request = StoreUserRequest::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            String::new(),
            "hunter22".to_string(),
            "hunter23",
        );
        assert!(matches!(request, Err(RegistrationError::PasswordMismatch)));
    }

    #[test]
    fn test_invalid_email_format() {
        let request = StoreUserRequest::new(
            "Jane Doe".to_string(),
            "not-an-email".to_string(),
            String::new(),
            "hunter22".to_string(),
            "hunter22",
        );
        assert!(matches!(request, Err(RegistrationError::Invalid(_))));
    }

    #[test]
    fn test_profile_role() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": "u1", "role": "admin", "name": "Ada", "email": "ada@example.com"}"#,
        )
        .unwrap();
        assert!(profile.is_admin());

        let profile: UserProfile =
            serde_json::from_str(r#"{"_id": "u2", "name": "Bob", "email": "bob@example.com"}"#)
                .unwrap();
        assert!(!profile.is_admin());
    }
}
