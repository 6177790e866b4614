use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const RETRY_LATER_MESSAGE: &str =
    "Unable to reach the rental service. Please try again later.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message to show the user: server text when it sent some, otherwise
    /// `fallback`, and a retry-later notice when the service was unreachable.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) => RETRY_LATER_MESSAGE.to_string(),
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Error bodies use either `message` or `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

pub fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let origin = Url::parse(base_url)?;
        tracing::debug!("Rental API client targeting {}", origin);
        Ok(Self {
            http: reqwest::Client::new(),
            origin,
        })
    }

    /// Root the API serves from; vehicle picture paths are relative to it.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `/api/<segments>` under the configured base, keeping any path prefix it has.
    /// Each segment is percent-encoded, so ids cannot alter the route.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.origin.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }

    pub fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        let builder = self.http.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Sends the request and turns a non-success status into `ApiError::Status`.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Rental API unreachable: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Rental API responded {} to {}", status, body);
        Err(ApiError::Status {
            status,
            message: server_message(&body),
        })
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.endpoint(&["cars"]).unwrap().as_str(),
            "http://localhost:5000/api/cars"
        );
        assert_eq!(
            client.endpoint(&["cart", "item"]).unwrap().as_str(),
            "http://localhost:5000/api/cart/item"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new("https://gateway.example.com/rental").unwrap();
        assert_eq!(
            client.endpoint(&["cars"]).unwrap().as_str(),
            "https://gateway.example.com/rental/api/cars"
        );

        let client = ApiClient::new("https://gateway.example.com/rental/").unwrap();
        assert_eq!(
            client.endpoint(&["bookings", "b1"]).unwrap().as_str(),
            "https://gateway.example.com/rental/api/bookings/b1"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client.endpoint(&["cars", "a?b/c#d"]).unwrap();
        assert_eq!(url.path(), "/api/cars/a%3Fb%2Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_server_message_prefers_message_then_error() {
        assert_eq!(
            server_message(r#"{"message": "Car not available"}"#).as_deref(),
            Some("Car not available")
        );
        assert_eq!(
            server_message(r#"{"error": "Cart is empty"}"#).as_deref(),
            Some("Cart is empty")
        );
        assert_eq!(server_message(r#"{"error": ""}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }

    #[test]
    fn test_user_message_fallbacks() {
        let with_message = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Cart is empty".to_string()),
        };
        assert_eq!(with_message.user_message("Booking failed."), "Cart is empty");

        let without_message = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(without_message.user_message("Booking failed."), "Booking failed.");
        assert_eq!(without_message.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
