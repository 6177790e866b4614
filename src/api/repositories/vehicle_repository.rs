use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::api::connection::{ApiClient, ApiError};
use crate::models::vehicle::{Vehicle, VehicleForm};

/// Vehicle catalog operations against the rental API
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Vehicle>, ApiError>;
    async fn find_by_id(&self, id: &str) -> Result<Vehicle, ApiError>;
    async fn store(&self, token: &str, form: &VehicleForm) -> Result<Vehicle, ApiError>;
    async fn update(&self, token: &str, id: &str, form: &VehicleForm) -> Result<Vehicle, ApiError>;
    async fn delete(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of VehicleRepository
pub struct HttpVehicleRepository {
    client: ApiClient,
}

impl HttpVehicleRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn multipart(form: &VehicleForm) -> Result<Form, ApiError> {
        let mut multipart = Form::new();
        for (name, value) in form.text_fields() {
            multipart = multipart.text(name, value);
        }

        if let Some(ref path) = form.picture {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "picture".to_string());
            multipart = multipart.part("picture", Part::bytes(bytes).file_name(file_name));
        }

        Ok(multipart)
    }
}

#[async_trait]
impl VehicleRepository for HttpVehicleRepository {
    async fn find_all(&self) -> Result<Vec<Vehicle>, ApiError> {
        let request = self.client.request(Method::GET, &["cars"], None)?;
        self.client.send_json(request).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Vehicle, ApiError> {
        let request = self
            .client
            .request(Method::GET, &["cars", id], None)?;
        self.client.send_json(request).await
    }

    async fn store(&self, token: &str, form: &VehicleForm) -> Result<Vehicle, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["cars"], Some(token))?
            .multipart(Self::multipart(form).await?);
        self.client.send_json(request).await
    }

    async fn update(&self, token: &str, id: &str, form: &VehicleForm) -> Result<Vehicle, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &["cars", id], Some(token))?
            .multipart(Self::multipart(form).await?);
        self.client.send_json(request).await
    }

    async fn delete(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .request(Method::DELETE, &["cars", id], Some(token))?;
        self.client.send(request).await?;
        Ok(())
    }
}
