use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    api::{repositories::VehicleRepository, ApiError},
    models::{
        pricing::{DateRange, Quote},
        vehicle::{model_labels, Vehicle, VehicleFilter, VehicleForm},
    },
    services::auth_service::{NotAuthenticated, Session},
};

#[derive(Error, Debug)]
pub enum CatalogServiceError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticated),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl CatalogServiceError {
    /// Text to show the user. API failures follow [`ApiError::user_message`];
    /// everything else is reported as is.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CatalogServiceError::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

pub struct CatalogService {
    vehicle_repository: Arc<dyn VehicleRepository>,
}

impl CatalogService {
    pub fn new(vehicle_repository: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicle_repository }
    }

    /// Fetch the catalog and keep the vehicles the filter accepts
    pub async fn list_vehicles(
        &self,
        filter: &VehicleFilter,
    ) -> Result<Vec<Vehicle>, CatalogServiceError> {
        debug!("Fetching vehicles with filter: {:?}", filter);

        let mut vehicles = self.vehicle_repository.find_all().await?;
        vehicles.retain(|vehicle| filter.matches(vehicle));

        debug!("Retrieved {} vehicles", vehicles.len());
        Ok(vehicles)
    }

    pub async fn list_model_labels(&self) -> Result<Vec<String>, CatalogServiceError> {
        let vehicles = self.vehicle_repository.find_all().await?;
        Ok(model_labels(&vehicles))
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<Vehicle, CatalogServiceError> {
        self.vehicle_repository
            .find_by_id(id)
            .await
            .map_err(|e| match e.status() {
                Some(StatusCode::NOT_FOUND) => CatalogServiceError::VehicleNotFound(id.to_string()),
                _ => CatalogServiceError::Api(e),
            })
    }

    /// Detail view: the vehicle plus its price over `range`
    pub async fn quote(
        &self,
        id: &str,
        range: DateRange,
    ) -> Result<(Vehicle, Quote), CatalogServiceError> {
        let vehicle = self.get_vehicle(id).await?;
        let quote = vehicle.quote(range);
        debug!(
            "Quoted {} for {} days at {}: {}",
            vehicle.name, quote.days, quote.rate_per_day, quote.total
        );
        Ok((vehicle, quote))
    }

    pub async fn create_vehicle(
        &self,
        session: &Session,
        form: VehicleForm,
    ) -> Result<Vehicle, CatalogServiceError> {
        let token = session.require_token()?;
        Self::validate_form(&form)?;

        info!("Creating vehicle: {} {}", form.name, form.model);
        let vehicle = self.vehicle_repository.store(token, &form).await?;

        info!("Successfully created vehicle with ID: {}", vehicle.id);
        Ok(vehicle)
    }

    pub async fn update_vehicle(
        &self,
        session: &Session,
        id: &str,
        form: VehicleForm,
    ) -> Result<Vehicle, CatalogServiceError> {
        let token = session.require_token()?;
        Self::validate_form(&form)?;

        info!("Updating vehicle {}", id);
        let vehicle = self
            .vehicle_repository
            .update(token, id, &form)
            .await
            .map_err(|e| match e.status() {
                Some(StatusCode::NOT_FOUND) => CatalogServiceError::VehicleNotFound(id.to_string()),
                _ => CatalogServiceError::Api(e),
            })?;

        info!("Successfully updated vehicle: {}", id);
        Ok(vehicle)
    }

    pub async fn delete_vehicle(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<(), CatalogServiceError> {
        let token = session.require_token()?;

        info!("Deleting vehicle {}", id);
        if let Err(e) = self.vehicle_repository.delete(token, id).await {
            warn!("Failed to delete vehicle {}: {}", id, e);
            return Err(e.into());
        }

        info!("Successfully deleted vehicle: {}", id);
        Ok(())
    }

    fn validate_form(form: &VehicleForm) -> Result<(), CatalogServiceError> {
        form.validate()
            .map_err(|e| CatalogServiceError::ValidationError {
                message: format!("Vehicle validation failed: {}", e),
            })?;

        if let Some(ref picture) = form.picture {
            if !picture.is_file() {
                return Err(CatalogServiceError::ValidationError {
                    message: format!("Picture file not found: {}", picture.display()),
                });
            }
        }

        Ok(())
    }
}
