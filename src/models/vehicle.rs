use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use super::pricing::{DateRange, Quote};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    pub price_per_day: Decimal,
    #[serde(default)]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl Vehicle {
    /// Price preview for this vehicle; also the snapshot taken when it is added to a cart.
    pub fn quote(&self, range: DateRange) -> Quote {
        Quote::new(self.price_per_day, range)
    }

    /// Pictures are stored as paths relative to the API origin.
    pub fn image_url(&self, origin: &Url) -> String {
        match self.picture.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => origin
                .join(path)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| PLACEHOLDER_IMAGE.to_string()),
            None => PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Model labels in first-seen order, without duplicates.
pub fn model_labels(vehicles: &[Vehicle]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for vehicle in vehicles {
        if !labels.contains(&vehicle.model) {
            labels.push(vehicle.model.clone());
        }
    }
    labels
}

#[derive(Debug, Default, Clone)]
pub struct VehicleFilter {
    pub model: Option<String>,
    pub search_term: Option<String>,
    pub available_only: bool,
}

impl VehicleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_search(mut self, term: String) -> Self {
        self.search_term = Some(term);
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if self.available_only && !vehicle.available {
            return false;
        }

        if let Some(ref model) = self.model {
            if vehicle.model != *model {
                return false;
            }
        }

        if let Some(ref term) = self.search_term {
            let term_lower = term.to_lowercase();
            let name_match = vehicle.name.to_lowercase().contains(&term_lower);
            let model_match = vehicle.model.to_lowercase().contains(&term_lower);
            if !name_match && !model_match {
                return false;
            }
        }

        true
    }
}

/// Fields an administrator sends when creating or replacing a vehicle.
#[derive(Debug, Clone, Validate)]
pub struct VehicleForm {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Model must be 1-100 characters"))]
    pub model: String,

    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: String,

    #[validate(custom = "validate_rate")]
    pub price_per_day: Decimal,

    pub available: bool,

    /// Local image file uploaded as the `picture` part.
    pub picture: Option<PathBuf>,
}

fn validate_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if rate.is_sign_negative() {
        return Err(ValidationError::new("rate_negative"));
    }
    Ok(())
}

impl VehicleForm {
    pub fn new(name: String, model: String, price_per_day: Decimal) -> Self {
        Self {
            name,
            model,
            description: String::new(),
            price_per_day,
            available: true,
            picture: None,
        }
    }

    /// Multipart text fields, in the names the API expects.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.trim().to_string()),
            ("model", self.model.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("pricePerDay", self.price_per_day.to_string()),
            ("available", self.available.to_string()),
        ]
    }
}

impl From<&Vehicle> for VehicleForm {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            name: vehicle.name.clone(),
            model: vehicle.model.clone(),
            description: vehicle.description.clone(),
            price_per_day: vehicle.price_per_day,
            available: vehicle.available,
            picture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vehicle(id: &str, name: &str, model: &str, available: bool) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            name: name.to_string(),
            model: model.to_string(),
            description: String::new(),
            price_per_day: dec!(40),
            available,
            picture: None,
        }
    }

    #[test]
    fn test_deserialize_api_vehicle() {
        let json = r#"{
            "_id": "65f1c2",
            "name": "Corolla",
            "model": "Toyota",
            "description": "Compact sedan",
            "pricePerDay": 45.5,
            "available": true,
            "picture": "/uploads/corolla.jpg",
            "__v": 0
        }"#;

        let vehicle: Vehicle = serde_json::from_str(json).unwrap();
        assert_eq!(vehicle.id, "65f1c2");
        assert_eq!(vehicle.price_per_day, dec!(45.5));
        assert_eq!(vehicle.picture.as_deref(), Some("/uploads/corolla.jpg"));
    }

    #[test]
    fn test_image_url_joins_origin() {
        let origin = Url::parse("http://localhost:5000").unwrap();
        let mut car = vehicle("1", "Civic", "Honda", true);
        assert_eq!(car.image_url(&origin), PLACEHOLDER_IMAGE);

        car.picture = Some("/uploads/civic.png".to_string());
        assert_eq!(car.image_url(&origin), "http://localhost:5000/uploads/civic.png");
    }

    #[test]
    fn test_filter_by_model_search_and_availability() {
        let cars = vec![
            vehicle("1", "Corolla", "Toyota", true),
            vehicle("2", "Camry", "Toyota", false),
            vehicle("3", "Civic", "Honda", true),
        ];

        let filter = VehicleFilter::new().with_model("Toyota".to_string());
        assert_eq!(cars.iter().filter(|c| filter.matches(c)).count(), 2);

        let filter = VehicleFilter::new().with_search("CIV".to_string());
        let found: Vec<_> = cars.iter().filter(|c| filter.matches(c)).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");

        let filter = VehicleFilter::new()
            .with_model("Toyota".to_string())
            .available_only();
        let found: Vec<_> = cars.iter().filter(|c| filter.matches(c)).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
    }

    #[test]
    fn test_model_labels_are_unique_in_order() {
        let cars = vec![
            vehicle("1", "Corolla", "Toyota", true),
            vehicle("2", "Civic", "Honda", true),
            vehicle("3", "Camry", "Toyota", true),
        ];
        assert_eq!(model_labels(&cars), vec!["Toyota", "Honda"]);
    }

    #[test]
    fn test_vehicle_form_rejects_negative_rate() {
        let form = VehicleForm::new("Golf".to_string(), "VW".to_string(), dec!(-1));
        assert!(form.validate().is_err());

        let form = VehicleForm::new("Golf".to_string(), "VW".to_string(), dec!(0));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_vehicle_form_text_fields() {
        let form = VehicleForm::new("Golf".to_string(), "VW".to_string(), dec!(35.5));
        let fields = form.text_fields();
        assert!(fields.contains(&("pricePerDay", "35.5".to_string())));
        assert!(fields.contains(&("available", "true".to_string())));
    }
}
