use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::dates::iso_timestamp;

/// Bookings can only be cancelled while the start is further away than this.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

lazy_static::lazy_static! {
    static ref CARD_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{12,19}$").unwrap();
    static ref EXPIRATION_REGEX: Regex = Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").unwrap();
    static ref CVV_REGEX: Regex = Regex::new(r"^[0-9]{3,4}$").unwrap();
}

#[derive(Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    #[validate(regex(path = "CARD_NUMBER_REGEX", message = "Card number must be 12-19 digits"))]
    pub card_number: String,

    #[validate(length(min = 1, max = 100, message = "Card holder name is required"))]
    pub card_holder_name: String,

    #[validate(regex(path = "EXPIRATION_REGEX", message = "Expiration date must be MM/YY"))]
    pub expiration_date: String,

    #[validate(regex(path = "CVV_REGEX", message = "CVV must be 3 or 4 digits"))]
    pub cvv: String,
}

impl CardInfo {
    pub fn new(
        card_number: String,
        card_holder_name: String,
        expiration_date: String,
        cvv: String,
    ) -> Self {
        Self {
            card_number: card_number.chars().filter(|c| !c.is_whitespace()).collect(),
            card_holder_name: card_holder_name.trim().to_string(),
            expiration_date: expiration_date.trim().to_string(),
            cvv: cvv.trim().to_string(),
        }
    }

    pub fn masked_number(&self) -> String {
        let tail: String = self
            .card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("**** {}", tail)
    }
}

// Card data never reaches logs through Debug.
impl std::fmt::Debug for CardInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardInfo")
            .field("card_number", &self.masked_number())
            .field("card_holder_name", &self.card_holder_name)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/bookings`. The server books whatever is in the user's cart.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub payment_method: PaymentMethod,
    pub pickup_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_info: Option<CardInfo>,
}

impl CreateBookingRequest {
    /// Card details are kept only for card payments.
    pub fn new(payment_method: PaymentMethod, pickup_address: String, card: Option<CardInfo>) -> Self {
        let card_info = match payment_method {
            PaymentMethod::Card => card,
            PaymentMethod::Cash => None,
        };

        Self {
            payment_method,
            pickup_address: pickup_address.trim().to_string(),
            card_info,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Booked,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Booked => write!(f, "booked"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingVehicle {
    pub name: String,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub total_price: Decimal,
    pub car: BookingVehicle,
    #[serde(with = "iso_timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso_timestamp")]
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CancelRefusal {
    #[error("Only booked reservations can be cancelled (status is {0})")]
    NotCancellable(BookingStatus),

    #[error("It's too late to cancel now.")]
    PastCutoff,
}

impl Booking {
    pub fn check_cancellable(&self, now: DateTime<Utc>) -> Result<(), CancelRefusal> {
        if self.status != BookingStatus::Booked {
            return Err(CancelRefusal::NotCancellable(self.status.clone()));
        }

        if self.start_date.signed_duration_since(now) <= Duration::hours(CANCELLATION_CUTOFF_HOURS) {
            return Err(CancelRefusal::PastCutoff);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn card() -> CardInfo {
        CardInfo::new(
            "4111 1111 1111 1111".to_string(),
            "Jane Doe".to_string(),
            "09/27".to_string(),
            "123".to_string(),
        )
    }

    fn booking(status: BookingStatus, start: DateTime<Utc>) -> Booking {
        Booking {
            id: "b1".to_string(),
            status,
            total_price: dec!(100),
            car: BookingVehicle {
                name: "Corolla".to_string(),
                model: "Toyota".to_string(),
            },
            start_date: start,
            end_date: start + Duration::days(2),
        }
    }

    #[test]
    fn test_cash_booking_omits_card_fields() {
        let request = CreateBookingRequest::new(PaymentMethod::Cash, "12 Main St".to_string(), Some(card()));
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["paymentMethod"], "cash");
        assert_eq!(object["pickupAddress"], "12 Main St");
        assert!(!object.contains_key("cardInfo"));
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn test_card_booking_includes_card_fields() {
        let request = CreateBookingRequest::new(PaymentMethod::Card, " 12 Main St ".to_string(), Some(card()));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["paymentMethod"], "card");
        assert_eq!(value["pickupAddress"], "12 Main St");
        assert_eq!(value["cardInfo"]["cardNumber"], "4111111111111111");
        assert_eq!(value["cardInfo"]["cardHolderName"], "Jane Doe");
        assert_eq!(value["cardInfo"]["expirationDate"], "09/27");
        assert_eq!(value["cardInfo"]["cvv"], "123");
    }

    #[test]
    fn test_card_validation() {
        assert!(card().validate().is_ok());

        let mut bad = card();
        bad.expiration_date = "13/27".to_string();
        assert!(bad.validate().is_err());

        let mut bad = card();
        bad.cvv = "12".to_string();
        assert!(bad.validate().is_err());

        let mut bad = card();
        bad.card_number = "4111-1111".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_card_debug_is_masked() {
        let output = format!("{:?}", card());
        assert!(output.contains("**** 1111"));
        assert!(!output.contains("4111111111111111"));
        assert!(!output.contains("123"));
    }

    #[test]
    fn test_deserialize_booking_list() {
        let json = r#"[{
            "_id": "b9",
            "status": "booked",
            "totalPrice": 240,
            "car": {"name": "Civic", "model": "Honda"},
            "startDate": "2024-07-01T00:00:00.000Z",
            "endDate": "2024-07-04T00:00:00.000Z"
        }, {
            "_id": "b10",
            "status": "refunded",
            "totalPrice": 0,
            "car": {"name": "Golf"},
            "startDate": "2024-08-01",
            "endDate": "2024-08-02"
        }]"#;

        let bookings: Vec<Booking> = serde_json::from_str(json).unwrap();
        assert_eq!(bookings[0].status, BookingStatus::Booked);
        assert_eq!(bookings[0].total_price, dec!(240));
        assert_eq!(bookings[1].status, BookingStatus::Unknown);
        assert_eq!(bookings[1].car.model, "");
    }

    #[test]
    fn test_cancellation_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();

        let far = booking(BookingStatus::Booked, now + Duration::hours(25));
        assert!(far.check_cancellable(now).is_ok());

        let exactly = booking(BookingStatus::Booked, now + Duration::hours(24));
        assert_eq!(exactly.check_cancellable(now), Err(CancelRefusal::PastCutoff));

        let started = booking(BookingStatus::Booked, now - Duration::hours(1));
        assert_eq!(started.check_cancellable(now), Err(CancelRefusal::PastCutoff));
    }

    #[test]
    fn test_only_booked_status_is_cancellable() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let pending = booking(BookingStatus::Pending, now + Duration::days(10));
        assert_eq!(
            pending.check_cancellable(now),
            Err(CancelRefusal::NotCancellable(BookingStatus::Pending))
        );
    }
}
