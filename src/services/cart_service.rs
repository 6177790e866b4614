use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{repositories::CartRepository, ApiError},
    models::{
        cart::{AddToCartRequest, Cart, CartError, DateEdit},
        pricing::{DateRange, Quote},
        vehicle::Vehicle,
    },
    services::auth_service::{NotAuthenticated, Session},
};

#[derive(Error, Debug)]
pub enum CartServiceError {
    #[error(transparent)]
    NotAuthenticated(#[from] NotAuthenticated),

    #[error("{0} is not available for rent")]
    VehicleUnavailable(String),

    #[error("Start date cannot be in the past")]
    StartInPast,

    #[error("End date must be on or after the start date")]
    EndBeforeStart,

    #[error(transparent)]
    ItemNotFound(#[from] CartError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl CartServiceError {
    /// Text to show the user. API failures follow [`ApiError::user_message`];
    /// everything else is reported as is.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CartServiceError::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

pub struct CartService {
    cart_repository: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(cart_repository: Arc<dyn CartRepository>) -> Self {
        Self { cart_repository }
    }

    /// Load the user's cart with its total recomputed locally if the server's disagrees
    pub async fn get_cart(&self, session: &Session) -> Result<Cart, CartServiceError> {
        let token = session.require_token()?;

        let mut cart = self.cart_repository.find(token).await?;
        if !cart.is_consistent() {
            warn!(
                "Cart total {} disagrees with its items, recomputing",
                cart.total_amount()
            );
            cart.recompute_total();
        }

        debug!("Cart has {} items", cart.items().len());
        Ok(cart)
    }

    /// Reserve `vehicle` for `range` in the server-side cart.
    ///
    /// Returns the price preview the item was added at.
    pub async fn add_to_cart(
        &self,
        session: &Session,
        vehicle: &Vehicle,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<Quote, CartServiceError> {
        let token = session.require_token()?;

        if !vehicle.available {
            return Err(CartServiceError::VehicleUnavailable(vehicle.name.clone()));
        }
        if range.start < today {
            return Err(CartServiceError::StartInPast);
        }
        if range.is_inverted() {
            return Err(CartServiceError::EndBeforeStart);
        }

        info!(
            "Adding vehicle {} to cart from {} to {}",
            vehicle.id, range.start, range.end
        );
        let request = AddToCartRequest::new(vehicle.id.clone(), range);
        self.cart_repository.add_item(token, &request).await?;

        Ok(vehicle.quote(range))
    }

    pub async fn remove_item(
        &self,
        session: &Session,
        vehicle_id: &str,
    ) -> Result<Cart, CartServiceError> {
        let token = session.require_token()?;

        info!("Removing vehicle {} from cart", vehicle_id);
        let mut cart = self.cart_repository.remove_item(token, vehicle_id).await?;
        cart.recompute_total();
        Ok(cart)
    }

    /// Reprice one item locally. Nothing is sent to the server.
    pub fn edit_dates(
        &self,
        cart: &Cart,
        vehicle_id: &str,
        edit: DateEdit,
    ) -> Result<Cart, CartServiceError> {
        let updated = cart.with_dates(vehicle_id, edit)?;
        debug!(
            "Edited dates for {}: total {} -> {}",
            vehicle_id,
            cart.total_amount(),
            updated.total_amount()
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::{CartItem, CartVehicle};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockCartRepository {
        items: Mutex<Vec<CartItem>>,
        vehicles: Vec<CartVehicle>,
        calls: AtomicUsize,
        stale_total: Option<Decimal>,
    }

    impl MockCartRepository {
        fn new(vehicles: Vec<CartVehicle>) -> Self {
            Self {
                items: Mutex::new(Vec::new()),
                vehicles,
                calls: AtomicUsize::new(0),
                stale_total: None,
            }
        }

        fn snapshot(&self) -> Cart {
            let cart = Cart::new(
                "c1".to_string(),
                "u1".to_string(),
                self.items.lock().unwrap().clone(),
            );
            match self.stale_total {
                Some(total) => {
                    let mut json = serde_json::to_value(&cart).unwrap();
                    json["totalAmount"] = serde_json::json!(total);
                    serde_json::from_value(json).unwrap()
                }
                None => cart,
            }
        }
    }

    #[async_trait]
    impl CartRepository for MockCartRepository {
        async fn find(&self, _token: &str) -> Result<Cart, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.snapshot())
        }

        async fn add_item(&self, _token: &str, request: &AddToCartRequest) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let car = self
                .vehicles
                .iter()
                .find(|v| v.id == request.car_id)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: reqwest::StatusCode::NOT_FOUND,
                    message: Some("Car not found".to_string()),
                })?;
            self.items.lock().unwrap().push(CartItem::new(
                car,
                DateRange::new(request.start_date, request.end_date),
            ));
            Ok(())
        }

        async fn remove_item(&self, _token: &str, vehicle_id: &str) -> Result<Cart, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.items
                .lock()
                .unwrap()
                .retain(|item| item.vehicle_id() != vehicle_id);
            Ok(self.snapshot())
        }
    }

    /// Answers every call with the same HTTP error status.
    struct RejectingCartRepository {
        message: Option<&'static str>,
    }

    impl RejectingCartRepository {
        fn error(&self) -> ApiError {
            ApiError::Status {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: self.message.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl CartRepository for RejectingCartRepository {
        async fn find(&self, _token: &str) -> Result<Cart, ApiError> {
            Err(self.error())
        }

        async fn add_item(&self, _token: &str, _request: &AddToCartRequest) -> Result<(), ApiError> {
            Err(self.error())
        }

        async fn remove_item(&self, _token: &str, _vehicle_id: &str) -> Result<Cart, ApiError> {
            Err(self.error())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn corolla() -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            name: "Corolla".to_string(),
            model: "Toyota".to_string(),
            description: String::new(),
            price_per_day: dec!(50),
            available: true,
            picture: None,
        }
    }

    fn repo() -> Arc<MockCartRepository> {
        Arc::new(MockCartRepository::new(vec![CartVehicle {
            id: "v1".to_string(),
            name: "Corolla".to_string(),
            model: "Toyota".to_string(),
            price_per_day: dec!(50),
        }]))
    }

    fn session() -> Session {
        Session::with_token("t1".to_string())
    }

    #[tokio::test]
    async fn test_add_then_remove_only_item() {
        let repo = repo();
        let service = CartService::new(repo.clone());
        let today = date(2024, 1, 1);

        let quote = service
            .add_to_cart(&session(), &corolla(), DateRange::new(today, date(2024, 1, 3)), today)
            .await
            .unwrap();
        assert_eq!(quote.total, dec!(100));

        let cart = service.get_cart(&session()).await.unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_amount(), dec!(100));

        let cart = service.remove_item(&session(), "v1").await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_request() {
        let repo = repo();
        let service = CartService::new(repo.clone());
        let today = date(2024, 1, 1);
        let anonymous = Session::anonymous();

        let result = service
            .add_to_cart(&anonymous, &corolla(), DateRange::starting(today), today)
            .await;
        assert!(matches!(result, Err(CartServiceError::NotAuthenticated(_))));
        assert!(matches!(
            service.get_cart(&anonymous).await,
            Err(CartServiceError::NotAuthenticated(_))
        ));
        assert!(matches!(
            service.remove_item(&anonymous, "v1").await,
            Err(CartServiceError::NotAuthenticated(_))
        ));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_guards() {
        let repo = repo();
        let service = CartService::new(repo.clone());
        let today = date(2024, 1, 10);

        let result = service
            .add_to_cart(&session(), &corolla(), DateRange::new(date(2024, 1, 9), today), today)
            .await;
        assert!(matches!(result, Err(CartServiceError::StartInPast)));

        let result = service
            .add_to_cart(&session(), &corolla(), DateRange::new(date(2024, 1, 12), date(2024, 1, 11)), today)
            .await;
        assert!(matches!(result, Err(CartServiceError::EndBeforeStart)));

        let mut rented = corolla();
        rented.available = false;
        let result = service
            .add_to_cart(&session(), &rented, DateRange::starting(today), today)
            .await;
        assert!(matches!(result, Err(CartServiceError::VehicleUnavailable(_))));

        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_server_total_is_recomputed() {
        let mut mock = MockCartRepository::new(Vec::new());
        mock.items.lock().unwrap().push(CartItem::new(
            CartVehicle {
                id: "v1".to_string(),
                name: "Corolla".to_string(),
                model: "Toyota".to_string(),
                price_per_day: dec!(40),
            },
            DateRange::new(date(2024, 5, 1), date(2024, 5, 4)),
        ));
        mock.stale_total = Some(dec!(999));

        let service = CartService::new(Arc::new(mock));
        let cart = service.get_cart(&session()).await.unwrap();
        assert_eq!(cart.total_amount(), dec!(120));
    }

    #[tokio::test]
    async fn test_edit_dates_is_local() {
        let repo = repo();
        let service = CartService::new(repo.clone());
        let today = date(2024, 1, 1);
        service
            .add_to_cart(&session(), &corolla(), DateRange::new(today, date(2024, 1, 3)), today)
            .await
            .unwrap();
        let cart = service.get_cart(&session()).await.unwrap();
        let calls_before = repo.calls.load(Ordering::SeqCst);

        let edited = service
            .edit_dates(&cart, "v1", DateEdit::End(date(2024, 1, 5)))
            .unwrap();
        assert_eq!(edited.total_amount(), dec!(200));
        assert_eq!(repo.calls.load(Ordering::SeqCst), calls_before);

        let result = service.edit_dates(&cart, "nope", DateEdit::End(date(2024, 1, 5)));
        assert!(matches!(result, Err(CartServiceError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_failure_shows_server_text_or_fallback() {
        let service = CartService::new(Arc::new(RejectingCartRepository {
            message: Some("Cart not found"),
        }));
        let err = service.get_cart(&session()).await.unwrap_err();
        assert_eq!(err.user_message("Failed to load cart."), "Cart not found");

        let service = CartService::new(Arc::new(RejectingCartRepository { message: None }));
        let err = service.get_cart(&session()).await.unwrap_err();
        assert_eq!(err.user_message("Failed to load cart."), "Failed to load cart.");
        assert!(!err.user_message("Failed to load cart.").contains("API error"));

        let err = service.get_cart(&Session::anonymous()).await.unwrap_err();
        assert_eq!(err.user_message("Failed to load cart."), "Please log in first!");
    }
}
