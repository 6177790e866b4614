use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pricing::{price_for, rental_days, DateRange};
use crate::utils::dates::iso_date;

/// Denormalized copy of the vehicle fields a cart item needs for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartVehicle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub price_per_day: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "CartItemRecord")]
pub struct CartItem {
    pub car: CartVehicle,
    #[serde(with = "iso_date")]
    start_date: NaiveDate,
    #[serde(with = "iso_date")]
    end_date: NaiveDate,
    days: i64,
    /// Rate snapshot captured when the item was added.
    price_per_day: Decimal,
}

impl CartItem {
    /// Builds an item priced at the vehicle's current rate.
    pub fn new(car: CartVehicle, range: DateRange) -> Self {
        let price_per_day = car.price_per_day;
        Self {
            car,
            start_date: range.start,
            end_date: range.end,
            days: rental_days(range.start, range.end),
            price_per_day,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.car.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn rate_snapshot(&self) -> Decimal {
        self.price_per_day
    }

    pub fn subtotal(&self) -> Decimal {
        price_for(self.days, self.price_per_day)
    }

    fn reschedule(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start;
        self.end_date = end;
        self.days = rental_days(start, end);
    }

    fn has_consistent_days(&self) -> bool {
        self.days == rental_days(self.start_date, self.end_date)
    }
}

/// Cart item as the server sends it. Any `days` field in the payload is
/// ignored; the duration always comes from the dates.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRecord {
    car: CartVehicle,
    #[serde(with = "iso_date")]
    start_date: NaiveDate,
    #[serde(with = "iso_date")]
    end_date: NaiveDate,
    price_per_day: Decimal,
}

impl From<CartItemRecord> for CartItem {
    fn from(record: CartItemRecord) -> Self {
        Self {
            car: record.car,
            start_date: record.start_date,
            end_date: record.end_date,
            days: rental_days(record.start_date, record.end_date),
            price_per_day: record.price_per_day,
        }
    }
}

/// A local change to one item's rental dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEdit {
    Start(NaiveDate),
    End(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl DateEdit {
    fn apply(self, start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DateEdit::Start(new_start) => (new_start, end),
            DateEdit::End(new_end) => (start, new_end),
            DateEdit::Range(new_start, new_end) => (new_start, new_end),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CartError {
    #[error("No cart item for vehicle {0}")]
    ItemNotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    total_amount: Decimal,
}

impl Cart {
    pub fn new(id: String, user: String, items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            id,
            user,
            items,
            total_amount: Decimal::ZERO,
        };
        cart.recompute_total();
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn find_item(&self, vehicle_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.vehicle_id() == vehicle_id)
    }

    /// Sum of every item's `days * rate snapshot`, from scratch.
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn recompute_total(&mut self) -> Decimal {
        self.total_amount = self.computed_total();
        self.total_amount
    }

    /// Whether every item's duration matches its dates and the stored total
    /// matches the items.
    pub fn is_consistent(&self) -> bool {
        self.items.iter().all(CartItem::has_consistent_days)
            && self.total_amount == self.computed_total()
    }

    /// Returns a copy with the dates of every item for `vehicle_id` changed
    /// and all totals recomputed.
    ///
    /// Inverted ranges are accepted and price the item at zero. Past start
    /// dates are not rejected here; only the add flow checks those.
    pub fn with_dates(&self, vehicle_id: &str, edit: DateEdit) -> Result<Cart, CartError> {
        let mut updated = self.clone();
        let mut matched = false;
        for item in updated
            .items
            .iter_mut()
            .filter(|item| item.vehicle_id() == vehicle_id)
        {
            let (start, end) = edit.apply(item.start_date, item.end_date);
            item.reschedule(start, end);
            matched = true;
        }

        if !matched {
            return Err(CartError::ItemNotFound(vehicle_id.to_string()));
        }

        updated.recompute_total();
        Ok(updated)
    }
}

/// Body of `POST /api/cart/add`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub car_id: String,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
}

impl AddToCartRequest {
    pub fn new(car_id: String, range: DateRange) -> Self {
        Self {
            car_id,
            start_date: range.start,
            end_date: range.end,
        }
    }
}

/// Body of `DELETE /api/cart/item`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub car_id: String,
}
