use chrono::{DateTime, Local, NaiveDate, Utc};
use console::style;
use rust_decimal::Decimal;
use tabled::{
    settings::{Alignment, Style},
    Table, Tabled,
};
use url::Url;

use crate::models::{
    booking::{Booking, BookingStatus},
    cart::Cart,
    pricing::Quote,
    vehicle::Vehicle,
};

#[derive(Tabled)]
struct VehicleTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Per Day")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "Car ID")]
    id: String,
    #[tabled(rename = "Car")]
    name: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Days")]
    days: i64,
    #[tabled(rename = "Per Day")]
    rate: String,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

#[derive(Tabled)]
struct BookingTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Car")]
    car: String,
    #[tabled(rename = "From")]
    start: String,
    #[tabled(rename = "To")]
    end: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn format_vehicle_table(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return String::new();
    }

    let rows: Vec<VehicleTableRow> = vehicles
        .iter()
        .map(|vehicle| VehicleTableRow {
            id: vehicle.id.clone(),
            name: truncate(&vehicle.name, 30),
            model: vehicle.model.clone(),
            price: format_money(vehicle.price_per_day),
            status: format_availability(vehicle.available),
        })
        .collect();

    render(Table::new(rows))
}

pub fn format_vehicle_detail(vehicle: &Vehicle, origin: &Url) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("ID").bold(), style(&vehicle.id).cyan()));
    output.push_str(&format!("{}: {}\n", style("Name").bold(), style(&vehicle.name).green()));
    output.push_str(&format!("{}: {}\n", style("Model").bold(), &vehicle.model));

    if !vehicle.description.is_empty() {
        output.push_str(&format!(
            "{}: {}\n",
            style("Description").bold(),
            style(&vehicle.description).dim()
        ));
    }

    output.push_str(&format!(
        "{}: {}\n",
        style("Price").bold(),
        style(format!("{}/day", format_money(vehicle.price_per_day))).yellow()
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Status").bold(),
        format_availability(vehicle.available)
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Image").bold(),
        style(vehicle.image_url(origin)).dim()
    ));

    output
}

pub fn format_quote(quote: &Quote) -> String {
    format!(
        "{} to {}: {} days x {} = {}",
        format_calendar_date(&quote.range.start),
        format_calendar_date(&quote.range.end),
        quote.days,
        format_money(quote.rate_per_day),
        style(format_money(quote.total)).green().bold()
    )
}

pub fn format_cart_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return String::new();
    }

    let rows: Vec<CartTableRow> = cart
        .items()
        .iter()
        .map(|item| CartTableRow {
            id: item.vehicle_id().to_string(),
            name: truncate(&item.car.name, 30),
            start: format_calendar_date(&item.start_date()),
            end: format_calendar_date(&item.end_date()),
            days: item.days(),
            rate: format_money(item.rate_snapshot()),
            subtotal: format_money(item.subtotal()),
        })
        .collect();

    render(Table::new(rows))
}

pub fn format_cart_summary(cart: &Cart) -> String {
    format!(
        "{} items  {}: {}",
        cart.items().len(),
        style("Total").bold(),
        style(format_money(cart.total_amount())).green().bold()
    )
}

pub fn format_booking_table(bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return String::new();
    }

    let rows: Vec<BookingTableRow> = bookings
        .iter()
        .map(|booking| BookingTableRow {
            id: booking.id.clone(),
            car: truncate(&format!("{} {}", booking.car.name, booking.car.model), 30),
            start: format_date(&booking.start_date),
            end: format_date(&booking.end_date),
            total: format_money(booking.total_price),
            status: format_status(&booking.status),
        })
        .collect();

    render(Table::new(rows))
}

/// Dollar amount with two decimal places, e.g. `$190.00`.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_calendar_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn render(mut table: Table) -> String {
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_availability(available: bool) -> String {
    if available {
        style("Available").green().to_string()
    } else {
        style("Rented").red().to_string()
    }
}

fn format_status(status: &BookingStatus) -> String {
    match status {
        BookingStatus::Pending => style("Pending").yellow().to_string(),
        BookingStatus::Booked => style("Booked").green().to_string(),
        BookingStatus::Cancelled => style("Cancelled").dim().to_string(),
        BookingStatus::Unknown => style("Unknown").red().to_string(),
    }
}
