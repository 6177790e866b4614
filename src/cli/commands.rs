use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::{
    api::{
        repositories::{
            HttpBookingRepository, HttpCartRepository, HttpUserRepository, HttpVehicleRepository,
        },
        ApiClient,
    },
    cli::args::*,
    models::{
        booking::{CardInfo, CreateBookingRequest, PaymentMethod},
        cart::DateEdit,
        pricing::DateRange,
        user::{RegistrationError, StoreUserRequest},
        vehicle::{VehicleFilter, VehicleForm},
    },
    services::{
        AuthService, AuthServiceError, BookingService, BookingServiceError, CartService,
        CartServiceError, CatalogService, CatalogServiceError, Session, UserService,
        UserServiceError,
    },
    utils::{
        dates::{parse_calendar_date, today},
        formatting::{
            format_booking_table, format_cart_summary, format_cart_table, format_money,
            format_quote, format_vehicle_detail, format_vehicle_table,
        },
        Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CAR: Emoji<'_, '_> = Emoji("🚗 ", "");

pub struct CliApp {
    client: ApiClient,
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
    catalog_service: Arc<CatalogService>,
    cart_service: Arc<CartService>,
    booking_service: Arc<BookingService>,
}

impl CliApp {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(&config.api_url).context("Failed to initialize API client")?;

        let user_repo = Arc::new(HttpUserRepository::new(client.clone()));
        let vehicle_repo = Arc::new(HttpVehicleRepository::new(client.clone()));
        let cart_repo = Arc::new(HttpCartRepository::new(client.clone()));
        let booking_repo = Arc::new(HttpBookingRepository::new(client.clone()));

        let auth_service = Arc::new(AuthService::new(user_repo.clone(), config.session_dir.clone())?);
        let user_service = Arc::new(UserService::new(user_repo));
        let catalog_service = Arc::new(CatalogService::new(vehicle_repo));
        let cart_service = Arc::new(CartService::new(cart_repo));
        let booking_service = Arc::new(BookingService::new(booking_repo));

        Ok(Self {
            client,
            auth_service,
            user_service,
            catalog_service,
            cart_service,
            booking_service,
        })
    }

    pub async fn run(&self, args: Args) -> Result<()> {
        match args.command {
            Commands::Auth { command } => self.handle_auth_command(command).await,
            Commands::Cars { command } => self.handle_car_command(command).await,
            Commands::Cart { command } => self.handle_cart_command(command).await,
            Commands::Checkout { payment, address } => self.handle_checkout(payment, address).await,
            Commands::Bookings { command } => self.handle_booking_command(command).await,
            Commands::Profile => self.handle_profile().await,
            Commands::Admin { command } => self.handle_admin_command(command).await,
        }
    }

    /// Session for commands that need one; prints the login hint when there is none.
    fn require_session(&self) -> Option<Session> {
        let session = self.auth_service.current_session();
        if session.is_authenticated() {
            Some(session)
        } else {
            println!(
                "{} Please log in first! Use {}",
                WARNING,
                style("rental-cli auth login").cyan()
            );
            None
        }
    }

    // Authentication Commands
    async fn handle_auth_command(&self, command: AuthCommands) -> Result<()> {
        match command {
            AuthCommands::Register => self.handle_register().await,
            AuthCommands::Login => self.handle_login().await,
            AuthCommands::Logout => self.handle_logout().await,
            AuthCommands::Status => self.handle_auth_status().await,
        }
    }

    async fn handle_register(&self) -> Result<()> {
        println!("{} {}", ROCKET, style("User Registration").bold().cyan());

        let theme = ColorfulTheme::default();

        let name: String = Input::with_theme(&theme)
            .with_prompt("Full name")
            .interact_text()?;

        let email: String = Input::with_theme(&theme)
            .with_prompt("Email")
            .validate_with(|input: &String| -> Result<(), &str> {
                if !input.contains('@') {
                    Err("Please enter a valid email address")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let phone: String = Input::with_theme(&theme)
            .with_prompt("Phone")
            .allow_empty(true)
            .interact_text()?;

        let password: String = Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?;

        let confirm: String = Password::with_theme(&theme)
            .with_prompt("Confirm password")
            .interact()?;

        let request = match StoreUserRequest::new(name, email, phone, password, &confirm) {
            Ok(request) => request,
            Err(RegistrationError::PasswordMismatch) => {
                println!("{} Passwords don't match", CROSS);
                return Ok(());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                return Ok(());
            }
        };

        match self.user_service.register(request).await {
            Ok(()) => {
                println!("{} Registration successful! Please log in.", CHECKMARK);
                println!("Use {} to continue", style("rental-cli auth login").cyan());
            }
            Err(UserServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Registration failed.")).red());
            }
            Err(e) => {
                println!("{} Registration failed: {}", CROSS, style(&e).red());
                error!("Registration failed: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_login(&self) -> Result<()> {
        println!("{} {}", ROCKET, style("User Login").bold().cyan());

        let theme = ColorfulTheme::default();

        let email: String = Input::with_theme(&theme)
            .with_prompt("Email")
            .interact_text()?;

        let password: String = Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;

        match self.auth_service.login(&email, &password).await {
            Ok(_) => {
                println!("{} Login successful!", CHECKMARK);
                info!("User {} logged in", email);
            }
            Err(AuthServiceError::MissingCredentials) => {
                println!("{} Email and password are required", CROSS);
            }
            Err(AuthServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Invalid email or password.")).red());
                warn!("Login failed for user: {}", email);
            }
            Err(e) => {
                println!("{} Login failed: {}", CROSS, style(&e).red());
                error!("Login failed: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_logout(&self) -> Result<()> {
        match self.auth_service.logout().await {
            Ok(_) => {
                println!("{} Logged out successfully", CHECKMARK);
            }
            Err(e) => {
                println!("{} Logout failed: {}", CROSS, style(&e).red());
                error!("Logout failed: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_auth_status(&self) -> Result<()> {
        let session = self.auth_service.current_session();
        if !session.is_authenticated() {
            println!("{} {}", WARNING, style("Not authenticated").yellow());
            println!("Use {} to login", style("rental-cli auth login").cyan());
            return Ok(());
        }

        println!("{} {}", INFO, style("Authentication Status").bold().cyan());
        println!("Status: {}", style("Authenticated").green());

        match self.user_service.get_profile(&session).await {
            Ok(profile) => {
                println!("Name: {}", style(&profile.name).green());
                println!("Email: {}", style(&profile.email).green());
            }
            Err(e) => {
                warn!("Could not load profile: {}", e);
                println!(
                    "{} {}",
                    WARNING,
                    style(e.user_message("Stored session could not be verified.")).yellow()
                );
            }
        }

        Ok(())
    }

    async fn handle_profile(&self) -> Result<()> {
        let Some(session) = self.require_session() else {
            return Ok(());
        };

        match self.user_service.get_profile(&session).await {
            Ok(profile) => {
                println!("{} {}", INFO, style("Profile").bold().cyan());
                println!("{}: {}", style("Name").bold(), style(&profile.name).green());
                println!("{}: {}", style("Email").bold(), &profile.email);
                println!("{}: {}", style("Role").bold(), style(&profile.role).dim());
            }
            Err(UserServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to fetch profile.")).red());
            }
            Err(e) => {
                println!("{} Failed to fetch profile: {}", CROSS, style(&e).red());
                error!("Failed to fetch profile: {}", e);
            }
        }

        Ok(())
    }

    // Catalog Commands
    async fn handle_car_command(&self, command: CarCommands) -> Result<()> {
        match command {
            CarCommands::List { model, search, all } => self.handle_list_cars(model, search, all).await,
            CarCommands::Models => self.handle_list_models().await,
            CarCommands::Show { id, start, end } => self.handle_show_car(id, start, end).await,
        }
    }

    async fn handle_list_cars(&self, model: Option<String>, search: Option<String>, all: bool) -> Result<()> {
        let mut filter = VehicleFilter::new();
        if let Some(model) = model {
            filter = filter.with_model(model);
        }
        if let Some(search) = search {
            filter = filter.with_search(search);
        }
        if !all {
            filter = filter.available_only();
        }

        match self.catalog_service.list_vehicles(&filter).await {
            Ok(vehicles) if vehicles.is_empty() => {
                println!("{} No cars match your filters", INFO);
            }
            Ok(vehicles) => {
                println!("{} {} ({})", CAR, style("Cars").bold().cyan(), vehicles.len());
                println!("{}", format_vehicle_table(&vehicles));
            }
            Err(CatalogServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load cars.")).red());
            }
            Err(e) => {
                println!("{} Failed to load cars: {}", CROSS, style(&e).red());
                error!("Failed to load cars: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_list_models(&self) -> Result<()> {
        match self.catalog_service.list_model_labels().await {
            Ok(labels) => {
                println!("{} {}", INFO, style("Models").bold().cyan());
                for label in labels {
                    println!("  {}", label);
                }
            }
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load models.")).red());
                error!("Failed to load models: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_show_car(&self, id: String, start: Option<String>, end: Option<String>) -> Result<()> {
        let range = parse_range(start, end, today())?;

        match self.catalog_service.quote(&id, range).await {
            Ok((vehicle, quote)) => {
                println!("{} {}", CAR, style("Car Details").bold().cyan());
                println!("{}", format_vehicle_detail(&vehicle, self.client.origin()));
                println!("{}: {}", style("Quote").bold(), format_quote(&quote));
            }
            Err(CatalogServiceError::VehicleNotFound(id)) => {
                println!("{} Car not found: {}", CROSS, style(id).red());
            }
            Err(CatalogServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load car.")).red());
            }
            Err(e) => {
                println!("{} Failed to load car: {}", CROSS, style(&e).red());
                error!("Failed to load car: {}", e);
            }
        }

        Ok(())
    }

    // Cart Commands
    async fn handle_cart_command(&self, command: CartCommands) -> Result<()> {
        let Some(session) = self.require_session() else {
            return Ok(());
        };

        match command {
            CartCommands::Show => self.handle_show_cart(&session).await,
            CartCommands::Add { id, start, end } => self.handle_add_to_cart(&session, id, start, end).await,
            CartCommands::Remove { id, force } => self.handle_remove_from_cart(&session, id, force).await,
            CartCommands::Edit { id, start, end } => self.handle_edit_cart(&session, id, start, end).await,
        }
    }

    async fn handle_show_cart(&self, session: &Session) -> Result<()> {
        match self.cart_service.get_cart(session).await {
            Ok(cart) if cart.is_empty() => {
                println!("{} Your cart is empty", INFO);
            }
            Ok(cart) => {
                println!("{} {}", CAR, style("Your Cart").bold().cyan());
                println!("{}", format_cart_table(&cart));
                println!("{}", format_cart_summary(&cart));
            }
            Err(CartServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load cart.")).red());
            }
            Err(e) => {
                println!("{} Failed to load cart: {}", CROSS, style(&e).red());
                error!("Failed to load cart: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_add_to_cart(
        &self,
        session: &Session,
        id: String,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<()> {
        let today = today();
        let range = parse_range(start, end, today)?;

        let vehicle = match self.catalog_service.get_vehicle(&id).await {
            Ok(vehicle) => vehicle,
            Err(CatalogServiceError::VehicleNotFound(id)) => {
                println!("{} Car not found: {}", CROSS, style(id).red());
                return Ok(());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load car.")).red());
                return Ok(());
            }
        };

        match self.cart_service.add_to_cart(session, &vehicle, range, today).await {
            Ok(quote) => {
                println!("{} {} added to cart", CHECKMARK, style(&vehicle.name).green());
                println!("{}", format_quote(&quote));
            }
            Err(CartServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Error adding car to cart.")).red());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
            }
        }

        Ok(())
    }

    async fn handle_remove_from_cart(&self, session: &Session, id: String, force: bool) -> Result<()> {
        if !force {
            let theme = ColorfulTheme::default();
            let confirm = Confirm::with_theme(&theme)
                .with_prompt("Remove this car from your cart?")
                .default(false)
                .interact()?;

            if !confirm {
                println!("Removal cancelled");
                return Ok(());
            }
        }

        match self.cart_service.remove_item(session, &id).await {
            Ok(cart) => {
                println!("{} Car removed from cart", CHECKMARK);
                if cart.is_empty() {
                    println!("{} Your cart is empty", INFO);
                } else {
                    println!("{}", format_cart_table(&cart));
                }
                println!("{}", format_cart_summary(&cart));
            }
            Err(CartServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to remove item.")).red());
            }
            Err(e) => {
                println!("{} Failed to remove item: {}", CROSS, style(&e).red());
                error!("Failed to remove item: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_edit_cart(
        &self,
        session: &Session,
        id: String,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<()> {
        let edit = match (parse_optional_date(start)?, parse_optional_date(end)?) {
            (Some(start), Some(end)) => DateEdit::Range(start, end),
            (Some(start), None) => DateEdit::Start(start),
            (None, Some(end)) => DateEdit::End(end),
            (None, None) => {
                println!("{} Pass --start and/or --end to change the dates", WARNING);
                return Ok(());
            }
        };

        let cart = match self.cart_service.get_cart(session).await {
            Ok(cart) => cart,
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load cart.")).red());
                return Ok(());
            }
        };

        match self.cart_service.edit_dates(&cart, &id, edit) {
            Ok(updated) => {
                println!("{} {}", INFO, style("Cart preview with new dates").bold().cyan());
                println!("{}", format_cart_table(&updated));
                println!("{}", format_cart_summary(&updated));
                println!(
                    "{}",
                    style("Date changes are a local preview; the saved cart is unchanged.").dim()
                );
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
            }
        }

        Ok(())
    }

    // Checkout
    async fn handle_checkout(&self, payment: Option<PaymentChoice>, address: Option<String>) -> Result<()> {
        let Some(session) = self.require_session() else {
            return Ok(());
        };

        let cart = match self.cart_service.get_cart(&session).await {
            Ok(cart) if cart.is_empty() => {
                println!("{} Your cart is empty", INFO);
                return Ok(());
            }
            Ok(cart) => cart,
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load cart.")).red());
                return Ok(());
            }
        };

        println!("{} {}", ROCKET, style("Checkout").bold().cyan());
        println!("{}", format_cart_table(&cart));
        println!("{}", format_cart_summary(&cart));

        let theme = ColorfulTheme::default();

        let payment_method = match payment {
            Some(PaymentChoice::Card) => PaymentMethod::Card,
            Some(PaymentChoice::Cash) => PaymentMethod::Cash,
            None => {
                let choice = Select::with_theme(&theme)
                    .with_prompt("Payment method")
                    .items(&["Card", "Cash"])
                    .default(0)
                    .interact()?;
                if choice == 0 {
                    PaymentMethod::Card
                } else {
                    PaymentMethod::Cash
                }
            }
        };

        let pickup_address = match address {
            Some(address) => address,
            None => Input::with_theme(&theme)
                .with_prompt("Pickup address")
                .interact_text()?,
        };

        let card = match payment_method {
            PaymentMethod::Card => Some(prompt_card(&theme)?),
            PaymentMethod::Cash => None,
        };

        let confirm = Confirm::with_theme(&theme)
            .with_prompt(format!("Book now for {}?", format_money(cart.total_amount())))
            .default(true)
            .interact()?;
        if !confirm {
            println!("Checkout cancelled");
            return Ok(());
        }

        let request = CreateBookingRequest::new(payment_method, pickup_address, card);
        match self.booking_service.checkout(&session, &cart, request).await {
            Ok(receipt) => {
                println!("{} Booking successful!", CHECKMARK);
                println!(
                    "{} cars, paid by {}, total {}",
                    receipt.item_count,
                    receipt.payment_method,
                    style(format_money(receipt.total)).green().bold()
                );
            }
            Err(BookingServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Booking failed. Please try again.")).red());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
            }
        }

        Ok(())
    }

    // Booking Commands
    async fn handle_booking_command(&self, command: BookingCommands) -> Result<()> {
        let Some(session) = self.require_session() else {
            return Ok(());
        };

        match command {
            BookingCommands::List => self.handle_list_bookings(&session).await,
            BookingCommands::Cancel { id, force } => self.handle_cancel_booking(&session, id, force).await,
        }
    }

    async fn handle_list_bookings(&self, session: &Session) -> Result<()> {
        match self.booking_service.list_bookings(session).await {
            Ok(bookings) if bookings.is_empty() => {
                println!("{} You have no bookings yet", INFO);
            }
            Ok(bookings) => {
                println!("{} {}", INFO, style("Your Bookings").bold().cyan());
                println!("{}", format_booking_table(&bookings));
            }
            Err(BookingServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load bookings.")).red());
            }
            Err(e) => {
                println!("{} Failed to load bookings: {}", CROSS, style(&e).red());
                error!("Failed to load bookings: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_cancel_booking(&self, session: &Session, id: String, force: bool) -> Result<()> {
        let booking = match self.booking_service.find_booking(session, &id).await {
            Ok(booking) => booking,
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load bookings.")).red());
                return Ok(());
            }
        };

        // refuse locally before asking for confirmation
        let now = Utc::now();
        if let Err(refusal) = booking.check_cancellable(now) {
            println!("{} {}", WARNING, style(refusal).yellow());
            return Ok(());
        }

        if !force {
            let theme = ColorfulTheme::default();
            let confirm = Confirm::with_theme(&theme)
                .with_prompt("Are you sure you want to cancel this booking?")
                .default(false)
                .interact()?;

            if !confirm {
                println!("Booking kept");
                return Ok(());
            }
        }

        match self.booking_service.cancel_booking(session, &booking, now).await {
            Ok(()) => {
                println!("{} Booking cancelled", CHECKMARK);
            }
            Err(BookingServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to cancel booking.")).red());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
            }
        }

        Ok(())
    }

    // Admin Commands
    async fn handle_admin_command(&self, command: AdminCommands) -> Result<()> {
        let Some(session) = self.require_session() else {
            return Ok(());
        };

        match self.user_service.get_profile(&session).await {
            Ok(profile) if profile.is_admin() => {}
            Ok(_) => {
                println!("{} Admin access required", CROSS);
                return Ok(());
            }
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to verify account.")).red());
                return Ok(());
            }
        }

        match command {
            AdminCommands::Add { picture } => self.handle_admin_add(&session, picture).await,
            AdminCommands::Update { id, picture } => self.handle_admin_update(&session, id, picture).await,
            AdminCommands::Delete { id, force } => self.handle_admin_delete(&session, id, force).await,
        }
    }

    async fn handle_admin_add(&self, session: &Session, picture: Option<PathBuf>) -> Result<()> {
        println!("{} {}", CAR, style("New Car").bold().cyan());

        let mut form = prompt_vehicle_form(&VehicleForm::new(String::new(), String::new(), Decimal::ZERO))?;
        form.picture = picture;

        match self.catalog_service.create_vehicle(session, form).await {
            Ok(vehicle) => {
                println!("{} Car added successfully!", CHECKMARK);
                println!("{}", format_vehicle_detail(&vehicle, self.client.origin()));
            }
            Err(CatalogServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to add car.")).red());
            }
            Err(e) => {
                println!("{} Failed to add car: {}", CROSS, style(&e).red());
                error!("Failed to add car: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_admin_update(&self, session: &Session, id: String, picture: Option<PathBuf>) -> Result<()> {
        let vehicle = match self.catalog_service.get_vehicle(&id).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to load car.")).red());
                return Ok(());
            }
        };

        println!("{} {} {}", CAR, style("Editing").bold().cyan(), style(&vehicle.name).green());

        let mut form = prompt_vehicle_form(&VehicleForm::from(&vehicle))?;
        form.picture = picture;

        match self.catalog_service.update_vehicle(session, &id, form).await {
            Ok(vehicle) => {
                println!("{} Car updated successfully!", CHECKMARK);
                println!("{}", format_vehicle_detail(&vehicle, self.client.origin()));
            }
            Err(CatalogServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to update car.")).red());
            }
            Err(e) => {
                println!("{} Failed to update car: {}", CROSS, style(&e).red());
                error!("Failed to update car: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_admin_delete(&self, session: &Session, id: String, force: bool) -> Result<()> {
        if !force {
            let theme = ColorfulTheme::default();
            let confirm = Confirm::with_theme(&theme)
                .with_prompt("Are you sure you want to delete this car?")
                .default(false)
                .interact()?;

            if !confirm {
                println!("Car deletion cancelled");
                return Ok(());
            }
        }

        match self.catalog_service.delete_vehicle(session, &id).await {
            Ok(()) => {
                println!("{} Car deleted successfully!", CHECKMARK);
            }
            Err(CatalogServiceError::Api(e)) => {
                println!("{} {}", CROSS, style(e.user_message("Failed to delete car.")).red());
            }
            Err(e) => {
                println!("{} Failed to delete car: {}", CROSS, style(&e).red());
                error!("Failed to delete car: {}", e);
            }
        }

        Ok(())
    }
}

fn parse_optional_date(input: Option<String>) -> Result<Option<NaiveDate>> {
    input
        .map(|value| {
            parse_calendar_date(value.trim()).context("Invalid date format. Use YYYY-MM-DD")
        })
        .transpose()
}

/// Missing dates default to `today` and the day after the start.
fn parse_range(start: Option<String>, end: Option<String>, today: NaiveDate) -> Result<DateRange> {
    let start = parse_optional_date(start)?.unwrap_or(today);
    let end = parse_optional_date(end)?.unwrap_or_else(|| DateRange::starting(start).end);
    Ok(DateRange::new(start, end))
}

fn prompt_card(theme: &ColorfulTheme) -> Result<CardInfo> {
    let card_number: String = Input::with_theme(theme)
        .with_prompt("Card number")
        .interact_text()?;
    let card_holder_name: String = Input::with_theme(theme)
        .with_prompt("Card holder name")
        .interact_text()?;
    let expiration_date: String = Input::with_theme(theme)
        .with_prompt("Expiration (MM/YY)")
        .interact_text()?;
    let cvv: String = Password::with_theme(theme)
        .with_prompt("CVV")
        .interact()?;

    Ok(CardInfo::new(card_number, card_holder_name, expiration_date, cvv))
}

fn prompt_vehicle_form(current: &VehicleForm) -> Result<VehicleForm> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Name")
        .with_initial_text(current.name.clone())
        .interact_text()?;

    let model: String = Input::with_theme(&theme)
        .with_prompt("Model")
        .with_initial_text(current.model.clone())
        .interact_text()?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .with_initial_text(current.description.clone())
        .allow_empty(true)
        .interact_text()?;

    let price: String = Input::with_theme(&theme)
        .with_prompt("Price per day")
        .with_initial_text(current.price_per_day.to_string())
        .validate_with(|input: &String| -> Result<(), &str> {
            match input.trim().parse::<Decimal>() {
                Ok(rate) if !rate.is_sign_negative() => Ok(()),
                _ => Err("Enter a non-negative amount"),
            }
        })
        .interact_text()?;

    let available = Confirm::with_theme(&theme)
        .with_prompt("Available for rent?")
        .default(current.available)
        .interact()?;

    let mut form = VehicleForm::new(
        name,
        model,
        price.trim().parse::<Decimal>().context("Invalid price")?,
    );
    form.description = description;
    form.available = available;
    Ok(form)
}
