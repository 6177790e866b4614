use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rental-cli")]
#[command(about = "Browse, reserve and book rental cars from the terminal")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication related commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Browse the vehicle catalog
    Cars {
        #[command(subcommand)]
        command: CarCommands,
    },
    /// Manage your cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Book everything in your cart
    Checkout {
        /// Payment method
        #[arg(short, long)]
        payment: Option<PaymentChoice>,
        /// Pickup address
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Booking history
    Bookings {
        #[command(subcommand)]
        command: BookingCommands,
    },
    /// Show your profile
    Profile,
    /// Vehicle administration (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Register a new user account
    Register,
    /// Login to an existing account
    Login,
    /// Logout from current session
    Logout,
    /// Show current authentication status
    Status,
}

#[derive(Subcommand)]
pub enum CarCommands {
    /// List vehicles, available ones only unless --all is given
    List {
        /// Filter by model
        #[arg(short, long)]
        model: Option<String>,
        /// Search name or model
        #[arg(short, long)]
        search: Option<String>,
        /// Include vehicles that are currently rented
        #[arg(short, long)]
        all: bool,
    },
    /// List the model labels in the catalog
    Models,
    /// Show a vehicle with a price preview
    Show {
        /// Vehicle ID
        id: String,
        /// Rental start (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Rental end (YYYY-MM-DD), defaults to the day after the start
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show cart items and total
    Show,
    /// Add a vehicle to the cart
    Add {
        /// Vehicle ID
        id: String,
        /// Rental start (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Rental end (YYYY-MM-DD), defaults to the day after the start
        #[arg(long)]
        end: Option<String>,
    },
    /// Remove a vehicle from the cart
    Remove {
        /// Vehicle ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Preview an item with different dates
    Edit {
        /// Vehicle ID
        id: String,
        /// New start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// New end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BookingCommands {
    /// List your bookings
    List,
    /// Cancel a booking
    Cancel {
        /// Booking ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Add a vehicle to the catalog
    Add {
        /// Picture to upload
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Update an existing vehicle
    Update {
        /// Vehicle ID
        id: String,
        /// Replacement picture
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Delete a vehicle
    Delete {
        /// Vehicle ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PaymentChoice {
    Card,
    Cash,
}

impl fmt::Display for PaymentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentChoice::Card => write!(f, "card"),
            PaymentChoice::Cash => write!(f, "cash"),
        }
    }
}
