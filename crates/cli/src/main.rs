//! Meridian CLI - shop, track orders, and run the back office from the
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session persists across invocations)
//! meridian auth login -e jane@example.com -p hunter2
//!
//! # Browse and buy
//! meridian shop products --search headphones
//! meridian shop add 7 --quantity 2
//! meridian shop cart
//! meridian shop coupon ABOVE400
//!
//! # Save for later
//! meridian wishlist create Favorites
//! meridian wishlist add 1 7
//!
//! # Orders
//! meridian orders list
//! meridian orders track 42
//!
//! # Back office (admin accounts only)
//! meridian admin dashboard
//! meridian admin set-status 42 shipped
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use meridian_core::{CartItemId, CollectionId, OrderId, OrderStatus, ProductId, WishlistItemId};

mod commands;

#[derive(Parser)]
#[command(name = "meridian")]
#[command(author, version, about = "Meridian commerce CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the login session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse the catalog and manage the cart
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Manage saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// View and manage your orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Back-office operations (admin accounts only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in account
    Whoami,
}

#[derive(Subcommand)]
enum ShopAction {
    /// List products
    Products {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Product { id: i64 },
    /// List the catalog categories
    Categories,
    /// Show the cart with totals
    Cart,
    /// Add a product to the cart
    Add {
        /// Product id
        id: i64,

        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a cart line item
    Remove {
        /// Cart item id
        item: i64,
    },
    /// Empty the cart
    Clear,
    /// Apply a coupon code to the cart
    Coupon { code: String },
    /// Place an order from the current cart
    #[command(arg_required_else_help = true)]
    Checkout(commands::shop::CheckoutInput),
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show every collection and its saved items
    List,
    /// Create a new collection
    Create { name: String },
    /// Delete a collection and everything in it
    Delete {
        /// Collection id
        collection: i64,
    },
    /// Save a product into a collection
    Add {
        /// Collection id
        collection: i64,

        /// Product id
        product: i64,
    },
    /// Remove a saved item from a collection
    Remove {
        /// Collection id
        collection: i64,

        /// Wishlist item id
        item: i64,
    },
    /// Show the aggregate counts
    Stats,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders, newest first
    List {
        /// Page number (0-based)
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show one order
    Show { id: i64 },
    /// Show an order's tracking timeline
    Track { id: i64 },
    /// Cancel a pending or confirmed order
    Cancel { id: i64 },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Show the analytics dashboard
    Dashboard,
    /// Probe the analytics service
    Health,
    /// List all orders
    Orders {
        /// Filter by status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Move an order to a new status
    SetStatus {
        /// Order id
        id: i64,

        /// Target status (e.g. `confirmed`, `shipped`)
        status: OrderStatus,
    },
    /// List user accounts
    Users,
    /// Delete a product from the catalog
    DeleteProduct { id: i64 },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => commands::auth::login(&email, &password).await,
            AuthAction::Logout => commands::auth::logout(),
            AuthAction::Whoami => commands::auth::whoami(),
        },
        Commands::Shop { action } => match action {
            ShopAction::Products {
                page,
                search,
                category,
            } => commands::shop::products(page, search, category).await,
            ShopAction::Product { id } => commands::shop::product(ProductId::new(id)).await,
            ShopAction::Categories => commands::shop::categories().await,
            ShopAction::Cart => commands::shop::cart().await,
            ShopAction::Add { id, quantity } => {
                commands::shop::add(ProductId::new(id), quantity).await
            }
            ShopAction::Remove { item } => commands::shop::remove(CartItemId::new(item)).await,
            ShopAction::Clear => commands::shop::clear().await,
            ShopAction::Coupon { code } => commands::shop::coupon(&code).await,
            ShopAction::Checkout(input) => commands::shop::checkout(input).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list().await,
            WishlistAction::Create { name } => commands::wishlist::create(&name).await,
            WishlistAction::Delete { collection } => {
                commands::wishlist::delete(CollectionId::new(collection)).await
            }
            WishlistAction::Add {
                collection,
                product,
            } => {
                commands::wishlist::add(CollectionId::new(collection), ProductId::new(product))
                    .await
            }
            WishlistAction::Remove { collection, item } => {
                commands::wishlist::remove(CollectionId::new(collection), WishlistItemId::new(item))
                    .await
            }
            WishlistAction::Stats => commands::wishlist::stats().await,
        },
        Commands::Orders { action } => match action {
            OrderAction::List { page } => commands::orders::list(page).await,
            OrderAction::Show { id } => commands::orders::show(OrderId::new(id)).await,
            OrderAction::Track { id } => commands::orders::track(OrderId::new(id)).await,
            OrderAction::Cancel { id } => commands::orders::cancel(OrderId::new(id)).await,
        },
        Commands::Admin { action } => match action {
            AdminAction::Dashboard => commands::admin::dashboard().await,
            AdminAction::Health => commands::admin::health().await,
            AdminAction::Orders { status } => commands::admin::orders(status).await,
            AdminAction::SetStatus { id, status } => {
                commands::admin::set_status(OrderId::new(id), status).await
            }
            AdminAction::Users => commands::admin::users().await,
            AdminAction::DeleteProduct { id } => {
                commands::admin::delete_product(ProductId::new(id)).await
            }
        },
    }
}
