//! Catalog, cart, and checkout commands.

use clap::Args;

use meridian_core::{CartItemId, ProductId, ShippingAddress};
use meridian_storefront::api::{CartApi, CatalogApi, OrderApi, ProductFilters, UserApi};
use meridian_storefront::checkout::{CheckoutError, CheckoutFlow, PaymentDetails, ShippingMethod};
use meridian_storefront::stores::{AuthStore, CartStore};

use super::{CliError, load_session};

/// List a catalog page.
#[allow(clippy::print_stdout)]
pub async fn products(
    page: u32,
    search: Option<String>,
    category: Option<String>,
) -> Result<(), CliError> {
    let (config, _) = load_session()?;
    let catalog = CatalogApi::new(&config)?;

    let filters = ProductFilters {
        search,
        category,
        ..ProductFilters::default()
    };
    let slice = catalog.list(page, 20, &filters).await?;

    for product in &slice.data {
        println!(
            "{:>6}  {:<40} {:>10}  stock {}",
            product.id, product.name, product.price, product.stock
        );
    }
    println!(
        "page {}/{} ({} products)",
        slice.page, slice.total_pages, slice.total
    );
    Ok(())
}

/// Show one product.
#[allow(clippy::print_stdout)]
pub async fn product(id: ProductId) -> Result<(), CliError> {
    let (config, _) = load_session()?;
    let product = CatalogApi::new(&config)?.get(id).await?;

    println!("{} (#{})", product.name, product.id);
    println!("price:    {}", product.price);
    println!("category: {}", product.category);
    println!("stock:    {}", product.stock);
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
    Ok(())
}

/// List the catalog categories.
#[allow(clippy::print_stdout)]
pub async fn categories() -> Result<(), CliError> {
    let (config, _) = load_session()?;
    for category in CatalogApi::new(&config)?.categories().await?.iter() {
        println!("{category}");
    }
    Ok(())
}

/// Show the cart with its pricing breakdown.
#[allow(clippy::print_stdout)]
pub async fn cart() -> Result<(), CliError> {
    let ctx = ShopContext::open()?;
    let cart = ctx.cart;
    if !cart.refresh().await {
        return Err(CliError::Message("could not load the cart".into()));
    }

    let Some(snapshot) = cart.current() else {
        println!("cart is empty");
        return Ok(());
    };
    for item in &snapshot.cart_items {
        println!(
            "{:>6}  {:<40} {:>3} x {:>8} = {:>10}",
            item.id, item.product_name, item.quantity, item.unit_price, item.total_price
        );
    }
    println!("subtotal: {:>10}", cart.subtotal());
    println!("delivery: {:>10}", cart.delivery_charge());
    println!("tax:      {:>10}", cart.tax_amount());
    if let Some(coupon) = cart.applied_coupon() {
        println!("coupon:   {:>10} ({})", cart.discount(), coupon.code);
    }
    println!("total:    {:>10}", cart.total());
    Ok(())
}

/// Add a product to the cart.
#[allow(clippy::print_stdout)]
pub async fn add(id: ProductId, quantity: u32) -> Result<(), CliError> {
    let ctx = ShopContext::open()?;
    let cart = ctx.cart;
    let product = CatalogApi::new(&ctx.config)?.get(id).await?;

    if cart.add_item(&product, quantity).await {
        println!(
            "added {} x {} ({} items in cart)",
            quantity,
            product.name,
            cart.item_count()
        );
        Ok(())
    } else {
        Err(CliError::Message("could not add the item".into()))
    }
}

/// Remove a cart line item.
#[allow(clippy::print_stdout)]
pub async fn remove(item: CartItemId) -> Result<(), CliError> {
    let cart = ShopContext::open()?.cart;
    cart.refresh().await;
    if cart.remove_item(item).await {
        println!("removed ({} items in cart)", cart.item_count());
        Ok(())
    } else {
        Err(CliError::Message("could not remove the item".into()))
    }
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub async fn clear() -> Result<(), CliError> {
    let cart = ShopContext::open()?.cart;
    if cart.clear().await {
        println!("cart cleared");
        Ok(())
    } else {
        Err(CliError::Message("could not clear the cart".into()))
    }
}

/// Apply a coupon code against the current cart.
#[allow(clippy::print_stdout)]
pub async fn coupon(code: &str) -> Result<(), CliError> {
    let cart = ShopContext::open()?.cart;
    if !cart.refresh().await {
        return Err(CliError::Message("could not load the cart".into()));
    }

    let outcome = cart.apply_coupon(code);
    if outcome.success {
        println!("{}", outcome.message);
        println!("total: {}", cart.total());
        Ok(())
    } else {
        Err(CliError::Message(outcome.message))
    }
}

/// Inputs for a one-shot checkout.
#[derive(Debug, Args)]
pub struct CheckoutInput {
    /// Recipient first name
    #[arg(long)]
    pub first_name: String,

    /// Recipient last name
    #[arg(long)]
    pub last_name: String,

    /// Street address
    #[arg(long)]
    pub street: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    pub apartment: Option<String>,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub country: String,

    #[arg(long)]
    pub zipcode: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Shipping method: standard, express, or overnight
    #[arg(long, default_value = "standard")]
    pub shipping: String,

    /// Payment method: cod, upi, paypal, or card
    #[arg(long, default_value = "cod")]
    pub pay: String,

    /// UPI id (with --pay upi)
    #[arg(long)]
    pub vpa: Option<String>,

    /// PayPal account email (with --pay paypal)
    #[arg(long)]
    pub paypal_email: Option<String>,

    /// Card number, four groups of four digits (with --pay card)
    #[arg(long)]
    pub card_number: Option<String>,

    /// Name on the card (with --pay card)
    #[arg(long)]
    pub card_holder: Option<String>,

    /// Card expiry, MM/YY (with --pay card)
    #[arg(long)]
    pub expiry: Option<String>,

    /// Card CVC (with --pay card)
    #[arg(long)]
    pub cvc: Option<String>,

    /// Delivery notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Place an order from the current cart.
#[allow(clippy::print_stdout)]
pub async fn checkout(input: CheckoutInput) -> Result<(), CliError> {
    let ctx = ShopContext::open()?;
    if !ctx.cart.refresh().await {
        return Err(CliError::Message("could not load the cart".into()));
    }
    if ctx.cart.item_count() == 0 {
        return Err(CliError::Message("cart is empty".into()));
    }

    let shipping = match input.shipping.as_str() {
        "standard" => ShippingMethod::Standard,
        "express" => ShippingMethod::Express,
        "overnight" => ShippingMethod::Overnight,
        other => {
            return Err(CliError::Message(format!(
                "unknown shipping method: {other}"
            )));
        }
    };
    let payment = match input.pay.as_str() {
        "cod" => PaymentDetails::CashOnDelivery,
        "upi" => PaymentDetails::Upi {
            vpa: input.vpa.unwrap_or_default(),
        },
        "paypal" => PaymentDetails::Paypal {
            email: input.paypal_email.unwrap_or_default(),
        },
        "card" => PaymentDetails::Card {
            number: input.card_number.unwrap_or_default(),
            holder: input.card_holder.unwrap_or_default(),
            expiry: input.expiry.unwrap_or_default(),
            cvc: input.cvc.unwrap_or_default(),
        },
        other => {
            return Err(CliError::Message(format!("unknown payment method: {other}")));
        }
    };

    let mut flow = CheckoutFlow::new(
        ctx.cart.clone(),
        OrderApi::new(&ctx.config)?,
        ctx.auth.subscribe(),
    );
    flow.set_address(ShippingAddress {
        first_name: input.first_name,
        last_name: input.last_name,
        street: input.street,
        apartment: input.apartment,
        city: input.city,
        country: input.country,
        zipcode: input.zipcode,
        phone: input.phone,
    });
    advance(flow.next())?;
    flow.set_shipping_method(shipping);
    advance(flow.next())?;
    flow.set_payment(payment);
    if let Some(notes) = input.notes {
        flow.set_notes(notes);
    }

    let order = flow.submit().await.map_err(checkout_error)?;
    let label = order
        .order_number
        .as_ref()
        .map_or_else(|| format!("#{}", order.id), |n| n.0.clone());
    println!("order placed: {label}");
    println!("total charged: {}", order.final_amount);
    Ok(())
}

fn advance(
    result: Result<meridian_storefront::checkout::CheckoutStep, CheckoutError>,
) -> Result<(), CliError> {
    result.map(|_| ()).map_err(checkout_error)
}

fn checkout_error(e: CheckoutError) -> CliError {
    match e {
        CheckoutError::Invalid(errors) => {
            let details = errors
                .iter()
                .map(|f| format!("{}: {}", f.field, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            CliError::Message(details)
        }
        CheckoutError::NotAuthenticated => CliError::NotLoggedIn,
        other => CliError::Message(other.to_string()),
    }
}

struct ShopContext {
    config: meridian_storefront::config::StorefrontConfig,
    auth: AuthStore,
    cart: CartStore,
}

impl ShopContext {
    fn open() -> Result<Self, CliError> {
        let (config, session) = load_session()?;
        let auth = AuthStore::new(UserApi::new(&config)?, session.clone());
        if !auth.is_logged_in() {
            return Err(CliError::NotLoggedIn);
        }
        let cart = CartStore::new(CartApi::new(&config)?, session, auth.subscribe());
        Ok(Self { config, auth, cart })
    }
}
