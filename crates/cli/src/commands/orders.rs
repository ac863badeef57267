//! Order commands: list, show, track, cancel.

use meridian_core::{Order, OrderId};
use meridian_storefront::api::OrderApi;
use meridian_storefront::tracking;

use super::{CliError, load_session, require_login};

/// List the caller's orders, newest first.
#[allow(clippy::print_stdout)]
pub async fn list(page: u32) -> Result<(), CliError> {
    let (config, session) = load_session()?;
    let (user, token) = require_login(&session)?;
    let api = OrderApi::new(&config)?;

    let orders = api.user_orders(user.id, page, 20, Some(&token)).await?;
    for order in &orders.content {
        print_summary(order);
    }
    println!(
        "page {}/{} ({} orders)",
        orders.page_number + 1,
        orders.total_pages,
        orders.total_elements
    );
    Ok(())
}

/// Show one order in full.
#[allow(clippy::print_stdout)]
pub async fn show(id: OrderId) -> Result<(), CliError> {
    let (config, session) = load_session()?;
    let (_, token) = require_login(&session)?;

    let order = OrderApi::new(&config)?.get(id, Some(&token)).await?;
    print_summary(&order);
    for item in &order.items {
        println!(
            "    {:<40} {:>3} x {:>8} = {:>10}",
            item.product_name, item.quantity, item.unit_price, item.total_price
        );
    }
    println!("ship to: {}", order.shipping_address.to_string().replace('\n', ", "));
    println!(
        "subtotal {} + shipping {} + tax {} - discount {} = {}",
        order.total_amount,
        order.shipping_amount,
        order.tax_amount,
        order.discount_amount,
        order.final_amount
    );
    Ok(())
}

/// Show the tracking timeline for an order.
#[allow(clippy::print_stdout)]
pub async fn track(id: OrderId) -> Result<(), CliError> {
    let (config, session) = load_session()?;
    let (_, token) = require_login(&session)?;

    let order = OrderApi::new(&config)?.get(id, Some(&token)).await?;
    let Some(view) = tracking::track(&order) else {
        return Err(CliError::Message("order has no tracking timeline yet".into()));
    };

    println!("status: {}", view.current_status.label());
    for event in &view.events {
        println!(
            "  {}  {:<40} {}",
            event.timestamp.format("%Y-%m-%d %H:%M"),
            event.description,
            event.location
        );
    }
    if let Some(eta) = view.estimated_delivery {
        println!("estimated delivery: {}", eta.format("%Y-%m-%d"));
    }
    Ok(())
}

/// Cancel a pending or confirmed order.
#[allow(clippy::print_stdout)]
pub async fn cancel(id: OrderId) -> Result<(), CliError> {
    let (config, session) = load_session()?;
    let (user, token) = require_login(&session)?;
    let api = OrderApi::new(&config)?;

    let order = api.get(id, Some(&token)).await?;
    if !order.is_cancellable() {
        return Err(CliError::Message(format!(
            "order is {} and can no longer be cancelled",
            order.order_status.label()
        )));
    }

    let cancelled = api.cancel(user.id, id, Some(&token)).await?;
    println!("order {} is now {}", cancelled.id, cancelled.order_status.label());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_summary(order: &Order) {
    let number = order
        .order_number
        .as_ref()
        .map_or_else(|| format!("#{}", order.id), |n| n.0.clone());
    let date = order
        .created_at
        .map_or_else(String::new, |at| at.format("%Y-%m-%d").to_string());
    println!(
        "{:>12}  {:<16} {:>10}  {}",
        number,
        order.order_status.label(),
        order.final_amount,
        date
    );
}
