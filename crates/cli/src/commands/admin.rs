//! Back-office commands. All of them require an admin session.

use meridian_admin::api::{AdminOrderApi, AdminProductApi, AdminUserApi, AnalyticsApi};
use meridian_admin::config::AdminConfig;
use meridian_admin::query::ListQuery;
use meridian_core::{OrderId, OrderStatus, ProductId};

use super::{CliError, load_session, require_login};

/// Show the analytics dashboard.
#[allow(clippy::print_stdout)]
pub async fn dashboard() -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let stats = AnalyticsApi::new(&config, token)?.dashboard().await;

    println!("revenue:       {}", stats.total_revenue);
    println!("orders:        {}", stats.total_orders);
    println!("average order: {}", stats.average_order_value);

    println!("\ntop products:");
    for product in &stats.top_products {
        println!(
            "  {:<40} {:>10}  ({} sold)",
            product.product_name, product.revenue, product.units_sold
        );
    }

    println!("\nrevenue by month:");
    for month in &stats.revenue_by_month {
        println!("  {:<4} {:>10}  ({} orders)", month.month, month.revenue, month.orders);
    }

    println!("\norders by status:");
    for entry in &stats.orders_by_status {
        println!("  {:<12} {:>4}  {:>5.1}%", entry.status, entry.count, entry.percentage);
    }
    Ok(())
}

/// Probe the analytics service.
#[allow(clippy::print_stdout)]
pub async fn health() -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let health = AnalyticsApi::new(&config, token)?.health().await;

    println!("analytics: {}", health.status);
    if let Some(error) = health.error {
        println!("  {error}");
    }
    Ok(())
}

/// List all orders, optionally filtered by status.
#[allow(clippy::print_stdout)]
pub async fn orders(status: Option<OrderStatus>) -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let api = AdminOrderApi::new(&config, token)?;

    let mut query = ListQuery::default();
    if let Some(status) = status {
        query = query.filter(
            "status",
            serde_status(status),
        );
    }
    let page = api.list(&query).await?;
    for order in &page.content {
        println!(
            "{:>6}  user {:>6}  {:<16} {:>10}",
            order.id,
            order.user_id,
            order.order_status.label(),
            order.final_amount
        );
    }
    println!("{} orders total", page.total_elements);
    Ok(())
}

/// Move an order to a new status.
#[allow(clippy::print_stdout)]
pub async fn set_status(id: OrderId, status: OrderStatus) -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let api = AdminOrderApi::new(&config, token)?;

    let order = api.get(id).await?;
    let updated = api.update_status(&order, status).await?;
    println!("order {} is now {}", updated.id, updated.order_status.label());
    Ok(())
}

/// List user accounts.
#[allow(clippy::print_stdout)]
pub async fn users() -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let page = AdminUserApi::new(&config, token)?
        .list(&ListQuery::default())
        .await?;

    for user in &page.content {
        println!(
            "{:>6}  {:<24} {:<32} {:?}/{:?}",
            user.id,
            user.username,
            user.email.as_str(),
            user.role,
            user.status
        );
    }
    println!("{} accounts total", page.total_elements);
    Ok(())
}

/// Delete a product from the catalog.
#[allow(clippy::print_stdout)]
pub async fn delete_product(id: ProductId) -> Result<(), CliError> {
    let (config, token) = admin_session()?;
    let message = AdminProductApi::new(&config, token)?.delete(id).await?;
    println!("{message}");
    Ok(())
}

fn admin_session() -> Result<(AdminConfig, String), CliError> {
    let (_, session) = load_session()?;
    let (user, token) = require_login(&session)?;
    if !user.is_admin() {
        return Err(CliError::Message(
            "this command needs an admin account".into(),
        ));
    }
    Ok((AdminConfig::from_env()?, token))
}

fn serde_status(status: OrderStatus) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(ToString::to_string))
        .unwrap_or_default()
}
