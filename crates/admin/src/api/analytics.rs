//! Analytics dashboard client.
//!
//! The analytics service is the least available of the fleet, so the
//! dashboard degrades instead of erroring: when the service cannot be
//! reached the client serves a bundled sample dataset and the health
//! probe reports `DOWN` with the cause.

use meridian_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AdminConfig;
use crate::error::Result;
use crate::rest::AdminRest;

/// One product in the revenue ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub revenue: Decimal,
    pub units_sold: u32,
}

/// Revenue and order count for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
    pub orders: u32,
}

/// Order count and share for one status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub status: String,
    pub count: u32,
    pub percentage: f64,
}

/// The full dashboard dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: u32,
    pub average_order_value: Decimal,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub revenue_by_month: Vec<MonthlyRevenue>,
    #[serde(default)]
    pub orders_by_status: Vec<StatusBreakdown>,
}

/// Revenue totals for the sales report page. A slimmer cut of the
/// dashboard without the product ranking or status breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_revenue: Decimal,
    pub total_orders: u32,
    pub average_order_value: Decimal,
    #[serde(default)]
    pub revenue_by_month: Vec<MonthlyRevenue>,
}

/// Health probe result for the analytics service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Admin client for the analytics service.
#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    rest: AdminRest,
}

impl AnalyticsApi {
    /// Create a client bound to the admin's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, token: String) -> Result<Self> {
        Ok(Self {
            rest: AdminRest::new(
                config.analytics_service_url.clone(),
                token,
                config.request_timeout,
            )?,
        })
    }

    /// Fetch the dashboard dataset, falling back to the bundled sample
    /// when the service is unreachable or answers badly.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> DashboardStats {
        match self.rest.get("/api/analytics/dashboard").await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "analytics unavailable, serving sample data");
                sample_stats()
            }
        }
    }

    /// Fetch the sales report, degrading to the sample figures the same
    /// way the dashboard does.
    #[instrument(skip(self))]
    pub async fn sales_report(&self) -> SalesReport {
        match self.rest.get("/api/analytics/sales-report").await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "analytics unavailable, serving sample report");
                let stats = sample_stats();
                SalesReport {
                    total_revenue: stats.total_revenue,
                    total_orders: stats.total_orders,
                    average_order_value: stats.average_order_value,
                    revenue_by_month: stats.revenue_by_month,
                }
            }
        }
    }

    /// Probe the analytics service. Never errors; an unreachable
    /// service reports `DOWN` with the cause.
    #[instrument(skip(self))]
    pub async fn health(&self) -> ServiceHealth {
        match self.rest.get::<ServiceHealth>("/actuator/health").await {
            Ok(health) => health,
            Err(e) => ServiceHealth {
                status: "DOWN".to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Bundled sample dataset shown while the analytics service is down.
#[must_use]
pub fn sample_stats() -> DashboardStats {
    let top = [
        (1, "Wireless Bluetooth Headphones", 449_985, 15),
        (2, "Smart Fitness Watch", 399_980, 20),
        (3, "Organic Cotton T-Shirt", 299_900, 100),
        (4, "Premium Coffee Beans", 224_910, 90),
        (5, "Eco-Friendly Water Bottle", 104_975, 30),
    ];
    let months = [
        ("Jan", 245_000, 8),
        ("Feb", 289_050, 12),
        ("Mar", 195_075, 6),
        ("Apr", 320_025, 10),
        ("May", 275_000, 9),
        ("Jun", 185_042, 5),
        ("Jul", 395_080, 15),
        ("Aug", 480_520, 18),
    ];
    let statuses = [
        ("delivered", 28, 59.6),
        ("shipped", 12, 25.5),
        ("processing", 5, 10.6),
        ("pending", 2, 4.3),
    ];

    DashboardStats {
        total_revenue: Decimal::new(1_584_792, 2),
        total_orders: 47,
        average_order_value: Decimal::new(33_718, 2),
        top_products: top
            .into_iter()
            .map(|(id, name, cents, units)| TopProduct {
                product_id: ProductId::new(id),
                product_name: name.to_string(),
                revenue: Decimal::new(cents, 2),
                units_sold: units,
            })
            .collect(),
        revenue_by_month: months
            .into_iter()
            .map(|(month, cents, orders)| MonthlyRevenue {
                month: month.to_string(),
                revenue: Decimal::new(cents, 2),
                orders,
            })
            .collect(),
        orders_by_status: statuses
            .into_iter()
            .map(|(status, count, percentage)| StatusBreakdown {
                status: status.to_string(),
                count,
                percentage,
            })
            .collect(),
    }
}
