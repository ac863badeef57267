//! Typed admin clients, one per backend service.

pub mod analytics;
pub mod orders;
pub mod products;
pub mod users;

pub use analytics::{AnalyticsApi, DashboardStats, SalesReport, ServiceHealth};
pub use orders::AdminOrderApi;
pub use products::{AdminProductApi, ProductPayload, ProductStats};
pub use users::{AdminUserApi, AdminUserUpdate};
