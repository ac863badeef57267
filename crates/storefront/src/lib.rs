//! Meridian Storefront - customer-facing client library.
//!
//! Talks to the platform's backend services (user/auth, catalog,
//! cart+orders, wishlist) over plain REST/JSON and exposes the
//! customer-side state as observable stores.
//!
//! # Architecture
//!
//! - One typed client per backend service ([`api`]), each wrapping a
//!   shared `reqwest::Client`. Catalog reads are cached (`moka`, 5-minute
//!   TTL); everything mutable goes straight to the service.
//! - Process-wide reactive stores ([`stores`]) publish domain snapshots
//!   over `tokio::sync::watch`. Mutations are replace-on-success: the
//!   cached snapshot is swapped for the service's authoritative response,
//!   never merged, and left untouched on failure.
//! - Pure business rules ([`pricing`], [`checkout`], [`tracking`]) operate
//!   on those snapshots without I/O.
//! - The auth session persists to a JSON file ([`session`]); the bearer
//!   token is an opaque string issued by the user service.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_storefront::{config::StorefrontConfig, api, stores, session::SessionStore};
//!
//! let config = StorefrontConfig::from_env()?;
//! let session = SessionStore::new(config.session_file.clone());
//! let users = api::UserApi::new(&config)?;
//! let auth = stores::AuthStore::new(users, session.clone());
//!
//! let outcome = auth.login("jane@example.com", "hunter2").await;
//! if outcome.success {
//!     let cart = stores::CartStore::new(api::CartApi::new(&config)?, session, auth.subscribe());
//!     cart.refresh().await;
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pricing;
pub mod rest;
pub mod session;
pub mod stores;
pub mod tracking;

pub use error::{ApiError, Result};
