//! Meridian Core - Shared types library.
//!
//! This crate provides common types used across all Meridian components:
//! - `storefront` - Customer-facing client (catalog, cart, wishlist, checkout)
//! - `admin` - Back-office client (products, users, orders, dashboard)
//! - `cli` - Command-line front end for both
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every
//! backend service exchanges these records as JSON; the field names on the
//! wire are camelCase and the enums SCREAMING_SNAKE_CASE, matching the
//! service DTOs.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, money helpers, statuses, pagination
//! - [`model`] - Domain records (user, product, cart, order, wishlist)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod model;
pub mod types;

pub use model::*;
pub use types::*;
