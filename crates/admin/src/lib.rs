//! Meridian Admin - back-office client library.
//!
//! Administrative counterpart to `meridian-storefront`: full catalog
//! CRUD, user management, order status control, and the analytics
//! dashboard. Every call carries the admin's bearer token; the backend
//! enforces the role, this crate only transports it.
//!
//! Listing endpoints share one query builder ([`query::ListQuery`]) and
//! search inputs go through a trailing debouncer ([`search::Debouncer`])
//! so a keystroke burst costs one request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod rest;
pub mod search;

pub use error::{AdminError, Result};
