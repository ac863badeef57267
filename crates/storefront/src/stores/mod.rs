//! Observable client-side stores.
//!
//! Each store owns one `tokio::sync::watch` channel carrying its current
//! snapshot. Mutations call the backend and, on success, replace the
//! snapshot wholesale with the server's authoritative state; consumers
//! subscribe to the receiver and react to every change. Failures keep
//! the previous snapshot and surface as a `false` return or an outcome
//! message, never as a panic.

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::{AuthOutcome, AuthStore};
pub use cart::CartStore;
pub use wishlist::WishlistStore;
