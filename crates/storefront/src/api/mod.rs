//! Typed clients for the backend services.
//!
//! One client per service, each a cheap `Clone` over a shared inner
//! `reqwest::Client`. Mutating endpoints return the server's
//! authoritative record; the stores use it to replace their cached
//! snapshots wholesale.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod users;
pub mod wishlist;

pub use cart::{AddToCartRequest, CartApi};
pub use catalog::{CatalogApi, ProductFilters};
pub use orders::{CreateOrderRequest, OrderApi};
pub use users::{AuthSession, ProfileUpdate, RegisterRequest, UserApi};
pub use wishlist::{AddWishlistItemRequest, WishlistApi};
