//! Domain records exchanged with the backend services.
//!
//! These are plain data carriers: the services own every invariant, the
//! client holds read-mostly cached copies. Field names serialize in
//! camelCase to match the service DTOs.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderItem, ShippingAddress};
pub use product::Product;
pub use user::User;
pub use wishlist::{WishlistCollection, WishlistItem, WishlistStats};
