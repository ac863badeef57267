//! Core types for Meridian.

pub mod email;
pub mod id;
pub mod money;
pub mod page;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::round_to_unit;
pub use page::{Page, PageSlice};
pub use status::*;
