//! Pagination envelopes used by the backend services.
//!
//! Two shapes exist in the fleet: the user and order services return a
//! Spring-style [`Page`], the catalog service a flatter [`PageSlice`].
//! Both are generic over the element type and deserialize with camelCase
//! field names.

use serde::{Deserialize, Serialize};

/// Spring-style page envelope (user service, order service).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

/// Catalog-service page envelope.
///
/// Pages are 1-based in this shape; the catalog service accepts 0-based
/// page parameters but reports 1-based ones back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}
