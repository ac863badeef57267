//! Wishlist records owned by the wishlist service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CollectionId, ProductId, UserId, WishlistItemId};

/// A saved product inside a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

/// A named, user-owned grouping of saved items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistCollection {
    pub id: CollectionId,
    pub name: String,
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<WishlistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-user aggregate counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistStats {
    pub user_id: UserId,
    pub total_collections: u32,
    pub total_items: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_deserializes_with_nested_items() {
        let json = r#"{
            "id": 2,
            "name": "Winter",
            "userId": 12,
            "items": [{
                "id": 8,
                "productId": 3,
                "productName": "Wool Scarf",
                "price": "19.99",
                "category": "Accessories",
                "imageUrl": ""
            }]
        }"#;
        let collection: WishlistCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].product_name, "Wool Scarf");
    }
}
