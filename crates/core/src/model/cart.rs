//! Cart snapshot owned by the cart service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartItemId, ProductId, UserId};

/// One line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Line total as computed by the service (`unit_price * quantity`).
    pub total_price: Decimal,
    #[serde(default)]
    pub product_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The per-user cart.
///
/// Server-owned; the client replaces its cached snapshot wholesale with
/// the service's response after every successful mutation and discards
/// it on logout. Line items are never merged locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    pub total_amount: Decimal,
    pub total_items: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn deserializes_service_dto() {
        let json = r#"{
            "id": 5,
            "userId": 12,
            "cartItems": [{
                "id": 9,
                "productId": 3,
                "productName": "Cotton T-Shirt",
                "unitPrice": "25.00",
                "quantity": 2,
                "totalPrice": "50.00",
                "productImageUrl": ""
            }],
            "totalAmount": "50.00",
            "totalItems": 2
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(!cart.is_empty());
        assert_eq!(cart.total_amount, dec!(50.00));
        assert_eq!(cart.cart_items[0].quantity, 2);
    }
}
