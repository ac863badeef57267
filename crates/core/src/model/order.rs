//! Order records owned by the order service.
//!
//! An order is a snapshot of a cart plus shipping and payment details.
//! Once placed it is immutable apart from status transitions; the client
//! only ever reflects a just-requested transition optimistically.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderNumber, OrderStatus, PaymentStatus, ProductId, UserId};

/// One line in a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
}

/// A structured shipping address.
///
/// Addresses are structured end-to-end; the formatted multi-line string
/// produced by `Display` is presentation-only and never parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    pub country: String,
    pub zipcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.first_name, self.last_name)?;
        writeln!(f, "{}", self.street)?;
        if let Some(apartment) = &self.apartment {
            writeln!(f, "{apartment}")?;
        }
        write!(f, "{}, {} {}", self.city, self.country, self.zipcode)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<OrderNumber>,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
    pub total_amount: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub shipping_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Grand total after tax, shipping, and discount.
    pub final_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether this order may still be cancelled from the client.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.order_status.is_cancellable()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_order(status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "orderNumber": "ORD-0001",
            "userId": 12,
            "items": [],
            "orderStatus": serde_json::to_value(status).unwrap(),
            "shippingAddress": {
                "firstName": "Jane",
                "lastName": "Doe",
                "street": "123 Main St",
                "city": "New York",
                "country": "United States",
                "zipcode": "10001"
            },
            "totalAmount": "100",
            "finalAmount": "105"
        }))
        .unwrap()
    }

    #[test]
    fn cancellable_only_before_processing() {
        assert!(sample_order(OrderStatus::Pending).is_cancellable());
        assert!(sample_order(OrderStatus::Confirmed).is_cancellable());
        assert!(!sample_order(OrderStatus::Shipped).is_cancellable());
        assert!(!sample_order(OrderStatus::Delivered).is_cancellable());
    }

    #[test]
    fn address_formats_multiline() {
        let address = ShippingAddress {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            street: "123 Main St".into(),
            apartment: Some("Apt 4".into()),
            city: "New York".into(),
            country: "United States".into(),
            zipcode: "10001".into(),
            phone: None,
        };
        assert_eq!(
            address.to_string(),
            "Jane Doe\n123 Main St\nApt 4\nNew York, United States 10001"
        );
    }

    #[test]
    fn amounts_parse_as_decimals() {
        let order = sample_order(OrderStatus::Pending);
        assert_eq!(order.total_amount, dec!(100));
        assert_eq!(order.final_amount, dec!(105));
        assert_eq!(order.discount_amount, Decimal::ZERO);
    }
}
