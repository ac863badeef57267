//! Client for the order endpoints of the cart + order service.

use meridian_core::{Order, OrderId, Page, ShippingAddress, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result};
use crate::rest::Rest;

/// Payload for placing an order from the current cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<ShippingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Payment method descriptor (`card`, `upi`, `paypal`, `cod`).
    pub payment_method: String,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub discount_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    order: Option<Order>,
}

impl OrderEnvelope {
    fn into_order(self) -> Result<Order> {
        match (self.success, self.order) {
            (true, Some(order)) => Ok(order),
            _ => Err(ApiError::Rejected(self.message)),
        }
    }
}

/// Client for the order endpoints.
#[derive(Debug, Clone)]
pub struct OrderApi {
    rest: Rest,
}

impl OrderApi {
    /// Create a client from the storefront configuration. Orders live on
    /// the same service as the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            rest: Rest::new(config.cart_service_url.clone(), config.request_timeout)?,
        })
    }

    /// Place an order from the user's current cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the service's message when
    /// the order is refused (empty cart, stock changed, payment issue).
    #[instrument(skip(self, request, token))]
    pub async fn create(
        &self,
        user_id: UserId,
        request: &CreateOrderRequest,
        token: Option<&str>,
    ) -> Result<Order> {
        let envelope: OrderEnvelope = self
            .rest
            .post(&format!("/api/orders/users/{user_id}"), request, token)
            .await?;
        envelope.into_order()
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn user_orders(
        &self,
        user_id: UserId,
        page: u32,
        size: u32,
        token: Option<&str>,
    ) -> Result<Page<Order>> {
        let query = vec![
            ("page".to_string(), page.to_string()),
            ("size".to_string(), size.to_string()),
            ("sortBy".to_string(), "createdAt".to_string()),
            ("sortDirection".to_string(), "desc".to_string()),
        ];
        self.rest
            .get_with(&format!("/api/orders/users/{user_id}"), &query, token)
            .await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the id is unknown.
    #[instrument(skip(self, token))]
    pub async fn get(&self, order_id: OrderId, token: Option<&str>) -> Result<Order> {
        let envelope: OrderEnvelope = self
            .rest
            .get(&format!("/api/orders/{order_id}"), token)
            .await?;
        envelope.into_order()
    }

    /// Cancel an order. Only pending and confirmed orders can be
    /// cancelled; the service enforces the rule and the returned order
    /// carries the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the order is past the
    /// cancellable stage.
    #[instrument(skip(self, token))]
    pub async fn cancel(
        &self,
        user_id: UserId,
        order_id: OrderId,
        token: Option<&str>,
    ) -> Result<Order> {
        let envelope: OrderEnvelope = self
            .rest
            .put(
                &format!("/api/orders/users/{user_id}/orders/{order_id}/cancel"),
                &serde_json::json!({}),
                token,
            )
            .await?;
        envelope.into_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            street: "123 Main St".to_string(),
            apartment: None,
            city: "New York".to_string(),
            country: "United States".to_string(),
            zipcode: "10001".to_string(),
            phone: None,
        }
    }

    #[test]
    fn create_request_serializes_camel_case() {
        let request = CreateOrderRequest {
            shipping_address: address(),
            billing_address: None,
            phone_number: None,
            email: Some("jdoe@example.com".to_string()),
            notes: None,
            payment_method: "card".to_string(),
            tax_amount: dec!(25),
            shipping_amount: dec!(0),
            discount_amount: dec!(40),
            coupon_code: Some("ABOVE400".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["paymentMethod"], "card");
        assert_eq!(value["couponCode"], "ABOVE400");
        assert_eq!(value["shippingAddress"]["firstName"], "Jane");
        assert!(value.get("billingAddress").is_none());
    }

    #[test]
    fn envelope_failure_is_rejected() {
        let envelope: OrderEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "Cart is empty"}"#).unwrap();
        assert!(matches!(
            envelope.into_order(),
            Err(ApiError::Rejected(message)) if message == "Cart is empty"
        ));
    }
}
