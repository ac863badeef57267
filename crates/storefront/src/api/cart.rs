//! Client for the cart service.
//!
//! Every cart endpoint answers with the same envelope carrying the full
//! updated cart. The client unwraps the envelope so callers always get
//! the authoritative cart snapshot back.

use meridian_core::{Cart, CartItemId, Product, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result};
use crate::rest::Rest;

/// Payload for adding a product to the cart. The product snapshot
/// fields let the service denormalize without a catalog round-trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
}

impl AddToCartRequest {
    /// Build a request from a catalog product.
    #[must_use]
    pub fn for_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            quantity,
            product_name: Some(product.name.clone()),
            unit_price: Some(product.price),
            product_image_url: Some(product.image_url.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    cart: Option<Cart>,
    #[serde(default)]
    items_count: Option<u32>,
    #[serde(default)]
    is_valid: Option<bool>,
}

impl CartEnvelope {
    fn into_cart(self) -> Result<Cart> {
        match (self.success, self.cart) {
            (true, Some(cart)) => Ok(cart),
            _ => Err(ApiError::Rejected(self.message)),
        }
    }
}

/// Client for the cart service.
#[derive(Debug, Clone)]
pub struct CartApi {
    rest: Rest,
}

impl CartApi {
    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            rest: Rest::new(config.cart_service_url.clone(), config.request_timeout)?,
        })
    }

    /// Fetch the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope reports
    /// failure.
    #[instrument(skip(self, token))]
    pub async fn fetch(&self, user_id: UserId, token: Option<&str>) -> Result<Cart> {
        let envelope: CartEnvelope = self.rest.get(&format!("/api/cart/{user_id}"), token).await?;
        envelope.into_cart()
    }

    /// Add a product; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the service refuses the item
    /// (e.g. insufficient stock).
    #[instrument(skip(self, request, token), fields(product_id = %request.product_id))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        request: &AddToCartRequest,
        token: Option<&str>,
    ) -> Result<Cart> {
        let envelope: CartEnvelope = self
            .rest
            .post(&format!("/api/cart/{user_id}/items"), request, token)
            .await?;
        envelope.into_cart()
    }

    /// Set a line item's quantity; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn update_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: u32,
        token: Option<&str>,
    ) -> Result<Cart> {
        let body = serde_json::json!({ "quantity": quantity });
        let envelope: CartEnvelope = self
            .rest
            .put(&format!("/api/cart/{user_id}/items/{item_id}"), &body, token)
            .await?;
        envelope.into_cart()
    }

    /// Remove a line item; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        token: Option<&str>,
    ) -> Result<Cart> {
        let envelope: CartEnvelope = self
            .rest
            .delete(&format!("/api/cart/{user_id}/items/{item_id}"), token)
            .await?;
        envelope.into_cart()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, token))]
    pub async fn clear(&self, user_id: UserId, token: Option<&str>) -> Result<()> {
        let envelope: CartEnvelope =
            self.rest.delete(&format!("/api/cart/{user_id}"), token).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(envelope.message))
        }
    }

    /// Number of items in the cart, without fetching the cart body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn count(&self, user_id: UserId, token: Option<&str>) -> Result<u32> {
        let envelope: CartEnvelope = self
            .rest
            .get(&format!("/api/cart/{user_id}/count"), token)
            .await?;
        Ok(envelope.items_count.unwrap_or(0))
    }

    /// Ask the service whether the cart can proceed to checkout
    /// (stock and price still valid).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn validate_for_checkout(&self, user_id: UserId, token: Option<&str>) -> Result<bool> {
        let envelope: CartEnvelope = self
            .rest
            .get(&format!("/api/cart/{user_id}/validate"), token)
            .await?;
        Ok(envelope.is_valid.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_cart_on_success() {
        let json = r#"{
            "success": true,
            "message": "Item added",
            "cart": {
                "id": 3,
                "userId": 12,
                "cartItems": [],
                "totalAmount": "0",
                "totalItems": 0
            }
        }"#;
        let envelope: CartEnvelope = serde_json::from_str(json).unwrap();
        let cart = envelope.into_cart().unwrap();
        assert_eq!(cart.user_id.as_i64(), 12);
    }

    #[test]
    fn envelope_failure_carries_message() {
        let envelope: CartEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "Insufficient stock"}"#).unwrap();
        match envelope.into_cart() {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Insufficient stock"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn count_envelope_parses() {
        let envelope: CartEnvelope =
            serde_json::from_str(r#"{"success": true, "message": "", "itemsCount": 4}"#).unwrap();
        assert_eq!(envelope.items_count, Some(4));
    }
}
