//! Client for the wishlist service.
//!
//! Wishlists are organized into named collections per user; items carry
//! a product snapshot taken at save time.

use meridian_core::{
    CollectionId, ProductId, UserId, WishlistCollection, WishlistItem, WishlistItemId,
    WishlistStats,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::rest::Rest;

/// Payload for saving a product into a collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItemRequest {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default)]
    exists: bool,
}

/// Client for the wishlist service.
#[derive(Debug, Clone)]
pub struct WishlistApi {
    rest: Rest,
}

impl WishlistApi {
    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            rest: Rest::new(config.wishlist_service_url.clone(), config.request_timeout)?,
        })
    }

    /// Fetch the user's collections with their items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn collections(
        &self,
        user_id: UserId,
        token: Option<&str>,
    ) -> Result<Vec<WishlistCollection>> {
        self.rest
            .get(&format!("/api/wishlist/user/{user_id}/collections"), token)
            .await
    }

    /// Create a new named collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn create_collection(
        &self,
        name: &str,
        user_id: UserId,
        token: Option<&str>,
    ) -> Result<WishlistCollection> {
        let body = serde_json::json!({ "name": name, "userId": user_id });
        self.rest
            .post("/api/wishlist/collections", &body, token)
            .await
    }

    /// Delete a collection and everything in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_collection(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        token: Option<&str>,
    ) -> Result<()> {
        self.rest
            .delete_no_content(
                &format!("/api/wishlist/collections/{collection_id}/user/{user_id}"),
                token,
            )
            .await
    }

    /// Save a product into a collection; returns the created item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request, token), fields(product_id = %request.product_id))]
    pub async fn add_item(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        request: &AddWishlistItemRequest,
        token: Option<&str>,
    ) -> Result<WishlistItem> {
        self.rest
            .post(
                &format!("/api/wishlist/collections/{collection_id}/user/{user_id}/items"),
                request,
                token,
            )
            .await
    }

    /// Remove a saved item from a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn remove_item(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        item_id: WishlistItemId,
        token: Option<&str>,
    ) -> Result<()> {
        self.rest
            .delete_no_content(
                &format!(
                    "/api/wishlist/collections/{collection_id}/user/{user_id}/items/{item_id}"
                ),
                token,
            )
            .await
    }

    /// Whether the product is saved in any of the user's collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn contains_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
        token: Option<&str>,
    ) -> Result<bool> {
        let response: ExistsResponse = self
            .rest
            .get(
                &format!("/api/wishlist/user/{user_id}/product/{product_id}/exists"),
                token,
            )
            .await?;
        Ok(response.exists)
    }

    /// Aggregate counts across the user's collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn stats(&self, user_id: UserId, token: Option<&str>) -> Result<WishlistStats> {
        self.rest
            .get(&format!("/api/wishlist/user/{user_id}/stats"), token)
            .await
    }

    /// Every saved item across all of the user's collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn all_items(&self, user_id: UserId, token: Option<&str>) -> Result<Vec<WishlistItem>> {
        self.rest
            .get(&format!("/api/wishlist/user/{user_id}/items"), token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn add_item_request_serializes_camel_case() {
        let request = AddWishlistItemRequest {
            product_id: ProductId::new(7),
            product_name: "Smart Fitness Watch".to_string(),
            price: dec!(199.99),
            category: Some("electronics".to_string()),
            image_url: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["productId"], 7);
        assert_eq!(value["productName"], "Smart Fitness Watch");
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn exists_response_defaults_false() {
        let response: ExistsResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.exists);
    }
}
