//! Catalog management: full product CRUD.

use meridian_core::{PageSlice, Product, ProductId, ProductStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::query::ListQuery;
use crate::rest::AdminRest;

/// Product fields for create and update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock: u32,
    pub status: ProductStatus,
}

/// Catalog counts shown at the top of the product list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub out_of_stock: u64,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    success: bool,
}

/// Admin client for the catalog service.
#[derive(Debug, Clone)]
pub struct AdminProductApi {
    rest: AdminRest,
}

impl AdminProductApi {
    /// Create a client bound to the admin's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, token: String) -> Result<Self> {
        Ok(Self {
            rest: AdminRest::new(
                config.catalog_service_url.clone(),
                token,
                config.request_timeout,
            )?,
        })
    }

    /// List products. The catalog's page parameter is zero-based and its
    /// size key is `pageSize`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &ListQuery) -> Result<PageSlice<Product>> {
        self.rest
            .get_with("/api/products", &query.to_query_with_size_key("pageSize"))
            .await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.rest.get(&format!("/api/products/{id}")).await
    }

    /// Create a product; returns the stored record with its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create(&self, payload: &ProductPayload) -> Result<Product> {
        self.rest.post("/api/products", payload).await
    }

    /// Replace a product's fields; returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: ProductId, payload: &ProductPayload) -> Result<Product> {
        self.rest.put(&format!("/api/products/{id}"), payload).await
    }

    /// Distinct category names, for the filter dropdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.rest.get("/api/products/categories").await
    }

    /// Catalog-wide counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<ProductStats> {
        self.rest.get("/api/products/stats").await
    }

    /// Delete a product; returns the service's message.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Rejected`] when the service reports failure
    /// (e.g. the product is referenced by open orders).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<String> {
        let response: DeleteResponse = self.rest.delete(&format!("/api/products/{id}")).await?;
        if response.success {
            Ok(response.message)
        } else {
            Err(AdminError::Rejected(response.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payload_serializes_camel_case() {
        let payload = ProductPayload {
            name: "Smart Fitness Watch".into(),
            description: "Tracks everything".into(),
            price: dec!(199.99),
            category: "electronics".into(),
            image_url: None,
            stock: 20,
            status: ProductStatus::Active,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["name"], "Smart Fitness Watch");
        assert_eq!(value["status"], "ACTIVE");
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn delete_response_parses() {
        let response: DeleteResponse =
            serde_json::from_str(r#"{"message": "Product deleted", "success": true}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Product deleted");
    }
}
