//! Client for the product catalog service.
//!
//! Catalog reads are public and heavily repeated, so responses are held
//! in an in-process cache with a short TTL. Filtered listings bypass the
//! cache; only unfiltered pages, single products, and the category list
//! are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::instrument;

use meridian_core::{PageSlice, Product, ProductId};

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::rest::Rest;

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1_000;

#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Page(Box<PageSlice<Product>>),
    Categories(Arc<Vec<String>>),
}

/// Structured catalog filters. All fields optional; an empty filter set
/// means "list everything".
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilters {
    /// True when no filter is set (after trimming whitespace-only text).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !text_set(self.category.as_deref())
            && !text_set(self.search.as_deref())
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(category) = self.category.as_deref().map(str::trim)
            && !category.is_empty()
        {
            query.push(("category".to_string(), category.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(min) = self.min_price {
            query.push(("minPrice".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("maxPrice".to_string(), max.to_string()));
        }
        query
    }
}

fn text_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Client for the product catalog service.
#[derive(Clone)]
pub struct CatalogApi {
    rest: Rest,
    cache: Cache<String, CacheValue>,
}

impl CatalogApi {
    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            rest: Rest::new(config.catalog_service_url.clone(), config.request_timeout)?,
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        })
    }

    /// List products. `page` is 1-based; the service counts from 0 and
    /// the conversion happens here.
    ///
    /// Unfiltered pages are cached; any active filter goes straight to
    /// the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(
        &self,
        page: u32,
        page_size: u32,
        filters: &ProductFilters,
    ) -> Result<PageSlice<Product>> {
        let zero_based = page.saturating_sub(1);
        let mut query = vec![
            ("page".to_string(), zero_based.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
        ];
        query.extend(filters.to_query());

        if !filters.is_empty() {
            return self
                .rest
                .get_with("/api/products", &query, None)
                .await;
        }

        let key = format!("products:page:{page}:{page_size}");
        if let Some(CacheValue::Page(slice)) = self.cache.get(&key).await {
            return Ok(*slice);
        }

        let slice: PageSlice<Product> = self
            .rest
            .get_with("/api/products", &query, None)
            .await?;
        self.cache
            .insert(key, CacheValue::Page(Box::new(slice.clone())))
            .await;
        Ok(slice)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::NotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        let key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            return Ok(*product);
        }

        let product: Product = self.rest.get(&format!("/api/products/{id}"), None).await?;
        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Fetch the distinct category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<Vec<String>>> {
        let key = "categories".to_string();
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&key).await {
            return Ok(categories);
        }

        let categories: Vec<String> = self.rest.get("/api/products/categories", None).await?;
        let categories = Arc::new(categories);
        self.cache
            .insert(key, CacheValue::Categories(Arc::clone(&categories)))
            .await;
        Ok(categories)
    }

    /// Fetch up to `limit` featured products (first page of the catalog).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured(&self, limit: u32) -> Result<Vec<Product>> {
        let slice = self.list(1, limit, &ProductFilters::default()).await?;
        Ok(slice.data)
    }

    /// Drop a single product from the cache, along with every cached
    /// listing page that might contain it.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.cache.invalidate(&format!("product:{id}")).await;
        self.cache.invalidate_all();
    }

    /// Drop everything from the cache.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for CatalogApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApi")
            .field("rest", &self.rest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_filters_produce_no_query() {
        let filters = ProductFilters::default();
        assert!(filters.is_empty());
        assert!(filters.to_query().is_empty());
    }

    #[test]
    fn whitespace_search_counts_as_empty() {
        let filters = ProductFilters {
            search: Some("   ".to_string()),
            ..ProductFilters::default()
        };
        assert!(filters.is_empty());
        assert!(filters.to_query().is_empty());
    }

    #[test]
    fn filters_render_trimmed_query_pairs() {
        let filters = ProductFilters {
            category: Some(" electronics ".to_string()),
            search: Some("watch".to_string()),
            min_price: Some(dec!(10)),
            max_price: Some(dec!(99.99)),
        };
        assert!(!filters.is_empty());
        assert_eq!(
            filters.to_query(),
            vec![
                ("category".to_string(), "electronics".to_string()),
                ("search".to_string(), "watch".to_string()),
                ("minPrice".to_string(), "10".to_string()),
                ("maxPrice".to_string(), "99.99".to_string()),
            ]
        );
    }
}
