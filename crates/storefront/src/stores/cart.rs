//! Cart store: observable cart snapshot plus derived pricing.
//!
//! The snapshot is always the server's cart; mutations never patch it
//! locally. Derived figures (tax, delivery, total) are computed on
//! demand from the snapshot and the coupon held in the session.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::instrument;

use meridian_core::{Cart, CartItemId, Product, UserId};

use crate::api::{AddToCartRequest, CartApi};
use crate::pricing::{self, CouponOutcome};
use crate::session::{AppliedCoupon, AuthState, SessionStore};

struct CartInner {
    api: CartApi,
    session: SessionStore,
    auth: watch::Receiver<AuthState>,
    tx: watch::Sender<Option<Cart>>,
}

/// Observable cart store. `None` means no cart loaded (guest, logged
/// out, or not yet fetched).
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartInner>,
}

impl CartStore {
    /// Create the store. `auth` is the receiver from the auth store; it
    /// supplies the user id and bearer token for every call.
    #[must_use]
    pub fn new(api: CartApi, session: SessionStore, auth: watch::Receiver<AuthState>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(CartInner {
                api,
                session,
                auth,
                tx,
            }),
        }
    }

    /// Subscribe to cart snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Cart>> {
        self.inner.tx.subscribe()
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn current(&self) -> Option<Cart> {
        self.inner.tx.borrow().clone()
    }

    /// Spawn a task that clears the snapshot and held coupon whenever
    /// the session ends. Requires a running tokio runtime.
    pub fn watch_session(&self) {
        let mut auth = self.inner.auth.clone();
        let store = self.clone();
        tokio::spawn(async move {
            while auth.changed().await.is_ok() {
                if !auth.borrow_and_update().is_valid() {
                    store.inner.session.clear_coupon();
                    store.inner.tx.send_replace(None);
                }
            }
        });
    }

    /// Re-fetch the cart from the service. Returns false when not
    /// logged in or the request fails; the previous snapshot stays.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self.inner.api.fetch(user_id, Some(&token)).await {
            Ok(cart) => {
                self.inner.tx.send_replace(Some(cart));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart refresh failed");
                false
            }
        }
    }

    /// Add a product to the cart.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&self, product: &Product, quantity: u32) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        let request = AddToCartRequest::for_product(product, quantity);
        self.apply(
            self.inner
                .api
                .add_item(user_id, &request, Some(&token))
                .await,
        )
    }

    /// Set a line item's quantity. Zero removes the item.
    #[instrument(skip(self))]
    pub async fn update_item(&self, item_id: CartItemId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        self.apply(
            self.inner
                .api
                .update_item(user_id, item_id, quantity, Some(&token))
                .await,
        )
    }

    /// Remove a line item.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, item_id: CartItemId) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        self.apply(
            self.inner
                .api
                .remove_item(user_id, item_id, Some(&token))
                .await,
        )
    }

    /// Empty the cart and drop any held coupon.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self.inner.api.clear(user_id, Some(&token)).await {
            Ok(()) => {
                self.inner.session.clear_coupon();
                self.inner.tx.send_replace(None);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart clear failed");
                false
            }
        }
    }

    /// Ask the service whether the cart is still valid for checkout.
    #[instrument(skip(self))]
    pub async fn validate_for_checkout(&self) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        self.inner
            .api
            .validate_for_checkout(user_id, Some(&token))
            .await
            .unwrap_or(false)
    }

    /// Sum of line totals, from the snapshot.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.inner
            .tx
            .borrow()
            .as_ref()
            .map_or(Decimal::ZERO, |c| c.total_amount)
    }

    /// Number of items across all lines, from the snapshot.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner.tx.borrow().as_ref().map_or(0, |c| c.total_items)
    }

    /// Tax due on the current subtotal.
    #[must_use]
    pub fn tax_amount(&self) -> Decimal {
        pricing::tax(self.subtotal())
    }

    /// Delivery charge for the current subtotal.
    #[must_use]
    pub fn delivery_charge(&self) -> Decimal {
        pricing::delivery_charge(self.subtotal())
    }

    /// Discount from the coupon held in the session, if any.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.inner
            .session
            .coupon()
            .map_or(Decimal::ZERO, |c| c.discount)
    }

    /// The coupon currently applied, if any.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<AppliedCoupon> {
        self.inner.session.coupon()
    }

    /// Grand total for the current snapshot and coupon.
    #[must_use]
    pub fn total(&self) -> Decimal {
        pricing::order_total(self.subtotal(), self.discount())
    }

    /// Validate a coupon against the current subtotal; on success the
    /// coupon is held in the session for checkout.
    pub fn apply_coupon(&self, code: &str) -> CouponOutcome {
        let outcome = pricing::apply_coupon(code, self.subtotal());
        if outcome.success {
            self.inner.session.set_coupon(AppliedCoupon {
                code: code.trim().to_string(),
                discount: outcome.discount,
            });
        }
        outcome
    }

    /// Drop the held coupon.
    pub fn remove_coupon(&self) {
        self.inner.session.clear_coupon();
    }

    fn apply(&self, result: crate::Result<Cart>) -> bool {
        match result {
            Ok(cart) => {
                self.inner.tx.send_replace(Some(cart));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart mutation failed");
                false
            }
        }
    }

    fn credentials(&self) -> Option<(UserId, String)> {
        let state = self.inner.auth.borrow();
        match (&state.user, &state.token) {
            (Some(user), Some(token)) => Some((user.id, token.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("item_count", &self.item_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_store(name: &str) -> (CartStore, watch::Sender<AuthState>, SessionStore) {
        let config = StorefrontConfig {
            user_service_url: "http://127.0.0.1:1".parse().unwrap(),
            catalog_service_url: "http://127.0.0.1:1".parse().unwrap(),
            cart_service_url: "http://127.0.0.1:1".parse().unwrap(),
            wishlist_service_url: "http://127.0.0.1:1".parse().unwrap(),
            session_file: std::env::temp_dir()
                .join(format!("meridian-cart-{name}-{}.json", std::process::id())),
            request_timeout: Duration::from_millis(200),
        };
        let session = SessionStore::new(config.session_file.clone());
        let user: meridian_core::User = serde_json::from_str(
            r#"{"id": 5, "username": "jdoe", "email": "jdoe@example.com",
                "firstName": "Jane", "lastName": "Doe"}"#,
        )
        .unwrap();
        let (auth_tx, auth_rx) = watch::channel(AuthState::logged_in(user, "tok".into()));
        let api = CartApi::new(&config).unwrap();
        (CartStore::new(api, session.clone(), auth_rx), auth_tx, session)
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot_untouched() {
        let (cart, _auth, _) = test_store("refresh");
        assert!(!cart.refresh().await);
        assert!(cart.current().is_none());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[tokio::test]
    async fn logout_clears_coupon_and_snapshot() {
        let (cart, auth, session) = test_store("logout");
        cart.watch_session();

        session.set_coupon(AppliedCoupon {
            code: "ABOVE400".into(),
            discount: dec!(40),
        });
        auth.send_replace(AuthState::default());

        // Let the watcher task observe the change.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(session.coupon().is_none());
        assert!(cart.current().is_none());
    }

    #[test]
    fn totals_derive_from_empty_snapshot() {
        // Without a snapshot every figure is zero except delivery,
        // which only applies to a real subtotal at checkout.
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let _guard = rt.enter();
        let (cart, _auth, _) = test_store("totals");
        assert_eq!(cart.tax_amount(), Decimal::ZERO);
        assert_eq!(cart.discount(), Decimal::ZERO);
    }
}
