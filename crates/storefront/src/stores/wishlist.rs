//! Wishlist store: collections snapshot with mutate-then-refresh.
//!
//! Unlike the cart service, wishlist mutations answer with the affected
//! record only, so every successful mutation is followed by a full
//! collections re-fetch to keep the snapshot authoritative.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::instrument;

use meridian_core::{CollectionId, ProductId, UserId, WishlistCollection, WishlistItemId, WishlistStats};

use crate::api::{AddWishlistItemRequest, WishlistApi};
use crate::session::AuthState;

struct WishlistInner {
    api: WishlistApi,
    auth: watch::Receiver<AuthState>,
    tx: watch::Sender<Vec<WishlistCollection>>,
    /// Product a guest tried to save; replayed after login.
    pending_save: Mutex<Option<AddWishlistItemRequest>>,
}

/// Observable wishlist store.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistInner>,
}

impl WishlistStore {
    /// Create the store.
    #[must_use]
    pub fn new(api: WishlistApi, auth: watch::Receiver<AuthState>) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(WishlistInner {
                api,
                auth,
                tx,
                pending_save: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to collection snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<WishlistCollection>> {
        self.inner.tx.subscribe()
    }

    /// Snapshot of the current collections.
    #[must_use]
    pub fn current(&self) -> Vec<WishlistCollection> {
        self.inner.tx.borrow().clone()
    }

    /// Spawn a task that empties the snapshot when the session ends.
    /// Requires a running tokio runtime.
    pub fn watch_session(&self) {
        let mut auth = self.inner.auth.clone();
        let store = self.clone();
        tokio::spawn(async move {
            while auth.changed().await.is_ok() {
                if !auth.borrow_and_update().is_valid() {
                    store.take_pending_save();
                    store.inner.tx.send_replace(Vec::new());
                }
            }
        });
    }

    /// Re-fetch collections from the service.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self.inner.api.collections(user_id, Some(&token)).await {
            Ok(collections) => {
                self.inner.tx.send_replace(collections);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "wishlist refresh failed");
                false
            }
        }
    }

    /// Create a collection, then refresh.
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self
            .inner
            .api
            .create_collection(name, user_id, Some(&token))
            .await
        {
            Ok(_) => self.refresh().await,
            Err(e) => {
                tracing::warn!(error = %e, "collection create failed");
                false
            }
        }
    }

    /// Delete a collection, then refresh.
    #[instrument(skip(self))]
    pub async fn delete_collection(&self, collection_id: CollectionId) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self
            .inner
            .api
            .delete_collection(collection_id, user_id, Some(&token))
            .await
        {
            Ok(()) => self.refresh().await,
            Err(e) => {
                tracing::warn!(error = %e, "collection delete failed");
                false
            }
        }
    }

    /// Save a product into a collection, then refresh.
    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn add_item(
        &self,
        collection_id: CollectionId,
        request: &AddWishlistItemRequest,
    ) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            // Remember the save so it can be replayed after login.
            self.set_pending_save(request.clone());
            return false;
        };
        match self
            .inner
            .api
            .add_item(collection_id, user_id, request, Some(&token))
            .await
        {
            Ok(_) => self.refresh().await,
            Err(e) => {
                tracing::warn!(error = %e, "wishlist add failed");
                false
            }
        }
    }

    /// Remove a saved item, then refresh.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        collection_id: CollectionId,
        item_id: WishlistItemId,
    ) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        match self
            .inner
            .api
            .remove_item(collection_id, user_id, item_id, Some(&token))
            .await
        {
            Ok(()) => self.refresh().await,
            Err(e) => {
                tracing::warn!(error = %e, "wishlist remove failed");
                false
            }
        }
    }

    /// Whether the product is saved anywhere. False for guests and on
    /// errors.
    #[instrument(skip(self))]
    pub async fn contains_product(&self, product_id: ProductId) -> bool {
        let Some((user_id, token)) = self.credentials() else {
            return false;
        };
        self.inner
            .api
            .contains_product(user_id, product_id, Some(&token))
            .await
            .unwrap_or(false)
    }

    /// Aggregate counts, or `None` when unavailable.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Option<WishlistStats> {
        let (user_id, token) = self.credentials()?;
        match self.inner.api.stats(user_id, Some(&token)).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(error = %e, "wishlist stats failed");
                None
            }
        }
    }

    /// Remember a save attempted while logged out.
    pub fn set_pending_save(&self, request: AddWishlistItemRequest) {
        *self.lock_pending() = Some(request);
    }

    /// Take (and clear) the save remembered from before login.
    #[must_use]
    pub fn take_pending_save(&self) -> Option<AddWishlistItemRequest> {
        self.lock_pending().take()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<AddWishlistItemRequest>> {
        match self.inner.pending_save.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
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

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore").finish_non_exhaustive()
    }
}
