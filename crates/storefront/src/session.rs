//! Durable and transient session state.
//!
//! The auth session (user + bearer token) is persisted to a JSON file so
//! it survives restarts. Everything else is transient scratch held in
//! memory: the applied coupon and the post-login redirect target. A
//! corrupt or partial session file is treated as absent.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use meridian_core::User;

/// Authentication state as persisted and as published by the auth store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthState {
    /// State for an authenticated session.
    #[must_use]
    pub fn logged_in(user: User, token: String) -> Self {
        Self {
            is_logged_in: true,
            user: Some(user),
            token: Some(token),
        }
    }

    /// True only when the flag, the user, and the token all agree.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_logged_in && self.user.is_some() && self.token.is_some()
    }
}

/// A coupon that passed validation and is held for checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: Decimal,
}

#[derive(Debug, Default)]
struct Scratch {
    coupon: Option<AppliedCoupon>,
    redirect_target: Option<String>,
}

struct SessionInner {
    path: PathBuf,
    scratch: Mutex<Scratch>,
}

/// File-backed session store, cheap to clone and share.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Create a store persisting the auth session at `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                path,
                scratch: Mutex::new(Scratch::default()),
            }),
        }
    }

    /// Load the persisted auth state. Missing, corrupt, or partial files
    /// all yield a logged-out state.
    #[must_use]
    pub fn load_auth(&self) -> AuthState {
        let Ok(raw) = std::fs::read_to_string(&self.inner.path) else {
            return AuthState::default();
        };
        match serde_json::from_str::<AuthState>(&raw) {
            Ok(state) if state.is_valid() => state,
            Ok(_) => AuthState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session file");
                AuthState::default()
            }
        }
    }

    /// Persist the auth state, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub fn save_auth(&self, state: &AuthState) -> std::io::Result<()> {
        if let Some(parent) = self.inner.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.inner.path, json)
    }

    /// Delete the persisted auth state. A missing file is not an error.
    pub fn clear_auth(&self) {
        if let Err(e) = std::fs::remove_file(&self.inner.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(error = %e, "failed to remove session file");
        }
    }

    /// The coupon currently held for checkout, if any.
    #[must_use]
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.lock_scratch().coupon.clone()
    }

    /// Hold a validated coupon for checkout.
    pub fn set_coupon(&self, coupon: AppliedCoupon) {
        self.lock_scratch().coupon = Some(coupon);
    }

    /// Drop the held coupon.
    pub fn clear_coupon(&self) {
        self.lock_scratch().coupon = None;
    }

    /// Remember where to navigate after a successful login.
    pub fn set_redirect_target(&self, target: impl Into<String>) {
        self.lock_scratch().redirect_target = Some(target.into());
    }

    /// Take (and clear) the post-login redirect target.
    #[must_use]
    pub fn take_redirect_target(&self) -> Option<String> {
        self.lock_scratch().redirect_target.take()
    }

    /// Drop all transient state; the persisted auth file is untouched.
    pub fn clear_transient(&self) {
        let mut scratch = self.lock_scratch();
        scratch.coupon = None;
        scratch.redirect_target = None;
    }

    /// Drop everything: transient state and the persisted auth file.
    pub fn clear_all(&self) {
        self.clear_transient();
        self.clear_auth();
    }

    fn lock_scratch(&self) -> std::sync::MutexGuard<'_, Scratch> {
        match self.inner.scratch.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("meridian-session-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn missing_file_loads_logged_out() {
        let store = SessionStore::new(temp_path("missing"));
        let state = store.load_auth();
        assert!(!state.is_logged_in);
        assert!(state.user.is_none());
    }

    #[test]
    fn corrupt_file_loads_logged_out() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json at all").unwrap();
        let store = SessionStore::new(path.clone());
        assert!(!store.load_auth().is_logged_in);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn partial_state_is_discarded() {
        let path = temp_path("partial");
        // Flag set but no token: must not count as a session.
        std::fs::write(&path, r#"{"isLoggedIn": true}"#).unwrap();
        let store = SessionStore::new(path.clone());
        assert!(!store.load_auth().is_logged_in);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let store = SessionStore::new(path.clone());
        let user: User = serde_json::from_str(
            r#"{"id": 5, "username": "jdoe", "email": "jdoe@example.com",
                "firstName": "Jane", "lastName": "Doe"}"#,
        )
        .unwrap();
        store
            .save_auth(&AuthState::logged_in(user, "tok".to_string()))
            .unwrap();
        let state = store.load_auth();
        assert!(state.is_logged_in);
        assert_eq!(state.token.as_deref(), Some("tok"));
        store.clear_auth();
        assert!(!store.load_auth().is_logged_in);
    }

    #[test]
    fn clear_transient_drops_coupon_and_redirect() {
        let store = SessionStore::new(temp_path("transient"));
        store.set_coupon(AppliedCoupon {
            code: "ABOVE400".to_string(),
            discount: dec!(40),
        });
        store.set_redirect_target("/checkout");
        store.clear_transient();
        assert!(store.coupon().is_none());
        assert!(store.take_redirect_target().is_none());
    }
}
