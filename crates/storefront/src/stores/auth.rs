//! Authentication store: login state, session persistence, profile.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use meridian_core::UserId;

use crate::api::{ProfileUpdate, RegisterRequest, UserApi};
use crate::error::ApiError;
use crate::session::{AuthState, SessionStore};

const FALLBACK_MESSAGE: &str = "Login failed. Please try again.";

/// Outcome of an auth operation, suitable for showing to the user.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

struct AuthInner {
    api: UserApi,
    session: SessionStore,
    tx: watch::Sender<AuthState>,
}

/// Observable authentication store.
///
/// Holds the current [`AuthState`] in a watch channel. The persisted
/// session is restored at construction, so a valid session file means
/// the store starts logged in.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthInner>,
}

impl AuthStore {
    /// Create the store, restoring any persisted session.
    #[must_use]
    pub fn new(api: UserApi, session: SessionStore) -> Self {
        let initial = session.load_auth();
        let (tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(AuthInner { api, session, tx }),
        }
    }

    /// Subscribe to authentication state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.tx.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.inner.tx.borrow().clone()
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.tx.borrow().is_valid()
    }

    /// The active bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.tx.borrow().token.clone()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<meridian_core::User> {
        self.inner.tx.borrow().user.clone()
    }

    /// The logged-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.tx.borrow().user.as_ref().map(|u| u.id)
    }

    /// Log in and persist the session on success.
    ///
    /// Rejected credentials surface the service's message; transport
    /// failures fall back to a generic one.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        match self.inner.api.login(email, password).await {
            Ok(session) => {
                let state = AuthState::logged_in(session.user, session.token);
                if let Err(e) = self.inner.session.save_auth(&state) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
                self.inner.tx.send_replace(state);
                AuthOutcome {
                    success: true,
                    message: session.message,
                }
            }
            Err(ApiError::Rejected(message)) => AuthOutcome {
                success: false,
                message,
            },
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                AuthOutcome {
                    success: false,
                    message: FALLBACK_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Register a new account. Does not log in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        match self.inner.api.register(request).await {
            Ok(message) => AuthOutcome {
                success: true,
                message,
            },
            Err(ApiError::Rejected(message)) => AuthOutcome {
                success: false,
                message,
            },
            Err(e) => {
                tracing::warn!(error = %e, "registration request failed");
                AuthOutcome {
                    success: false,
                    message: "Registration failed. Please try again.".to_string(),
                }
            }
        }
    }

    /// End the session: forget the persisted file, drop transient
    /// scratch, and publish a logged-out state so dependent stores can
    /// clear their snapshots.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.inner.session.clear_all();
        self.inner.tx.send_replace(AuthState::default());
    }

    /// Update the profile; on success the refreshed user replaces the
    /// one in the published state and the persisted session.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> bool {
        let (user_id, token) = match self.credentials() {
            Some(creds) => creds,
            None => return false,
        };
        match self
            .inner
            .api
            .update_profile(user_id, update, Some(&token))
            .await
        {
            Ok(user) => {
                let mut state = self.current();
                state.user = Some(user);
                if let Err(e) = self.inner.session.save_auth(&state) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
                self.inner.tx.send_replace(state);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile update failed");
                false
            }
        }
    }

    /// Change the account password.
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str) -> AuthOutcome {
        let (user_id, token) = match self.credentials() {
            Some(creds) => creds,
            None => {
                return AuthOutcome {
                    success: false,
                    message: "Not logged in".to_string(),
                };
            }
        };
        match self
            .inner
            .api
            .change_password(user_id, current, new, Some(&token))
            .await
        {
            Ok(message) => AuthOutcome {
                success: true,
                message,
            },
            Err(ApiError::Rejected(message)) => AuthOutcome {
                success: false,
                message,
            },
            Err(e) => {
                tracing::warn!(error = %e, "password change failed");
                AuthOutcome {
                    success: false,
                    message: "Password change failed. Please try again.".to_string(),
                }
            }
        }
    }

    fn credentials(&self) -> Option<(UserId, String)> {
        let state = self.inner.tx.borrow();
        match (&state.user, &state.token) {
            (Some(user), Some(token)) => Some((user.id, token.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("is_logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::config::StorefrontConfig;

    fn unreachable_config(name: &str) -> StorefrontConfig {
        let url = "http://127.0.0.1:1".parse().unwrap();
        StorefrontConfig {
            user_service_url: url,
            catalog_service_url: "http://127.0.0.1:1".parse().unwrap(),
            cart_service_url: "http://127.0.0.1:1".parse().unwrap(),
            wishlist_service_url: "http://127.0.0.1:1".parse().unwrap(),
            session_file: std::env::temp_dir()
                .join(format!("meridian-auth-{name}-{}.json", std::process::id())),
            request_timeout: Duration::from_millis(200),
        }
    }

    fn store(config: &StorefrontConfig) -> (AuthStore, SessionStore) {
        let session = SessionStore::new(PathBuf::from(&config.session_file));
        let api = UserApi::new(config).unwrap();
        (AuthStore::new(api, session.clone()), session)
    }

    #[tokio::test]
    async fn unreachable_service_yields_generic_message() {
        let config = unreachable_config("login");
        let (auth, _) = store(&config);

        let outcome = auth.login("jane@example.com", "hunter2").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Login failed. Please try again.");
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn logout_clears_persisted_session_and_publishes() {
        let config = unreachable_config("logout");
        let (_, session) = store(&config);

        let user: meridian_core::User = serde_json::from_str(
            r#"{"id": 5, "username": "jdoe", "email": "jdoe@example.com",
                "firstName": "Jane", "lastName": "Doe"}"#,
        )
        .unwrap();
        session
            .save_auth(&AuthState::logged_in(user, "tok".to_string()))
            .unwrap();

        // A fresh store restores the persisted session.
        let (auth, session) = store(&config);
        assert!(auth.is_logged_in());
        assert_eq!(auth.token().as_deref(), Some("tok"));

        let mut rx = auth.subscribe();
        auth.logout();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_logged_in);
        assert!(!session.load_auth().is_logged_in);
    }
}
