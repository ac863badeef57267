//! Command implementations, one module per top-level subcommand.

pub mod admin;
pub mod auth;
pub mod orders;
pub mod shop;
pub mod wishlist;

use thiserror::Error;

use meridian_core::User;
use meridian_storefront::config::StorefrontConfig;
use meridian_storefront::session::{AuthState, SessionStore};

/// Errors surfaced to the top of the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] meridian_storefront::config::ConfigError),

    #[error(transparent)]
    AdminConfig(#[from] meridian_admin::config::ConfigError),

    #[error(transparent)]
    Api(#[from] meridian_storefront::ApiError),

    #[error(transparent)]
    Admin(#[from] meridian_admin::AdminError),

    #[error("not logged in; run `meridian auth login` first")]
    NotLoggedIn,

    #[error("{0}")]
    Message(String),
}

/// Storefront config plus the persisted session, shared by most
/// commands.
pub fn load_session() -> Result<(StorefrontConfig, SessionStore), CliError> {
    let config = StorefrontConfig::from_env()?;
    let session = SessionStore::new(config.session_file.clone());
    Ok((config, session))
}

/// The persisted session's user and token, or [`CliError::NotLoggedIn`].
pub fn require_login(session: &SessionStore) -> Result<(User, String), CliError> {
    let state: AuthState = session.load_auth();
    match (state.user, state.token) {
        (Some(user), Some(token)) if state.is_logged_in => Ok((user, token)),
        _ => Err(CliError::NotLoggedIn),
    }
}
