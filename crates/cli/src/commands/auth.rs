//! Session commands: login, logout, whoami.

use meridian_storefront::api::UserApi;
use meridian_storefront::stores::AuthStore;

use super::{CliError, load_session, require_login};

/// Log in and persist the session file.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let (config, session) = load_session()?;
    let auth = AuthStore::new(UserApi::new(&config)?, session);

    let outcome = auth.login(email, password).await;
    if outcome.success {
        println!("{}", outcome.message);
        Ok(())
    } else {
        Err(CliError::Message(outcome.message))
    }
}

/// Forget the persisted session.
#[allow(clippy::print_stdout)]
pub fn logout() -> Result<(), CliError> {
    let (_, session) = load_session()?;
    session.clear_all();
    println!("Logged out");
    Ok(())
}

/// Show the logged-in account.
#[allow(clippy::print_stdout)]
pub fn whoami() -> Result<(), CliError> {
    let (_, session) = load_session()?;
    let (user, _) = require_login(&session)?;

    println!("{} <{}>", user.full_name(), user.email);
    if user.is_admin() {
        println!("role: admin");
    }
    Ok(())
}
