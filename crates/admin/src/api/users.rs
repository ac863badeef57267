//! User management: listing, role and status changes.

use meridian_core::{Page, User, UserId, UserRole, UserStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::query::ListQuery;
use crate::rest::AdminRest;

/// Account fields an admin may edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    success: bool,
}

/// Admin client for the user service.
#[derive(Debug, Clone)]
pub struct AdminUserApi {
    rest: AdminRest,
}

impl AdminUserApi {
    /// Create a client bound to the admin's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig, token: String) -> Result<Self> {
        Ok(Self {
            rest: AdminRest::new(
                config.user_service_url.clone(),
                token,
                config.request_timeout,
            )?,
        })
    }

    /// List accounts, newest first by default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<User>> {
        self.rest.get_with("/api/users", &query.to_query()).await
    }

    /// Fetch one account.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] when the id is unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.rest.get(&format!("/api/users/{id}")).await
    }

    /// Edit an account; only the fields set in `update` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: UserId, update: &AdminUserUpdate) -> Result<User> {
        self.rest.put(&format!("/api/users/{id}"), update).await
    }

    /// Block, unblock, or deactivate an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: UserId, status: UserStatus) -> Result<User> {
        let body = serde_json::json!({ "status": status });
        self.rest
            .put(&format!("/api/users/{id}/status"), &body)
            .await
    }

    /// Grant or revoke the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn update_role(&self, id: UserId, role: UserRole) -> Result<User> {
        let body = serde_json::json!({ "role": role });
        self.rest.put(&format!("/api/users/{id}/role"), &body).await
    }

    /// Delete an account; returns the service's message.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Rejected`] when the service reports failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<String> {
        let response: MessageResponse = self.rest.delete(&format!("/api/users/{id}")).await?;
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

    #[test]
    fn status_body_uses_wire_format() {
        let body = serde_json::json!({ "status": UserStatus::Blocked });
        assert_eq!(body["status"], "BLOCKED");
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = AdminUserUpdate {
            status: Some(UserStatus::Blocked),
            ..AdminUserUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["status"], "BLOCKED");
        assert!(value.get("firstName").is_none());
        assert!(value.get("role").is_none());
    }

    #[test]
    fn role_body_uses_wire_format() {
        let body = serde_json::json!({ "role": UserRole::Admin });
        assert_eq!(body["role"], "ADMIN");
    }
}
