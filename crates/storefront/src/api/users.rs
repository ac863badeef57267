//! Client for the user/auth service.
//!
//! Session tokens are issued and verified by the service; the client
//! stores the returned bearer string and never inspects it.

use meridian_core::{Email, User, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result};
use crate::rest::Rest;

/// An authenticated session as returned by the login endpoint.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    /// Opaque bearer token; attached as `Authorization: Bearer …`.
    pub token: String,
    pub message: String,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    user: Option<User>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    user: Option<User>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Client for the user/auth service.
#[derive(Debug, Clone)]
pub struct UserApi {
    rest: Rest,
}

impl UserApi {
    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            rest: Rest::new(config.user_service_url.clone(), config.request_timeout)?,
        })
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the service's message when the
    /// credentials are refused, or a transport error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self.rest.post("/api/users/login", &body, None).await?;

        match (response.success, response.user, response.token) {
            (true, Some(user), Some(token)) => Ok(AuthSession {
                user,
                token,
                message: response.message,
            }),
            _ => Err(ApiError::Rejected(response.message)),
        }
    }

    /// Register a new account. Returns the service's message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the service refuses the
    /// registration (e.g. duplicate email).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        let response: UserEnvelope = self.rest.post("/api/users/register", request, None).await?;
        if response.success {
            Ok(response.message)
        } else {
            Err(ApiError::Rejected(response.message))
        }
    }

    /// Update the caller's profile; returns the refreshed user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, update, token))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
        token: Option<&str>,
    ) -> Result<User> {
        let response: UserEnvelope = self
            .rest
            .put(&format!("/api/users/{user_id}"), update, token)
            .await?;
        match (response.success, response.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(ApiError::Rejected(response.message)),
        }
    }

    /// Change the caller's password; returns the service's message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the current password does not
    /// verify.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
        token: Option<&str>,
    ) -> Result<String> {
        let body = ChangePasswordRequest {
            current_password,
            new_password,
        };
        let response: UserEnvelope = self
            .rest
            .post(&format!("/api/users/{user_id}/change-password"), &body, token)
            .await?;
        if response.success {
            Ok(response.message)
        } else {
            Err(ApiError::Rejected(response.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_with_session() {
        let json = r#"{
            "success": true,
            "message": "Login successful",
            "user": {
                "id": 12,
                "username": "jdoe",
                "email": "jdoe@example.com",
                "firstName": "Jane",
                "lastName": "Doe"
            },
            "token": "opaque.bearer.value"
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.token.as_deref(), Some("opaque.bearer.value"));
    }

    #[test]
    fn login_response_tolerates_failure_shape() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#)
                .unwrap();
        assert!(!response.success);
        assert!(response.user.is_none());
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            first_name: Some("Jane".into()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"firstName":"Jane"}"#
        );
    }
}
