//! Authenticated REST/JSON transport for the admin clients.
//!
//! Unlike the storefront, every admin request carries the bearer token
//! the client was constructed with; there is no anonymous path. 401 and
//! 403 both map to [`AdminError::Forbidden`] since the admin UI treats
//! an expired session and a demoted account the same way.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AdminError, Result};

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// A token-bound REST client for one backend service.
#[derive(Clone)]
pub struct AdminRest {
    inner: Arc<AdminRestInner>,
}

struct AdminRestInner {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl AdminRest {
    /// Create a client for the service at `base_url`, bound to `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: Url, token: String, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminRestInner {
                client,
                base_url,
                token,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .inner
            .client
            .delete(self.url(path))
            .bearer_auth(&self.inner.token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &body));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse service response"
                );
                Err(AdminError::Parse(e))
            }
        }
    }

    fn classify_error(status: StatusCode, body: &str) -> AdminError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::warn!(status = %status, message = %message, "admin request failed");

        match status {
            StatusCode::NOT_FOUND => AdminError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdminError::Forbidden(message),
            _ => AdminError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl std::fmt::Debug for AdminRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token never appears in debug output.
        f.debug_struct("AdminRest")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_covers_both_auth_statuses() {
        assert!(matches!(
            AdminRest::classify_error(StatusCode::UNAUTHORIZED, "{}"),
            AdminError::Forbidden(_)
        ));
        assert!(matches!(
            AdminRest::classify_error(StatusCode::FORBIDDEN, r#"{"message":"admin only"}"#),
            AdminError::Forbidden(m) if m == "admin only"
        ));
    }

    #[test]
    fn debug_redacts_the_token() {
        let rest = AdminRest::new(
            Url::parse("http://localhost:8084").unwrap(),
            "secret-token".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{rest:?}").contains("secret-token"));
    }
}
