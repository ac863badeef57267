//! Thin REST/JSON transport shared by the service clients.
//!
//! Wraps one `reqwest::Client` per backend service with a base URL, the
//! session bearer token, and uniform response handling: non-2xx statuses
//! and malformed bodies become [`ApiError`], with a body snippet logged
//! for diagnostics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, Result};

/// Shape of the error body most services produce on failure.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// A REST client bound to one backend service.
#[derive(Clone)]
pub struct Rest {
    inner: Arc<RestInner>,
}

struct RestInner {
    client: reqwest::Client,
    base_url: Url,
}

impl Rest {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestInner { client, base_url }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    fn apply_bearer(req: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let req = self.inner.client.get(self.url(path));
        let response = Self::apply_bearer(req, token).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        token: Option<&str>,
    ) -> Result<T> {
        let req = self.inner.client.get(self.url(path)).query(query);
        let response = Self::apply_bearer(req, token).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T> {
        let req = self.inner.client.post(self.url(path)).json(body);
        let response = Self::apply_bearer(req, token).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T> {
        let req = self.inner.client.put(self.url(path)).json(body);
        let response = Self::apply_bearer(req, token).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let req = self.inner.client.delete(self.url(path));
        let response = Self::apply_bearer(req, token).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request against an endpoint that returns no body.
    pub async fn delete_no_content(&self, path: &str, token: Option<&str>) -> Result<()> {
        let req = self.inner.client.delete(self.url(path));
        let response = Self::apply_bearer(req, token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(Self::classify_error(status, &body))
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
                Err(ApiError::Parse(e))
            }
        }
    }

    fn classify_error(status: StatusCode, body: &str) -> ApiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::warn!(status = %status, message = %message, "service returned an error");

        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl std::fmt::Debug for Rest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rest")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_error_extracts_service_message() {
        let err = Rest::classify_error(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"quantity must be positive"}"#,
        );
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "quantity must be positive");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn classify_error_maps_auth_statuses() {
        assert!(matches!(
            Rest::classify_error(StatusCode::UNAUTHORIZED, "{}"),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            Rest::classify_error(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let rest = Rest::new(
            Url::parse("http://localhost:8087/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(rest.url("/api/cart/12"), "http://localhost:8087/api/cart/12");
    }
}
