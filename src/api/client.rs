//! `reqwest` implementation of [`ListSource`] for the raffle API.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::api::{ApiError, ApiResult, ListFuture, ListSource, error_message};

mod constants {
    pub const USER_AGENT: &str = "rifa-admin/0.1";
    pub const TOKEN_HEADER: &str = "token";
}

/// # Errors
///
/// Returns an error if the HTTP client builder fails, e.g. when the TLS
/// backend cannot be initialised.
pub fn create_http_client(timeout: Duration) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(constants::USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|err| ApiError::Transport(err.to_string()))
}

/// Remote API handle bound to one operator's token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same connection pool, requests carry `token`.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(constants::TOKEN_HEADER, value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// `GET` against `endpoint` (path plus encoded query), returning the
    /// JSON body or `Value::Null` for empty/non-JSON success bodies.
    pub async fn get_json(&self, endpoint: &str) -> ApiResult<Value> {
        get_json(
            self.http.clone(),
            format!("{}{}", self.base_url, endpoint),
            self.headers(),
        )
        .await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

async fn get_json(http: reqwest::Client, url: String, headers: HeaderMap) -> ApiResult<Value> {
    log::debug!("GET {url}");

    let response = http
        .get(&url)
        .headers(headers)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
}

impl ListSource for ApiClient {
    fn fetch(&self, url: &str) -> ListFuture {
        Box::pin(get_json(
            self.http.clone(),
            format!("{}{}", self.base_url, url),
            self.headers(),
        ))
    }
}
