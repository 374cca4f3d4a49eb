//! Boundary to the remote raffle API.
//!
//! The table engine only needs [`ListSource`]: something that takes a fully
//! encoded list URL and eventually yields the JSON body. The HTTP
//! implementation lives in [`client`].

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[cfg(feature = "server")]
pub mod client;

/// Failures of a request against the remote API.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No response was obtained.
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    /// Non-2xx status. `message` is taken from the body when it carries one.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Pending JSON body of one list request.
pub type ListFuture = Pin<Box<dyn Future<Output = ApiResult<Value>> + Send>>;

/// Issues `GET <url>` against a list endpoint.
pub trait ListSource {
    fn fetch(&self, url: &str) -> ListFuture;
}

impl<S: ListSource + ?Sized> ListSource for &S {
    fn fetch(&self, url: &str) -> ListFuture {
        (**self).fetch(url)
    }
}

/// Page envelope returned by `nestjsx/crud` list endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_count: usize,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            count: 0,
            total: 0,
            page: 0,
            page_count: 0,
        }
    }
}

impl<T: DeserializeOwned> ListResponse<T> {
    /// Reads a success body. Empty or malformed bodies count as an empty
    /// result set.
    pub fn from_body(body: Value) -> Self {
        if body.is_null() {
            return Self::default();
        }
        match serde_json::from_value(body) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Treating malformed list body as empty: {err}");
                Self::default()
            }
        }
    }
}

/// Best-effort human-readable message from an error body: `message` as a
/// string or as a list of strings.
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Array(messages) => {
            let joined = messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn reads_crud_envelope() {
        let body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "count": 2,
            "total": 12,
            "page": 1,
            "pageCount": 2
        });
        let response = ListResponse::<Row>::from_body(body);
        assert_eq!(response.data, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(response.total, 12);
        assert_eq!(response.page_count, 2);
    }

    #[test]
    fn malformed_bodies_are_empty() {
        assert_eq!(
            ListResponse::<Row>::from_body(Value::Null),
            ListResponse::default()
        );
        assert_eq!(
            ListResponse::<Row>::from_body(json!("oops")),
            ListResponse::default()
        );
        assert_eq!(
            ListResponse::<Row>::from_body(json!({"data": [{"id": "x"}]})),
            ListResponse::default()
        );
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let response = ListResponse::<Row>::from_body(json!({"data": [{"id": 3}]}));
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.total, 0);
    }

    #[test]
    fn error_message_reads_string_or_list() {
        assert_eq!(
            error_message(&json!({"message": "Unauthorized"})),
            Some("Unauthorized".to_string())
        );
        assert_eq!(
            error_message(&json!({"message": ["name must be a string", "limit too big"]})),
            Some("name must be a string, limit too big".to_string())
        );
        assert_eq!(error_message(&json!({"statusCode": 500})), None);
    }
}
