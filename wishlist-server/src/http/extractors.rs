//! Custom Axum extractors
//!
//! Each one turns axum's own rejection into an `ApiError` so decode
//! failures share the `{"error": ...}` body of every other error.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;

/// Numeric wish id from the `{id}` path segment
pub struct WishId(pub i64);

impl<S> FromRequestParts<S> for WishId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("invalid wish ID"))?;

        let id = raw
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest("invalid wish ID"))?;

        Ok(Self(id))
    }
}

/// JSON object request body, decoded whatever the content type says.
///
/// Only a top-level object is accepted; serde would otherwise fill struct
/// fields from a JSON array by position.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("invalid JSON"))?;

        Ok(Self(decode_object(&bytes)?))
    }
}

fn decode_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let object: Map<String, Value> = serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        ApiError::BadRequest("invalid JSON")
    })?;

    T::deserialize(Value::Object(object)).map_err(|e| {
        tracing::debug!(error = %e, "request body has wrong shape");
        ApiError::BadRequest("invalid JSON")
    })
}

/// Query string parameters. A repeated key keeps its first value.
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("invalid query parameters"))?;

        Ok(Self(decode_first_values(pairs)?))
    }
}

fn decode_first_values<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> Result<T, ApiError> {
    let mut first = Map::new();
    for (key, value) in pairs {
        first.entry(key).or_insert(Value::String(value));
    }

    T::deserialize(Value::Object(first))
        .map_err(|_| ApiError::BadRequest("invalid query parameters"))
}

/// Parse a boolean the way the `bought` filter accepts it:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
