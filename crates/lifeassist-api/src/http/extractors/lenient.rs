//! Request extractors that never reject.
//!
//! Every endpoint treats missing input as empty input. For bodies, an absent
//! or unreadable body, malformed JSON, and any top-level value that is not a
//! JSON object produce `T::default()` instead of a 4xx response. Query
//! strings that fail to deserialize fall back the same way.

use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON body that falls back to `T::default()` when it cannot be parsed.
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable request body, treating as empty");
                return Ok(Self(T::default()));
            }
        };

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value = match serde_json::from_slice::<Value>(&body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::debug!("JSON body is not an object, treating as empty");
                return Ok(Self(T::default()));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Malformed JSON body, treating as empty");
                return Ok(Self(T::default()));
            }
        };

        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Self(parsed)),
            Err(e) => {
                tracing::debug!(error = %e, "Unexpected JSON body shape, treating as empty");
                Ok(Self(T::default()))
            }
        }
    }
}

/// Query string that falls back to `T::default()` when it cannot be parsed.
#[derive(Debug, Clone, Default)]
pub struct LenientQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(value)) => Ok(Self(value)),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed query string, treating as empty");
                Ok(Self(T::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        text: Option<String>,
    }

    async fn extract(body: &'static str) -> Sample {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        let LenientJson(sample) = LenientJson::<Sample>::from_request(req, &()).await.unwrap();
        sample
    }

    #[tokio::test]
    async fn test_valid_body_parses() {
        assert_eq!(extract(r#"{"text":"hi"}"#).await.text.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_missing_body_is_default() {
        assert_eq!(extract("").await, Sample::default());
        assert_eq!(extract("  \n").await, Sample::default());
    }

    #[tokio::test]
    async fn test_malformed_or_mistyped_body_is_default() {
        assert_eq!(extract("{not json").await, Sample::default());
        assert_eq!(extract("null").await, Sample::default());
        assert_eq!(extract(r#"["text"]"#).await, Sample::default());
        assert_eq!(extract(r#""text""#).await, Sample::default());
        assert_eq!(extract(r#"{"text":5}"#).await, Sample::default());
    }

    async fn extract_query(uri: &str) -> Sample {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (mut parts, _) = req.into_parts();
        let LenientQuery(sample) = LenientQuery::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        sample
    }

    #[tokio::test]
    async fn test_query_parses() {
        assert_eq!(extract_query("/?text=hi").await.text.as_deref(), Some("hi"));
        assert_eq!(extract_query("/").await, Sample::default());
    }

    #[tokio::test]
    async fn test_repeated_query_key_is_default() {
        assert_eq!(extract_query("/?text=a&text=b").await, Sample::default());
    }
}
