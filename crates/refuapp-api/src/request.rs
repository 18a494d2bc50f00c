// Request and reply types exchanged with a `Transport`.
//
// Bodies stay as `serde_json::Value` on the way in: the transport makes
// no assumptions about payload shape. Validation belongs to the
// classifier in `refuapp-core`.

use std::fmt;

use bytes::Bytes;
use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use url::Url;

use crate::error::Unreachable;

/// A single outgoing API request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Body,
    /// Bearer token for the `Authorization` header, when authenticated.
    pub bearer: Option<SecretString>,
}

impl Request {
    pub fn new(method: Method, url: Url, body: Body) -> Self {
        Self {
            method,
            url,
            body,
            bearer: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, Body::Empty)
    }

    pub fn post(url: Url, body: Body) -> Self {
        Self::new(Method::POST, url, body)
    }

    pub fn put(url: Url, body: Body) -> Self {
        Self::new(Method::PUT, url, body)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url, Body::Empty)
    }

    /// Attach a bearer token (no-op for `None`).
    pub fn with_bearer(mut self, token: Option<SecretString>) -> Self {
        self.bearer = token;
        self
    }
}

/// Request payload.
#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(Value),
    /// `multipart/form-data` with text, secret and file parts.
    Multipart(Vec<FormPart>),
}

/// One field of a multipart form.
#[derive(Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    /// Text field whose value must never reach a log line.
    Secret {
        name: String,
        value: SecretString,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn secret(name: impl Into<String>, value: SecretString) -> Self {
        Self::Secret {
            name: name.into(),
            value,
        }
    }

    /// Field name of this part.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::Secret { name, .. } | Self::File { name, .. } => name,
        }
    }
}

impl fmt::Debug for FormPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { name, value } => f
                .debug_struct("Text")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::Secret { name, .. } => f
                .debug_struct("Secret")
                .field("name", name)
                .field("value", &"[REDACTED]")
                .finish(),
            Self::File {
                name,
                file_name,
                content_type,
                bytes,
            } => f
                .debug_struct("File")
                .field("name", name)
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// What came back from the server, before any classification.
///
/// Bodies are decoded leniently: an empty body is `Value::Null` and a
/// body that is not JSON is kept as `Value::String`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Value),
    Failure { status: u16, body: Value },
}

impl Reply {
    /// Build a reply from a status code and a raw response body.
    pub fn from_parts(status: u16, raw: &str) -> Self {
        let body = decode_body(raw);
        if (200..300).contains(&status) {
            Self::Success(body)
        } else {
            Self::Failure { status, body }
        }
    }

    /// Status 0 means no response was ever received.
    ///
    /// Transports that surface it as an ordinary failure are normalized
    /// here so it can never be classified as an unknown server error.
    pub fn reachable(self) -> Result<Self, Unreachable> {
        match self {
            Self::Failure { status: 0, .. } => Err(Unreachable::new("no status code received")),
            other => Ok(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

fn decode_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_range_maps_to_success() {
        assert_eq!(
            Reply::from_parts(201, r#"{"a":1}"#),
            Reply::Success(json!({"a": 1}))
        );
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(
            Reply::from_parts(404, ""),
            Reply::Failure {
                status: 404,
                body: Value::Null
            }
        );
    }

    #[test]
    fn non_json_body_is_kept_as_string() {
        assert_eq!(
            Reply::from_parts(200, "abc.png"),
            Reply::Success(Value::String("abc.png".into()))
        );
    }

    #[test]
    fn status_zero_is_unreachable() {
        let reply = Reply::Failure {
            status: 0,
            body: Value::Null,
        };
        assert!(reply.reachable().is_err());
    }

    #[test]
    fn secret_parts_are_redacted_in_debug() {
        let part = FormPart::secret("password", SecretString::from("hunter2".to_owned()));
        let printed = format!("{part:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("REDACTED"));
    }
}
