// ── Response classifier ──
//
// The single point that assumes nothing about what the server sends.
// Success payloads are deserialized and then range-checked; failures
// are mapped from status code (and, for 422, the body) to a closed
// set of failure kinds.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::model::{Refuge, Token};

// ── Payload validation ──────────────────────────────────────────────

/// Semantic checks applied after a payload deserializes.
///
/// Deserialization already enforces field presence and primitive
/// types (unsigned fields reject negatives); this covers the rest.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for Refuge {
    fn validate(&self) -> Result<(), String> {
        if !self.id.is_valid() {
            return Err(format!("malformed id '{}'", self.id));
        }
        if self.name.trim().is_empty() {
            return Err("empty name".into());
        }
        if !self.coordinates.is_valid() {
            return Err(format!(
                "coordinates out of range ({}, {})",
                self.coordinates.latitude, self.coordinates.longitude
            ));
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate().map_err(|e| format!("item {i}: {e}")))
    }
}

/// Uploaded image filename.
impl Validate for String {
    fn validate(&self) -> Result<(), String> {
        if self.trim().is_empty() {
            Err("empty string".into())
        } else {
            Ok(())
        }
    }
}

impl Validate for Token {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;
        if self.access_token.expose_secret().is_empty() {
            Err("empty access token".into())
        } else {
            Ok(())
        }
    }
}

/// Outcome of checking a success payload against its expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Valid(T),
    /// The server answered 2xx with something that is not a `T`.
    Malformed,
}

/// Deserialize and validate a success payload.
pub fn classify_payload<T>(body: Value) -> Payload<T>
where
    T: DeserializeOwned + Validate,
{
    let entity: T = match serde_json::from_value(body) {
        Ok(entity) => entity,
        Err(e) => {
            warn!(error = %e, "server sent data in an unexpected shape");
            return Payload::Malformed;
        }
    };

    match entity.validate() {
        Ok(()) => Payload::Valid(entity),
        Err(violation) => {
            warn!(%violation, "server sent data that fails validation");
            Payload::Malformed
        }
    }
}

// ── Failure classification ──────────────────────────────────────────

/// Every distinguishable failure condition an HTTP status can express.
///
/// Status 0 is absent on purpose: it never reaches the classifier
/// (see [`refuapp_api::Reply::reachable`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 422 with a recognizable validation detail body: the user's data
    /// was rejected. Carries `detail[0].msg` verbatim.
    InvalidData { message: String },
    /// 422 without a recognizable body: the client code built a bad
    /// request.
    MalformedRequest,
    /// Anything else.
    Unknown { status: u16 },
}

/// Map a failure status (and body, for 422) to an [`HttpFailure`].
pub fn classify_failure(status: u16, body: &Value) -> HttpFailure {
    match status {
        400 => HttpFailure::BadRequest,
        401 => HttpFailure::Unauthorized,
        403 => HttpFailure::Forbidden,
        404 => HttpFailure::NotFound,
        409 => HttpFailure::Conflict,
        422 => validation_message(body).map_or(HttpFailure::MalformedRequest, |message| {
            HttpFailure::InvalidData { message }
        }),
        status => HttpFailure::Unknown { status },
    }
}

/// `{ detail: [{ loc: [..], msg, type }, ...] }`
#[derive(Debug, Deserialize)]
struct ValidationErrorBody {
    detail: Vec<ValidationDetail>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ValidationDetail {
    loc: Vec<LocSegment>,
    msg: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocSegment {
    Field(String),
    Index(i64),
}

fn validation_message(body: &Value) -> Option<String> {
    let parsed = ValidationErrorBody::deserialize(body).ok()?;
    parsed.detail.into_iter().next().map(|detail| detail.msg)
}
