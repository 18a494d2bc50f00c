// ── Refuge identity ──
//
// Refuge ids are MongoDB ObjectIds: 24 hexadecimal characters. The
// format is checked locally so malformed ids never cost a round trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a hex-encoded ObjectId.
pub const REFUGE_ID_LEN: usize = 24;

/// Format-only id check. No network access.
///
/// ```
/// use refuapp_core::is_valid_id;
///
/// assert!(is_valid_id("507f191e810c19729de860ea"));
/// assert!(!is_valid_id("not-an-id"));
/// ```
pub fn is_valid_id(id: &str) -> bool {
    id.len() == REFUGE_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed refuge id '{0}': expected {REFUGE_ID_LEN} hexadecimal characters")]
pub struct InvalidRefugeId(pub String);

/// Server-assigned refuge identifier.
///
/// Deserialization accepts any string so that a bad id in a server
/// payload is reported by the classifier as malformed data instead of
/// a decoding failure. Use [`RefugeId::is_valid`] or parse via
/// [`FromStr`] to enforce the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefugeId(String);

impl RefugeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        is_valid_id(&self.0)
    }
}

impl fmt::Display for RefugeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RefugeId {
    type Err = InvalidRefugeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_id(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidRefugeId(s.to_owned()))
        }
    }
}

impl AsRef<str> for RefugeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_object_id() {
        assert!(is_valid_id("507f191e810c19729de860ea"));
        assert!(is_valid_id("507F191E810C19729DE860EA"));
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(!is_valid_id("not-an-id"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("507f191e810c19729de860e"));
        assert!(!is_valid_id("507f191e810c19729de860eaa"));
        assert!(!is_valid_id("507f191e810c19729de860eg"));
        assert!(!is_valid_id("../refuges/507f191e810c1"));
    }

    #[test]
    fn from_str_enforces_format() {
        let id: RefugeId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
        assert!("nope".parse::<RefugeId>().is_err());
    }

    #[test]
    fn deserializes_any_string() {
        let id: RefugeId = serde_json::from_str("\"short\"").unwrap();
        assert!(!id.is_valid());
    }
}
