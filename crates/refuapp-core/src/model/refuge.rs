// ── Refuge domain types ──

use serde::{Deserialize, Serialize};

use super::refuge_id::RefugeId;

/// Placeholder image assigned to refuges created without a photo.
pub const DEFAULT_IMAGE: &str = "no-photo.png";

/// A mountain refuge as held by the client: a deserialized copy of the
/// server record, never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refuge {
    /// The server sends MongoDB's `_id`; `id` is accepted too.
    #[serde(alias = "_id")]
    pub id: RefugeId,
    pub name: String,
    pub region: String,
    /// Stored image filename, resolvable via the static images endpoint.
    pub image: String,
    /// Meters above sea level.
    pub altitude: u32,
    pub coordinates: Coordinates,
    pub capacity: Capacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Sleeping places per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub winter: u32,
    pub summer: u32,
}

// ── Request-side projections ────────────────────────────────────────

/// Body of `POST /refuges/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRefuge {
    pub name: String,
    pub region: String,
    #[serde(default = "default_image")]
    pub image: String,
    pub altitude: u32,
    pub coordinates: Coordinates,
    pub capacity: Capacity,
}

fn default_image() -> String {
    DEFAULT_IMAGE.into()
}

impl Default for CreateRefuge {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: String::new(),
            image: default_image(),
            altitude: 0,
            coordinates: Coordinates::default(),
            capacity: Capacity::default(),
        }
    }
}

impl From<&Refuge> for CreateRefuge {
    fn from(refuge: &Refuge) -> Self {
        Self {
            name: refuge.name.clone(),
            region: refuge.region.clone(),
            image: refuge.image.clone(),
            altitude: refuge.altitude,
            coordinates: refuge.coordinates,
            capacity: refuge.capacity,
        }
    }
}

/// Body of `PUT /refuges/{id}`.
///
/// The target id travels in the URL, not in the JSON body. It is kept
/// as the raw string the caller supplied so the identifier validator
/// can reject it before any request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRefuge {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub changes: CreateRefuge,
}

impl UpdateRefuge {
    pub fn new(id: impl Into<String>, changes: CreateRefuge) -> Self {
        Self {
            id: id.into(),
            changes,
        }
    }
}

impl Refuge {
    /// Pre-fill an update form from this record.
    pub fn to_update(&self) -> UpdateRefuge {
        UpdateRefuge::new(self.id.as_str(), CreateRefuge::from(self))
    }
}
