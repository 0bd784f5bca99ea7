//! Spot data model.
//!
//! A [`Spot`] is one point-of-interest record as delivered by the
//! repository. Spots are immutable from the engine's perspective: the
//! engine only reads them, and a fresh fetch replaces the whole
//! [`SpotSet`] rather than merging.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{GeoBounds, GeoError, GeoPoint};

/// Valid rating range for a spot.
pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 5.0;

/// Opaque spot identity, stable across refreshes.
///
/// Identity equality is the only way the engine correlates spots between
/// fetches, never coordinate equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(String);

impl SpotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Errors that can occur validating a spot record.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotValidationError {
    /// Position failed coordinate validation
    Position(GeoError),
    /// Rating outside [0, 5]
    InvalidRating(f32),
}

impl fmt::Display for SpotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotValidationError::Position(e) => write!(f, "Invalid position: {}", e),
            SpotValidationError::InvalidRating(r) => {
                write!(
                    f,
                    "Invalid rating: {} (must be between {} and {})",
                    r, MIN_RATING, MAX_RATING
                )
            }
        }
    }
}

impl std::error::Error for SpotValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotValidationError::Position(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeoError> for SpotValidationError {
    fn from(e: GeoError) -> Self {
        Self::Position(e)
    }
}

/// One point-of-interest record.
///
/// The wire format uses flat `lat`/`lng` fields; deserialization validates
/// coordinates and rating before a `Spot` can exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpot", into = "RawSpot")]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub description: String,
    pub position: GeoPoint,
    pub photo_url: String,
    pub verified: bool,
    pub submitted_by: String,
    pub data_source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub verification_count: Option<u32>,
    pub rating: Option<f32>,
}

/// Unvalidated wire form of a spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSpot {
    id: SpotId,
    name: String,
    description: String,
    lat: f64,
    lng: f64,
    photo_url: String,
    verified: bool,
    submitted_by: String,
    data_source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verification_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<f32>,
}

impl TryFrom<RawSpot> for Spot {
    type Error = SpotValidationError;

    fn try_from(raw: RawSpot) -> Result<Self, SpotValidationError> {
        let position = GeoPoint::new(raw.lat, raw.lng)?;
        if let Some(rating) = raw.rating {
            if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(SpotValidationError::InvalidRating(rating));
            }
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            position,
            photo_url: raw.photo_url,
            verified: raw.verified,
            submitted_by: raw.submitted_by,
            data_source: raw.data_source,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            verification_count: raw.verification_count,
            rating: raw.rating,
        })
    }
}

impl From<Spot> for RawSpot {
    fn from(spot: Spot) -> Self {
        RawSpot {
            id: spot.id,
            name: spot.name,
            description: spot.description,
            lat: spot.position.lat(),
            lng: spot.position.lon(),
            photo_url: spot.photo_url,
            verified: spot.verified,
            submitted_by: spot.submitted_by,
            data_source: spot.data_source,
            created_at: spot.created_at,
            updated_at: spot.updated_at,
            verification_count: spot.verification_count,
            rating: spot.rating,
        }
    }
}

/// Filter criteria for a spot fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotFilters {
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Only include community-verified spots.
    pub verified_only: bool,
    /// Minimum rating, inclusive.
    pub rating_min: Option<f32>,
    /// Restrict to spots inside this region.
    pub bounds: Option<GeoBounds>,
}

impl SpotFilters {
    /// Whether `spot` passes every active criterion.
    ///
    /// Used by the fixture repository; the remote API applies the same
    /// semantics server-side.
    pub fn matches(&self, spot: &Spot) -> bool {
        if self.verified_only && !spot.verified {
            return false;
        }
        if let Some(min) = self.rating_min {
            if spot.rating.is_none_or(|r| r < min) {
                return false;
            }
        }
        if let Some(bounds) = &self.bounds {
            if !bounds.contains(spot.position) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty()
                && !spot.name.to_lowercase().contains(&needle)
                && !spot.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// The result of one fetch: an ordered spot list tagged with the filters
/// that produced it.
///
/// Replaced wholesale on every successful fetch, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotSet {
    filters: SpotFilters,
    spots: Vec<Spot>,
}

impl SpotSet {
    pub fn new(filters: SpotFilters, spots: Vec<Spot>) -> Self {
        Self { filters, spots }
    }

    /// The filter criteria this set answers.
    pub fn filters(&self) -> &SpotFilters {
        &self.filters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Look a spot up by identity.
    pub fn get(&self, id: &SpotId) -> Option<&Spot> {
        self.spots.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SpotId) -> bool {
        self.get(id).is_some()
    }

    /// The identity set of this fetch.
    pub fn ids(&self) -> HashSet<SpotId> {
        self.spots.iter().map(|s| s.id.clone()).collect()
    }

    /// Minimal region covering every spot, `None` when empty.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::covering(self.spots.iter().map(|s| s.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spot;

    #[test]
    fn test_wire_round_trip() {
        let original = spot("1", "Mama Cass Buka", 6.5244, 3.3792, true);
        let json = serde_json::to_string(&original).unwrap();
        let back: Spot = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn test_wire_uses_flat_lat_lng() {
        let json = serde_json::to_value(spot("1", "A", 6.5, 3.3, false)).unwrap();
        assert_eq!(json["lat"], 6.5);
        assert_eq!(json["lng"], 3.3);
        assert!(json.get("position").is_none());
    }

    #[test]
    fn test_deserialize_rejects_bad_latitude() {
        let mut json = serde_json::to_value(spot("1", "A", 6.5, 3.3, false)).unwrap();
        json["lat"] = serde_json::json!(95.0);
        let result: Result<Spot, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_rating() {
        let mut json = serde_json::to_value(spot("1", "A", 6.5, 3.3, false)).unwrap();
        json["rating"] = serde_json::json!(7.5);
        let result: Result<Spot, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_search_matches_name_and_description() {
        let s = spot("1", "Iya Risi Traditional Kitchen", 6.5355, 3.3516, true);

        let by_name = SpotFilters {
            search: Some("iya risi".into()),
            ..Default::default()
        };
        assert!(by_name.matches(&s));

        let by_description = SpotFilters {
            search: Some("description".into()),
            ..Default::default()
        };
        assert!(by_description.matches(&s));

        let no_match = SpotFilters {
            search: Some("suya".into()),
            ..Default::default()
        };
        assert!(!no_match.matches(&s));
    }

    #[test]
    fn test_filters_verified_only() {
        let filters = SpotFilters {
            verified_only: true,
            ..Default::default()
        };
        assert!(filters.matches(&spot("1", "A", 6.5, 3.3, true)));
        assert!(!filters.matches(&spot("2", "B", 6.5, 3.3, false)));
    }

    #[test]
    fn test_filters_rating_min_excludes_unrated() {
        let filters = SpotFilters {
            rating_min: Some(4.0),
            ..Default::default()
        };
        let mut rated = spot("1", "A", 6.5, 3.3, true);
        rated.rating = Some(4.5);
        assert!(filters.matches(&rated));

        let mut low = spot("2", "B", 6.5, 3.3, true);
        low.rating = Some(3.0);
        assert!(!filters.matches(&low));

        let mut unrated = spot("3", "C", 6.5, 3.3, true);
        unrated.rating = None;
        assert!(!filters.matches(&unrated));
    }

    #[test]
    fn test_spot_set_identity_lookup() {
        let set = SpotSet::new(
            SpotFilters::default(),
            vec![
                spot("1", "A", 6.5244, 3.3792, true),
                spot("2", "B", 6.5355, 3.3516, false),
            ],
        );

        assert_eq!(set.len(), 2);
        assert!(set.contains(&SpotId::from("1")));
        assert!(!set.contains(&SpotId::from("9")));
        assert_eq!(set.get(&SpotId::from("2")).unwrap().name, "B");
        assert_eq!(set.ids().len(), 2);
    }

    #[test]
    fn test_spot_set_bounds() {
        let set = SpotSet::new(
            SpotFilters::default(),
            vec![
                spot("1", "A", 6.5244, 3.3792, true),
                spot("2", "B", 6.5355, 3.3516, false),
            ],
        );
        let bounds = set.bounds().unwrap();
        assert_eq!(bounds.min_lat, 6.5244);
        assert_eq!(bounds.max_lat, 6.5355);

        assert!(SpotSet::default().bounds().is_none());
    }
}
