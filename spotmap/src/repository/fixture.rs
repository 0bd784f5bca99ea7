//! In-memory fixture repository.
//!
//! Serves a small deterministic data set with the same filter semantics as
//! the remote API. Selected by the factory when no endpoint is configured,
//! and used throughout the test suite.

use chrono::{TimeZone, Utc};
use tracing::debug;

use super::types::{
    ChatReply, RepositoryError, SpotRepository, SpotSubmission, VerificationVote,
};
use crate::geo::GeoPoint;
use crate::spot::{Spot, SpotFilters, SpotId, SpotSet};

/// Repository backed by fixed in-memory data.
#[derive(Debug, Clone)]
pub struct FixtureRepository {
    spots: Vec<Spot>,
}

impl FixtureRepository {
    /// Create a repository over the default Lagos fixture set.
    pub fn new() -> Self {
        Self {
            spots: lagos_fixtures(),
        }
    }

    /// Create a repository over caller-supplied spots.
    pub fn with_spots(spots: Vec<Spot>) -> Self {
        Self { spots }
    }
}

impl Default for FixtureRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotRepository for FixtureRepository {
    async fn fetch_spots(&self, filters: &SpotFilters) -> Result<SpotSet, RepositoryError> {
        let spots: Vec<Spot> = self
            .spots
            .iter()
            .filter(|s| filters.matches(s))
            .cloned()
            .collect();
        debug!(total = self.spots.len(), matched = spots.len(), "Fixture fetch");
        Ok(SpotSet::new(filters.clone(), spots))
    }

    async fn fetch_spot(&self, id: &SpotId) -> Result<Spot, RepositoryError> {
        self.spots
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn submit_spot(&self, submission: &SpotSubmission) -> Result<Spot, RepositoryError> {
        submission.validate()?;
        let now = Utc::now();
        Ok(Spot {
            id: SpotId::new(now.timestamp_millis().to_string()),
            name: submission.name.clone(),
            description: submission.description.clone(),
            // validate() above guarantees the coordinates are in range
            position: GeoPoint::new(submission.lat, submission.lng)
                .map_err(|e| RepositoryError::InvalidSubmission(e.to_string()))?,
            photo_url: submission.photo_url.clone(),
            verified: false,
            submitted_by: "fixture".to_string(),
            data_source: "user_submission".to_string(),
            created_at: now,
            updated_at: now,
            verification_count: Some(0),
            rating: None,
        })
    }

    async fn verify_spot(&self, _vote: &VerificationVote) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, RepositoryError> {
        let suggested: Vec<Spot> = self.spots.iter().take(2).cloned().collect();
        Ok(ChatReply {
            response_text: format!(
                "I found some great spots based on your query: \"{}\".",
                message
            ),
            suggested_spots: suggested,
        })
    }

    async fn fetch_trending(&self) -> Result<Vec<Spot>, RepositoryError> {
        let mut trending: Vec<Spot> = self
            .spots
            .iter()
            .filter(|s| s.verified)
            .cloned()
            .collect();
        trending.sort_by(|a, b| {
            b.verification_count
                .unwrap_or(0)
                .cmp(&a.verification_count.unwrap_or(0))
        });
        trending.truncate(TRENDING_LIMIT);
        debug!(count = trending.len(), "Fixture trending fetch");
        Ok(trending)
    }
}

/// Most spots a trending query returns.
const TRENDING_LIMIT: usize = 6;

/// The default fixture set: three spots around Lagos.
fn lagos_fixtures() -> Vec<Spot> {
    fn fixture(
        id: &str,
        name: &str,
        description: &str,
        lat: f64,
        lon: f64,
        verified: bool,
        data_source: &str,
        verification_count: u32,
        rating: f32,
        day: u32,
    ) -> Spot {
        Spot {
            id: SpotId::from(id),
            name: name.to_string(),
            description: description.to_string(),
            position: GeoPoint::new(lat, lon).expect("fixture coordinates are valid"),
            photo_url: "/placeholder.svg".to_string(),
            verified,
            submitted_by: format!("user{}", id),
            data_source: data_source.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 10, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, day, 10, 30, 0).unwrap(),
            verification_count: Some(verification_count),
            rating: Some(rating),
        }
    }

    vec![
        fixture(
            "1",
            "Mama Cass Buka",
            "Authentic homestyle Amala with the softest texture. Famous for their gbegiri and ewedu combination.",
            6.5244,
            3.3792,
            true,
            "user_submission",
            8,
            4.7,
            15,
        ),
        fixture(
            "2",
            "Iya Risi Traditional Kitchen",
            "Award-winning Amala spot in the heart of Mushin. Their secret is in the yam flour preparation.",
            6.5355,
            3.3516,
            true,
            "web_scraping",
            12,
            4.9,
            12,
        ),
        fixture(
            "3",
            "Abula Express",
            "Modern Amala experience with traditional taste. Great ambiance and quick service.",
            6.4474,
            3.3903,
            false,
            "user_submission",
            3,
            4.2,
            18,
        ),
    ]
}
