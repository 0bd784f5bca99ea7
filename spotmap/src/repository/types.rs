//! Repository trait and request/response types.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::spot::{Spot, SpotFilters, SpotId, SpotSet};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Network or API failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded into the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The requested spot does not exist.
    #[error("Spot not found: {0}")]
    NotFound(SpotId),

    /// A submission failed validation before it was sent.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),
}

/// A new spot proposed by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotSubmission {
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub photo_url: String,
}

impl SpotSubmission {
    /// Check the submission is well-formed before it leaves the process.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.name.trim().is_empty() {
            return Err(RepositoryError::InvalidSubmission(
                "name must not be empty".to_string(),
            ));
        }
        GeoPoint::new(self.lat, self.lng)
            .map_err(|e| RepositoryError::InvalidSubmission(e.to_string()))?;
        Ok(())
    }
}

/// A community verification vote on a pending spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationVote {
    pub spot_id: SpotId,
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Approve,
    Reject,
}

/// Assistant reply to a recommendation query.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response_text: String,
    pub suggested_spots: Vec<Spot>,
}

/// The spot data capability: `{fetch, submit, vote, chat, trending}`.
///
/// Implementations are selected once at startup via the factory. The
/// engine consumes `fetch_spots` only; the remaining operations serve the
/// submission and verification flows.
pub trait SpotRepository: Send + Sync {
    /// Fetch the current spot list for the given filter criteria.
    fn fetch_spots(
        &self,
        filters: &SpotFilters,
    ) -> impl Future<Output = Result<SpotSet, RepositoryError>> + Send;

    /// Fetch a single spot by identity.
    fn fetch_spot(
        &self,
        id: &SpotId,
    ) -> impl Future<Output = Result<Spot, RepositoryError>> + Send;

    /// Submit a new spot for community verification.
    fn submit_spot(
        &self,
        submission: &SpotSubmission,
    ) -> impl Future<Output = Result<Spot, RepositoryError>> + Send;

    /// Cast a verification vote on a pending spot.
    fn verify_spot(
        &self,
        vote: &VerificationVote,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Ask the assistant for recommendations.
    fn chat(
        &self,
        message: &str,
    ) -> impl Future<Output = Result<ChatReply, RepositoryError>> + Send;

    /// Fetch the currently trending spots, most popular first.
    fn fetch_trending(&self) -> impl Future<Output = Result<Vec<Spot>, RepositoryError>> + Send;
}
