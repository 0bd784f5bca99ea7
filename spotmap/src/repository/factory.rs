//! Repository factory.
//!
//! The repository implementation is chosen once at process start: a
//! session with a configured endpoint gets the REST client, anything else
//! gets the fixture set. Nothing downstream branches on which one is live.

use tracing::info;

use super::fixture::FixtureRepository;
use super::http::ReqwestHttpClient;
use super::remote::RemoteRepository;
use super::types::{
    ChatReply, RepositoryError, SpotRepository, SpotSubmission, VerificationVote,
};
use crate::session::SessionContext;
use crate::spot::{Spot, SpotFilters, SpotId, SpotSet};

/// Configuration for creating a repository.
#[derive(Debug, Clone)]
pub enum RepositoryConfig {
    /// REST client for the session's configured endpoint.
    Remote { session: SessionContext },
    /// Deterministic in-memory data.
    Fixture,
}

impl RepositoryConfig {
    pub fn remote(session: SessionContext) -> Self {
        Self::Remote { session }
    }

    pub fn fixture() -> Self {
        Self::Fixture
    }

    /// Derive the configuration from a session: remote when an endpoint is
    /// configured, fixture otherwise.
    pub fn from_session(session: &SessionContext) -> Self {
        if session.api_base_url().is_some() {
            Self::Remote {
                session: session.clone(),
            }
        } else {
            Self::Fixture
        }
    }
}

/// Factory for creating spot repositories.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create the repository described by `config`.
    pub fn create(config: &RepositoryConfig) -> Result<RepositoryKind, RepositoryError> {
        match config {
            RepositoryConfig::Remote { session } => {
                info!(
                    base_url = session.api_base_url().unwrap_or(""),
                    "Using remote spot repository"
                );
                let client = ReqwestHttpClient::new()?;
                Ok(RepositoryKind::Remote(RemoteRepository::new(
                    client, session,
                )?))
            }
            RepositoryConfig::Fixture => {
                info!("Using fixture spot repository");
                Ok(RepositoryKind::Fixture(FixtureRepository::new()))
            }
        }
    }
}

/// A repository created by the factory.
///
/// Enum dispatch keeps [`SpotRepository`]'s async methods free of boxing
/// while still letting callers hold "whichever repository was configured".
pub enum RepositoryKind {
    Remote(RemoteRepository<ReqwestHttpClient>),
    Fixture(FixtureRepository),
}

impl SpotRepository for RepositoryKind {
    async fn fetch_spots(&self, filters: &SpotFilters) -> Result<SpotSet, RepositoryError> {
        match self {
            Self::Remote(r) => r.fetch_spots(filters).await,
            Self::Fixture(r) => r.fetch_spots(filters).await,
        }
    }

    async fn fetch_spot(&self, id: &SpotId) -> Result<Spot, RepositoryError> {
        match self {
            Self::Remote(r) => r.fetch_spot(id).await,
            Self::Fixture(r) => r.fetch_spot(id).await,
        }
    }

    async fn submit_spot(&self, submission: &SpotSubmission) -> Result<Spot, RepositoryError> {
        match self {
            Self::Remote(r) => r.submit_spot(submission).await,
            Self::Fixture(r) => r.submit_spot(submission).await,
        }
    }

    async fn verify_spot(&self, vote: &VerificationVote) -> Result<(), RepositoryError> {
        match self {
            Self::Remote(r) => r.verify_spot(vote).await,
            Self::Fixture(r) => r.verify_spot(vote).await,
        }
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, RepositoryError> {
        match self {
            Self::Remote(r) => r.chat(message).await,
            Self::Fixture(r) => r.chat(message).await,
        }
    }

    async fn fetch_trending(&self) -> Result<Vec<Spot>, RepositoryError> {
        match self {
            Self::Remote(r) => r.fetch_trending().await,
            Self::Fixture(r) => r.fetch_trending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_without_endpoint_is_fixture() {
        let config = RepositoryConfig::from_session(&SessionContext::anonymous());
        assert!(matches!(config, RepositoryConfig::Fixture));
    }

    #[test]
    fn test_from_session_with_endpoint_is_remote() {
        let session = SessionContext::anonymous().with_api_base_url("https://api.example.com");
        let config = RepositoryConfig::from_session(&session);
        assert!(matches!(config, RepositoryConfig::Remote { .. }));
    }

    #[tokio::test]
    async fn test_factory_creates_working_fixture() {
        let repo = RepositoryFactory::create(&RepositoryConfig::fixture()).unwrap();
        let set = repo.fetch_spots(&SpotFilters::default()).await.unwrap();
        assert!(!set.is_empty());
    }
}
