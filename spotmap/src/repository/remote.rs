//! REST-backed spot repository.

use serde::Serialize;
use tracing::{debug, warn};

use super::http::AsyncHttpClient;
use super::types::{
    ChatReply, RepositoryError, SpotRepository, SpotSubmission, VerificationVote,
};
use crate::session::SessionContext;
use crate::spot::{Spot, SpotFilters, SpotId, SpotSet};

/// Spot repository talking to the remote REST API.
///
/// Generic over the HTTP seam so tests can drive it with an in-memory
/// client. Credentials and endpoint come from the [`SessionContext`]
/// passed at construction, never from ambient state.
pub struct RemoteRepository<C: AsyncHttpClient> {
    client: C,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query_text: &'a str,
}

impl<C: AsyncHttpClient> RemoteRepository<C> {
    /// Create a repository for the session's configured endpoint.
    ///
    /// Fails if the session has no API base URL; callers that want the
    /// fixture fallback should go through the factory instead.
    pub fn new(client: C, session: &SessionContext) -> Result<Self, RepositoryError> {
        let base_url = session
            .api_base_url()
            .ok_or_else(|| RepositoryError::Http("No API base URL configured".to_string()))?
            .to_string();
        Ok(Self {
            client,
            base_url,
            auth_token: session.auth_token().map(str::to_string),
        })
    }

    fn bearer(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    fn spots_url(&self, filters: &SpotFilters) -> Result<String, RepositoryError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &filters.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }
        if filters.verified_only {
            params.push(("verified_only", "true".to_string()));
        }
        if let Some(min) = filters.rating_min {
            params.push(("rating_min", min.to_string()));
        }

        let url = format!("{}/spots/", self.base_url);
        let url = reqwest::Url::parse_with_params(&url, &params)
            .map_err(|e| RepositoryError::Http(format!("Invalid URL '{}': {}", url, e)))?;
        Ok(url.to_string())
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, RepositoryError> {
        serde_json::from_slice(body)
            .map_err(|e| RepositoryError::InvalidResponse(e.to_string()))
    }
}

impl<C: AsyncHttpClient> SpotRepository for RemoteRepository<C> {
    async fn fetch_spots(&self, filters: &SpotFilters) -> Result<SpotSet, RepositoryError> {
        let url = self.spots_url(filters)?;
        debug!(url = %url, "Fetching spots");

        let body = self.client.get(&url, self.bearer()).await.map_err(|e| {
            warn!(error = %e, "Spot fetch failed");
            e
        })?;

        let spots: Vec<Spot> = Self::decode(&body)?;
        debug!(count = spots.len(), "Spots fetched");
        Ok(SpotSet::new(filters.clone(), spots))
    }

    async fn fetch_spot(&self, id: &SpotId) -> Result<Spot, RepositoryError> {
        let url = format!("{}/spots/{}/", self.base_url, id);
        let body = self.client.get(&url, self.bearer()).await?;
        Self::decode(&body)
    }

    async fn submit_spot(&self, submission: &SpotSubmission) -> Result<Spot, RepositoryError> {
        submission.validate()?;
        let url = format!("{}/spots/", self.base_url);
        let body = serde_json::to_string(submission)
            .map_err(|e| RepositoryError::InvalidSubmission(e.to_string()))?;
        let response = self.client.post_json(&url, &body, self.bearer()).await?;
        Self::decode(&response)
    }

    async fn verify_spot(&self, vote: &VerificationVote) -> Result<(), RepositoryError> {
        let url = format!("{}/verify-spot/", self.base_url);
        let body = serde_json::to_string(vote)
            .map_err(|e| RepositoryError::InvalidSubmission(e.to_string()))?;
        self.client.post_json(&url, &body, self.bearer()).await?;
        Ok(())
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, RepositoryError> {
        let url = format!("{}/chat/", self.base_url);
        let body = serde_json::to_string(&ChatRequest {
            query_text: message,
        })
        .map_err(|e| RepositoryError::InvalidSubmission(e.to_string()))?;
        let response = self.client.post_json(&url, &body, self.bearer()).await?;
        Self::decode(&response)
    }

    async fn fetch_trending(&self) -> Result<Vec<Spot>, RepositoryError> {
        let url = format!("{}/trending-spots/", self.base_url);
        debug!(url = %url, "Fetching trending spots");
        let body = self.client.get(&url, self.bearer()).await?;
        Self::decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::super::http::tests::MockHttpClient;
    use super::*;
    use crate::test_support::spot;

    fn session() -> SessionContext {
        SessionContext::anonymous()
            .with_api_base_url("https://api.example.com/")
            .with_auth_token("tok")
    }

    #[test]
    fn test_requires_base_url() {
        let client = MockHttpClient::replying("[]");
        let result = RemoteRepository::new(client, &SessionContext::anonymous());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_spots_builds_query_and_tags_set() {
        let payload = serde_json::to_string(&vec![spot("1", "A", 6.5244, 3.3792, true)]).unwrap();
        let client = MockHttpClient::replying(&payload);
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let filters = SpotFilters {
            search: Some("amala".to_string()),
            verified_only: true,
            ..Default::default()
        };
        let set = repo.fetch_spots(&filters).await.unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.filters(), &filters);

        let requests = repo.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://api.example.com/spots/?search=amala&verified_only=true"
        );
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_fetch_spots_http_error_propagates() {
        let client = MockHttpClient::failing("connection refused");
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let result = repo.fetch_spots(&SpotFilters::default()).await;
        assert!(matches!(result, Err(RepositoryError::Http(_))));
    }

    #[tokio::test]
    async fn test_fetch_spots_rejects_malformed_body() {
        let client = MockHttpClient::replying("not json");
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let result = repo.fetch_spots(&SpotFilters::default()).await;
        assert!(matches!(result, Err(RepositoryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_submit_spot_validates_before_sending() {
        let client = MockHttpClient::replying("{}");
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let bad = SpotSubmission {
            name: String::new(),
            description: "d".to_string(),
            lat: 6.5,
            lng: 3.3,
            photo_url: String::new(),
        };
        assert!(repo.submit_spot(&bad).await.is_err());
        assert!(repo.client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_spot_posts_vote() {
        let client = MockHttpClient::replying("{}");
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let vote = VerificationVote {
            spot_id: SpotId::from("2"),
            vote: crate::repository::Vote::Approve,
            comment: Some("looks right".to_string()),
        };
        repo.verify_spot(&vote).await.unwrap();

        let requests = repo.client.requests.lock().unwrap();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "https://api.example.com/verify-spot/");
        assert!(requests[0].body.as_ref().unwrap().contains("approve"));
    }

    #[tokio::test]
    async fn test_fetch_trending_hits_trending_endpoint() {
        let payload = serde_json::to_string(&vec![spot("2", "B", 6.5355, 3.3516, true)]).unwrap();
        let client = MockHttpClient::replying(&payload);
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let trending = repo.fetch_trending().await.unwrap();
        assert_eq!(trending.len(), 1);

        let requests = repo.client.requests.lock().unwrap();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "https://api.example.com/trending-spots/");
    }

    #[tokio::test]
    async fn test_chat_wraps_query_text() {
        let payload = r#"{"response_text":"try these","suggested_spots":[]}"#;
        let client = MockHttpClient::replying(payload);
        let repo = RemoteRepository::new(client, &session()).unwrap();

        let reply = repo.chat("best amala near me").await.unwrap();
        assert_eq!(reply.response_text, "try these");

        let requests = repo.client.requests.lock().unwrap();
        assert!(requests[0]
            .body
            .as_ref()
            .unwrap()
            .contains("best amala near me"));
    }
}
