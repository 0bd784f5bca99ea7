//! Narrow async HTTP seam for the remote repository.
//!
//! Keeping the HTTP surface to two verbs makes the remote repository
//! testable with an in-memory client and keeps reqwest out of every other
//! module.

use std::future::Future;
use std::time::Duration;

use super::types::RepositoryError;

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Async HTTP operations needed by [`super::RemoteRepository`].
pub trait AsyncHttpClient: Send + Sync {
    /// GET `url`, optionally with a bearer token, returning the body.
    fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<Vec<u8>, RepositoryError>> + Send;

    /// POST a JSON body to `url`, optionally with a bearer token.
    fn post_json(
        &self,
        url: &str,
        body: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<Vec<u8>, RepositoryError>> + Send;
}

/// Real HTTP client backed by reqwest.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RepositoryError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<Vec<u8>, RepositoryError> {
        let request = match bearer {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryError::Http(format!(
                "HTTP {} from {}",
                status,
                response.url()
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| RepositoryError::Http(format!("Failed to read response: {}", e)))
    }
}

impl AsyncHttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<Vec<u8>, RepositoryError> {
        self.send(self.client.get(url), bearer).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &str,
        bearer: Option<&str>,
    ) -> Result<Vec<u8>, RepositoryError> {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string());
        self.send(request, bearer).await
    }
}
