//! Explicit session context.
//!
//! Endpoint and credential configuration is passed to the components that
//! need it rather than read from ambient global state. Built once at
//! startup and threaded through the repository factory.

/// Session-scoped configuration for talking to the spots API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    api_base_url: Option<String>,
    auth_token: Option<String>,
}

impl SessionContext {
    /// An anonymous session with no configured endpoint.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is stripped.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_base_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set the bearer token sent with authenticated requests.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// The configured API base URL, if any.
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    /// The bearer token for the current session, if authenticated.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}
