//! Helpers shared across commands.

use spotmap::repository::{RepositoryConfig, RepositoryFactory, RepositoryKind};
use spotmap::session::SessionContext;
use spotmap::spot::Spot;

use crate::error::CliError;

/// Build the repository from the global CLI options.
///
/// With `--api-url` the REST client is used; otherwise the fixture set.
pub fn build_repository(
    api_url: Option<String>,
    token: Option<String>,
) -> Result<RepositoryKind, CliError> {
    let mut session = SessionContext::anonymous();
    if let Some(url) = api_url {
        session = session.with_api_base_url(url);
    }
    if let Some(token) = token {
        session = session.with_auth_token(token);
    }
    let config = RepositoryConfig::from_session(&session);
    RepositoryFactory::create(&config).map_err(CliError::RepositoryCreation)
}

/// One-line summary of a spot for list output.
pub fn format_spot_line(spot: &Spot) -> String {
    let badge = if spot.verified { "verified" } else { "pending " };
    let rating = spot
        .rating
        .map(|r| format!("{:.1}/5", r))
        .unwrap_or_else(|| "  -  ".to_string());
    format!(
        "{:>6}  [{}]  {}  {}  ({:.4}, {:.4})",
        spot.id,
        badge,
        rating,
        spot.name,
        spot.position.lat(),
        spot.position.lon()
    )
}
