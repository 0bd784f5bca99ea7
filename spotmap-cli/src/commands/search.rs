//! Search command - list spots matching filter criteria.

use clap::Args;

use spotmap::repository::{RepositoryKind, SpotRepository};
use spotmap::spot::SpotFilters;

use super::common::format_spot_line;
use crate::error::CliError;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text search over spot names and descriptions
    pub query: Option<String>,

    /// Only include community-verified spots
    #[arg(long)]
    pub verified_only: bool,

    /// Minimum rating, inclusive (0-5)
    #[arg(long)]
    pub min_rating: Option<f32>,
}

/// Run the search command.
pub async fn run(repository: &RepositoryKind, args: SearchArgs) -> Result<(), CliError> {
    let filters = SpotFilters {
        search: args.query,
        verified_only: args.verified_only,
        rating_min: args.min_rating,
        bounds: None,
    };

    let set = repository.fetch_spots(&filters).await?;

    if set.is_empty() {
        println!("No spots matched.");
        return Ok(());
    }

    for spot in set.iter() {
        println!("{}", format_spot_line(spot));
    }
    println!();
    println!(
        "{} spot{} found",
        set.len(),
        if set.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
