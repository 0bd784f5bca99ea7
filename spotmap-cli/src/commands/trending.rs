//! Trending command - list the most popular verified spots.

use clap::Args;

use spotmap::repository::{RepositoryKind, SpotRepository};

use super::common::format_spot_line;
use crate::error::CliError;

/// Arguments for the trending command.
#[derive(Args)]
pub struct TrendingArgs {
    /// Show at most this many spots
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Run the trending command.
pub async fn run(repository: &RepositoryKind, args: TrendingArgs) -> Result<(), CliError> {
    let mut spots = repository.fetch_trending().await?;
    if let Some(limit) = args.limit {
        spots.truncate(limit);
    }

    if spots.is_empty() {
        println!("Nothing is trending right now.");
        return Ok(());
    }

    println!("Trending spots:");
    for spot in &spots {
        println!("{}", format_spot_line(spot));
    }
    Ok(())
}
