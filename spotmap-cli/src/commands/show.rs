//! Show command - display a single spot in detail.

use clap::Args;

use spotmap::repository::{RepositoryKind, SpotRepository};
use spotmap::spot::SpotId;

use crate::error::CliError;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Identity of the spot to show
    pub id: String,
}

/// Run the show command.
pub async fn run(repository: &RepositoryKind, args: ShowArgs) -> Result<(), CliError> {
    let spot = repository.fetch_spot(&SpotId::new(args.id)).await?;

    println!("{}", spot.name);
    println!("  id:          {}", spot.id);
    println!(
        "  location:    {:.4}, {:.4}",
        spot.position.lat(),
        spot.position.lon()
    );
    println!(
        "  status:      {}",
        if spot.verified {
            "verified"
        } else {
            "pending verification"
        }
    );
    if let Some(rating) = spot.rating {
        println!("  rating:      {:.1}/5", rating);
    }
    if let Some(count) = spot.verification_count {
        println!("  votes:       {}", count);
    }
    println!("  source:      {}", spot.data_source);
    println!("  submitted:   {} by {}", spot.created_at.format("%Y-%m-%d"), spot.submitted_by);
    println!();
    println!("{}", spot.description);
    Ok(())
}
