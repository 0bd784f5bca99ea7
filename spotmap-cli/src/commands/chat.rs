//! Chat command - ask the recommendation assistant.

use clap::Args;

use spotmap::repository::{RepositoryKind, SpotRepository};

use super::common::format_spot_line;
use crate::error::CliError;

/// Arguments for the chat command.
#[derive(Args)]
pub struct ChatArgs {
    /// The question to ask, e.g. "where can I get amala in Mushin?"
    #[arg(trailing_var_arg = true, required = true)]
    pub query: Vec<String>,
}

/// Run the chat command.
pub async fn run(repository: &RepositoryKind, args: ChatArgs) -> Result<(), CliError> {
    let query = args.query.join(" ");
    let reply = repository.chat(&query).await?;

    println!("{}", reply.response_text);

    if !reply.suggested_spots.is_empty() {
        println!();
        println!("Suggested spots:");
        for spot in &reply.suggested_spots {
            println!("{}", format_spot_line(spot));
        }
    }
    Ok(())
}
