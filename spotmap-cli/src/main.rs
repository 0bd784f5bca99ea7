//! spotmap CLI - Command-line client for browsing and searching spots.
//!
//! This binary provides a terminal interface to the spotmap library:
//! search the spot catalogue, inspect a single spot, list what is
//! trending, or ask the recommendation assistant. Without `--api-url` it
//! runs against the built-in fixture data.

use clap::{Parser, Subcommand};

mod commands;
mod error;

use commands::{chat, search, show, trending};

#[derive(Parser)]
#[command(name = "spotmap")]
#[command(about = "Browse and search community food spots", long_about = None)]
#[command(version = spotmap::VERSION)]
struct Cli {
    /// Base URL of the spots API (fixture data is used when omitted)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token for authenticated requests
    #[arg(long, global = true)]
    token: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the spot catalogue
    Search(search::SearchArgs),
    /// Show one spot in detail
    Show(show::ShowArgs),
    /// Ask the recommendation assistant
    Chat(chat::ChatArgs),
    /// List the most popular verified spots
    Trending(trending::TrendingArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logging_guard = match spotmap::logging::init_logging(
        &cli.log_dir,
        spotmap::logging::default_log_file(),
        cli.verbose,
    ) {
        Ok(guard) => guard,
        Err(e) => error::CliError::LoggingInit(e.to_string()).exit(),
    };

    tracing::info!(version = spotmap::VERSION, "spotmap CLI starting");

    let repository = match commands::common::build_repository(cli.api_url, cli.token) {
        Ok(repo) => repo,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Command::Search(args) => search::run(&repository, args).await,
        Command::Show(args) => show::run(&repository, args).await,
        Command::Chat(args) => chat::run(&repository, args).await,
        Command::Trending(args) => trending::run(&repository, args).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
