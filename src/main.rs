use clap::{Parser, Subcommand};

mod cli;
mod config;
mod core;
mod error;
mod server;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use cli::*;
use config::Config;
use error::Result;
use services::SimpleServices;

#[derive(Parser)]
#[command(name = "verseen")]
#[command(about = "Find song lyrics and ask an LLM what they mean")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interpretation HTTP API
    Serve(serve::ServeArgs),

    /// Search for a song and show the best match
    Search(search::SearchArgs),

    /// Print the cleaned lyrics of a song
    Lyrics(lyrics::LyricsArgs),

    /// Interpret lyrics read from a file or stdin
    Interpret(interpret::InterpretArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::init_logging(cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;
    let services = SimpleServices::new(config);

    match cli.command {
        Commands::Serve(args) => serve::execute(args, &services).await,
        Commands::Search(args) => search::execute(args, &services).await,
        Commands::Lyrics(args) => lyrics::execute(args, &services).await,
        Commands::Interpret(args) => interpret::execute(args, &services).await,
    }
}
