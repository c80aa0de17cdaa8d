use clap::Args;
use tracing::info;

use crate::config::validation::ConfigValidator;
use crate::core::lyrics::LyricsSource;
use crate::error::Result;
use crate::services::SimpleServices;

#[derive(Args)]
pub struct LyricsArgs {
    /// Search query; the top song hit is scraped
    #[arg(value_name = "QUERY", required_unless_present = "url", conflicts_with = "url")]
    query: Option<String>,

    /// Scrape this lyrics page directly, skipping the search
    #[arg(long)]
    url: Option<String>,
}

pub async fn execute(args: LyricsArgs, services: &SimpleServices) -> Result<()> {
    if let Some(url) = args.url {
        ConfigValidator::validate_url(&url, "lyrics page")?;

        // A direct page fetch needs no search credentials
        let scraper = services.create_lyrics_scraper()?;
        let lyrics = scraper.fetch_lyrics(&url).await?;
        println!("{}", lyrics);
        return Ok(());
    }

    let query = args.query.unwrap_or_default();
    let resolver = services.create_resolver()?;

    match resolver.resolve(&query).await? {
        Some((song, lyrics)) => {
            info!("Lyrics for {} ({})", song.full_title, song.url);
            println!("{}", lyrics);
        }
        None => info!("No song found matching the query"),
    }

    Ok(())
}
