use clap::{Args, ValueEnum};
use tracing::info;

use crate::core::services::{select_best_match, SongMatch};
use crate::error::Result;
use crate::services::SimpleServices;

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query, e.g. "Hozier Real People"
    #[arg(value_name = "QUERY")]
    query: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

pub async fn execute(args: SearchArgs, services: &SimpleServices) -> Result<()> {
    let client = services.create_genius_client()?;

    info!("Searching for: {}", args.query);
    let response = client.search(&args.query).await?;

    let Some(song) = select_best_match(&response) else {
        info!("No song found matching the query");
        if args.format == OutputFormat::Json {
            println!("null");
        }
        return Ok(());
    };

    match args.format {
        OutputFormat::Json => output_json(&song)?,
        OutputFormat::Table => output_table(&song),
    }

    Ok(())
}

fn output_json(song: &SongMatch) -> Result<()> {
    let json = serde_json::to_string_pretty(song).map_err(anyhow::Error::from)?;
    println!("{}", json);
    Ok(())
}

fn output_table(song: &SongMatch) {
    for (label, value) in table_rows(song) {
        println!("{:<13} {}", label, value);
    }
}

fn table_rows(song: &SongMatch) -> Vec<(&'static str, String)> {
    vec![
        ("Title", song.title.clone()),
        ("Artist", song.artist.clone()),
        ("Full title", song.full_title.clone()),
        ("Released", song.release_date.clone()),
        ("Pageviews", song.pageviews.to_string()),
        ("Genius ID", song.id.to_string()),
        ("URL", song.url.clone()),
    ]
}
