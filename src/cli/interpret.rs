use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::error::{Result, VerseenError};
use crate::services::SimpleServices;

#[derive(Args)]
pub struct InterpretArgs {
    /// Artist name passed to the model as context
    #[arg(short, long)]
    artist: Option<String>,

    /// Read lyrics from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,
}

pub async fn execute(args: InterpretArgs, services: &SimpleServices) -> Result<()> {
    let lyrics = read_lyrics(args.file.as_ref()).await?;
    if lyrics.trim().is_empty() {
        return Err(VerseenError::Validation("lyrics must not be empty".to_string()));
    }
    debug!("Read {} line(s) of lyrics", lyrics.lines().count());

    let interpreter = services.create_interpreter()?;
    let artist = args
        .artist
        .as_deref()
        .map(str::trim)
        .filter(|artist| !artist.is_empty());

    match interpreter.interpret(&lyrics, artist).await? {
        Some(interpretation) => println!("{}", interpretation.interpretation),
        None => info!("The model did not produce an interpretation"),
    }

    Ok(())
}

async fn read_lyrics(file: Option<&PathBuf>) -> Result<String> {
    let lyrics = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read lyrics from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read lyrics from stdin")?;
            buffer
        }
    };

    Ok(lyrics)
}
