use std::sync::Arc;
use tracing::info;

use crate::core::lyrics::LyricsSource;
use crate::core::services::genius::{select_best_match, GeniusClient, SongMatch};
use crate::error::Result;

/// Free-text query to cleaned lyrics: search, take the top song, scrape it.
pub struct LyricsResolver {
    genius: GeniusClient,
    source: Arc<dyn LyricsSource>,
}

impl LyricsResolver {
    pub fn new(genius: GeniusClient, source: Arc<dyn LyricsSource>) -> Self {
        Self { genius, source }
    }

    pub async fn find_song(&self, query: &str) -> Result<Option<SongMatch>> {
        let response = self.genius.search(query).await?;
        Ok(select_best_match(&response))
    }

    pub async fn fetch_lyrics(&self, url: &str) -> Result<String> {
        Ok(self.source.fetch_lyrics(url).await?)
    }

    /// `Ok(None)` when the search has no song-typed hit.
    pub async fn resolve(&self, query: &str) -> Result<Option<(SongMatch, String)>> {
        let Some(song) = self.find_song(query).await? else {
            info!("No song found for: {}", query);
            return Ok(None);
        };

        info!("Found song: {} by {}", song.title, song.artist);
        let lyrics = self.fetch_lyrics(&song.url).await?;

        Ok(Some((song, lyrics)))
    }
}
