use std::sync::Arc;

use crate::config::Config;
use crate::core::services::{GeniusClient, GroqClient, Interpreter};
use crate::core::{LyricsResolver, LyricsScraper, LyricsSource};
use crate::error::Result;

pub struct SimpleServices {
    config: Arc<Config>,
}

impl SimpleServices {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn create_genius_client(&self) -> Result<GeniusClient> {
        GeniusClient::new(&self.config)
    }

    pub fn create_lyrics_scraper(&self) -> Result<LyricsScraper> {
        LyricsScraper::new(self.config.lyrics_timeout())
    }

    pub fn create_resolver(&self) -> Result<LyricsResolver> {
        let source: Arc<dyn LyricsSource> = Arc::new(self.create_lyrics_scraper()?);
        Ok(LyricsResolver::new(self.create_genius_client()?, source))
    }

    pub fn create_interpreter(&self) -> Result<Arc<dyn Interpreter>> {
        Ok(Arc::new(GroqClient::new(&self.config)?))
    }
}
