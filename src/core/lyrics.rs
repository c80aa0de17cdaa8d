//! Lyrics page scraping and cleanup
//!
//! `LyricsSource` is the narrow seam callers depend on; `LyricsScraper` is
//! the Genius implementation, coupled to the provider's page markup through
//! the two container selectors below.

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{LyricsError, Result, VerseenError};

/// Genius rejects default/script user agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const PRIMARY_CONTAINER_SELECTOR: &str = "div.Lyrics__Container";
const FALLBACK_CONTAINER_SELECTOR: &str = r#"div[data-lyrics-container="true"]"#;

#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Fetch the page at `url` and return its cleaned lyrics text
    async fn fetch_lyrics(&self, url: &str) -> std::result::Result<String, LyricsError>;
}

#[derive(Clone)]
pub struct LyricsScraper {
    client: reqwest::Client,
}

impl LyricsScraper {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| VerseenError::Internal(e.into()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LyricsSource for LyricsScraper {
    async fn fetch_lyrics(&self, url: &str) -> std::result::Result<String, LyricsError> {
        info!("Fetching lyrics from: {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Lyrics page {} returned {}", url, status);
            return Err(LyricsError::FetchFailed(status.as_u16()));
        }

        let html = response.text().await?;
        debug!("Fetched {} bytes of HTML", html.len());

        // `Html` is !Send, so parsing stays in a sync helper
        extract_lyrics(&html)
    }
}

/// Pull the lyrics out of a Genius lyrics page.
pub fn extract_lyrics(html: &str) -> std::result::Result<String, LyricsError> {
    let document = Html::parse_document(html);

    let mut containers: Vec<ElementRef<'_>> =
        document.select(container_selector(PRIMARY_CONTAINER_SELECTOR)).collect();
    if containers.is_empty() {
        debug!("No primary lyrics containers, trying the data attribute marker");
        containers = document.select(container_selector(FALLBACK_CONTAINER_SELECTOR)).collect();
    }

    if containers.is_empty() {
        return Err(LyricsError::LyricsContainerNotFound);
    }

    let mut lyrics = String::new();
    for container in &containers {
        lyrics.push_str(container_text(container).trim());
        lyrics.push('\n');
    }

    let cleaned = clean_lyrics(lyrics.trim());
    if cleaned.is_empty() {
        return Err(LyricsError::EmptyLyrics);
    }

    debug!("Extracted {} lyric line(s) from {} container(s)", cleaned.lines().count(), containers.len());
    Ok(cleaned)
}

/// Normalize scraped lyrics: trim every line, drop blank lines, and never
/// leave more than one blank line in a row.
pub fn clean_lyrics(lyrics: &str) -> String {
    let cleaned = lyrics
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    excess_newlines().replace_all(&cleaned, "\n\n").into_owned()
}

fn excess_newlines() -> &'static Regex {
    static EXCESS_NEWLINES: OnceLock<Regex> = OnceLock::new();
    EXCESS_NEWLINES.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline pattern"))
}

fn container_selector(css: &'static str) -> &'static Selector {
    static PRIMARY: OnceLock<Selector> = OnceLock::new();
    static FALLBACK: OnceLock<Selector> = OnceLock::new();

    let cell = if css == PRIMARY_CONTAINER_SELECTOR { &PRIMARY } else { &FALLBACK };
    cell.get_or_init(|| Selector::parse(css).expect("valid lyrics container selector"))
}

/// Text of a container with `<br>` read as a newline and every text node on
/// its own line.
fn container_text(container: &ElementRef<'_>) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in container.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    matches!(ancestor.value(), Node::Element(el) if el.name() == "script" || el.name() == "style")
                });
                if !hidden {
                    pieces.push(text);
                }
            }
            Node::Element(el) if el.name() == "br" => pieces.push("\n"),
            _ => {}
        }
    }

    pieces.join("\n")
}
