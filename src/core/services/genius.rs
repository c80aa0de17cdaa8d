use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, SearchError, VerseenError};

/// Hit type the provider uses for songs (other types: albums, artists, ...)
pub const SONG_HIT_TYPE: &str = "song";

const UNKNOWN_RELEASE_DATE: &str = "Unknown";

/// The song picked out of a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongMatch {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub full_title: String,
    pub url: String,
    pub release_date: String,
    pub pageviews: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SongResult {
    pub id: i64,
    pub title: String,
    pub primary_artist: PrimaryArtist,
    pub full_title: String,
    pub url: String,
    #[serde(default)]
    pub release_date_for_display: Option<String>,
    #[serde(default)]
    pub stats: SongStats,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PrimaryArtist {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SongStats {
    #[serde(default)]
    pub pageviews: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum SearchHit {
    Song(SongResult),
    Other { kind: String },
}

impl SearchHit {
    /// The provider's hit type, e.g. "song" or "album"
    pub fn kind(&self) -> &str {
        match self {
            SearchHit::Song(_) => SONG_HIT_TYPE,
            SearchHit::Other { kind } => kind,
        }
    }
}

/// Search hits in provider relevance order
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    result: serde_json::Value,
}

impl SearchResponse {
    /// Parse a raw search body. Song hits must carry every field a
    /// `SongMatch` needs; other hit types are kept opaque.
    pub fn from_json(body: &str) -> std::result::Result<Self, SearchError> {
        let raw: RawSearchResponse = serde_json::from_str(body)?;

        let hits = raw
            .hits
            .into_iter()
            .map(|hit| {
                if hit.kind == SONG_HIT_TYPE {
                    Ok(SearchHit::Song(serde_json::from_value(hit.result)?))
                } else {
                    Ok(SearchHit::Other { kind: hit.kind })
                }
            })
            .collect::<std::result::Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self { hits })
    }
}

impl From<&SongResult> for SongMatch {
    fn from(result: &SongResult) -> Self {
        SongMatch {
            id: result.id,
            title: result.title.clone(),
            artist: result.primary_artist.name.clone(),
            full_title: result.full_title.clone(),
            url: result.url.clone(),
            release_date: result
                .release_date_for_display
                .clone()
                .unwrap_or_else(|| UNKNOWN_RELEASE_DATE.to_string()),
            pageviews: result.stats.pageviews.unwrap_or(0),
        }
    }
}

/// First song-typed hit, trusting the provider's ordering
pub fn select_best_match(response: &SearchResponse) -> Option<SongMatch> {
    response.hits.iter().find_map(|hit| match hit {
        SearchHit::Song(result) => Some(SongMatch::from(result)),
        SearchHit::Other { .. } => None,
    })
}

/// Client for the Genius search API behind RapidAPI
#[derive(Clone)]
pub struct GeniusClient {
    client: reqwest::Client,
    base_url: String,
    api_host: String,
    api_key: String,
}

impl GeniusClient {
    /// Fails with a configuration error when `RAPID_API_KEY` is not set.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_rapid_api_key()?.to_string();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| VerseenError::Internal(e.into()))?;

        Ok(Self {
            client,
            base_url: config.genius_api_url.trim_end_matches('/').to_string(),
            api_host: config.genius_api_host.clone(),
            api_key,
        })
    }

    pub async fn search(&self, query: &str) -> std::result::Result<SearchResponse, SearchError> {
        info!("Searching Genius for: {}", query);
        let url = format!("{}/search/", self.base_url);

        let response = self.client
            .get(&url)
            .header("x-rapidapi-key", self.api_key.as_str())
            .header("x-rapidapi-host", self.api_host.as_str())
            .query(&[("q", query), ("per_page", "1")])
            .send()
            .await
            .map_err(SearchError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Genius search returned {}: {}", status, body);
            return Err(SearchError::SearchFailed {
                status: Some(status.as_u16()),
                reason: if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let body = response.text().await.map_err(SearchError::from_request)?;
        let parsed = SearchResponse::from_json(&body)?;
        debug!(
            "Genius search returned {} hit(s): [{}]",
            parsed.hits.len(),
            parsed.hits.iter().map(SearchHit::kind).collect::<Vec<_>>().join(", ")
        );

        Ok(parsed)
    }
}
