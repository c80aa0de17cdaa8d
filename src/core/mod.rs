//! Core functionality modules
//!
//! This module contains the lyrics pipeline:
//! - `services`: Genius search and Groq interpretation clients
//! - `lyrics`: Lyrics page scraping and text cleanup
//! - `resolver`: Query-to-lyrics composition of the above

pub mod lyrics;
pub mod resolver;
pub mod services;

pub use lyrics::{LyricsScraper, LyricsSource};
pub use resolver::LyricsResolver;
