//! External services integration
//!
//! This module contains integrations with external APIs:
//! - Genius (via RapidAPI) for song search
//! - Groq chat completions for lyrics interpretation

pub mod genius;
pub mod groq;

pub use genius::{select_best_match, GeniusClient, SongMatch};
pub use groq::{GroqClient, Interpretation, Interpreter};
