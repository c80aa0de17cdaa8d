//! Utility modules for common functionality
//!
//! - `logging`: tracing subscriber setup shared by every command

pub mod logging;
