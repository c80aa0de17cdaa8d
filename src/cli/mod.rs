//! Command Line Interface module
//!
//! One submodule per subcommand. Each exposes a clap `Args` struct and an
//! `execute` function that pulls what it needs from `SimpleServices`.

pub mod interpret;
pub mod lyrics;
pub mod search;
pub mod serve;
