//! Service layer
//!
//! `SimpleServices` owns the loaded configuration and builds the pipeline
//! clients on demand, so commands that never touch a stage never need its
//! credentials.

pub mod simple_container;

pub use simple_container::SimpleServices;
