//! CLI command implementations
//!
//! - `serve` - configuration loading and server startup

pub mod serve;

pub use serve::*;
