pub mod operations;
pub mod runner;
pub mod status;

// Public API - curated exports only
pub mod api;

pub use api::*;
