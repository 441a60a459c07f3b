//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `boundaries` - GeoJSON boundary file loader
//! - `tilequery` - HTTP client for the road tile query service
//! - `store` - SQLite persistence for generated zones

pub mod boundaries;
pub mod store;
pub mod tilequery;

// Re-export commonly used types
pub use store::ZoneStore;
pub use tilequery::{BearingSource, DisabledBearingSource, TilequeryClient};
