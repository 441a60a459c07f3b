//! Services - the zone generation pipeline stages
//!
//! This module contains the core business logic:
//! - `pipeline` - Batch orchestrator (load, estimate, grid, clip, persist)
//! - `bearing` - Road bearing estimation and circular mean aggregation
//! - `grid` - Rotated square grid generation over a boundary
//! - `clipper` - Cell clipping against the neighborhood boundary
//! - `throttle` - Minimum spacing between tile query calls

pub mod bearing;
pub mod clipper;
pub mod grid;
pub mod pipeline;
pub mod throttle;

// Re-export commonly used types
pub use pipeline::{Pipeline, RunSummary};
