//! Domain models - core types of the zone generation pipeline
//!
//! This module contains the canonical data types used throughout the system:
//! - `Neighborhood` - a named boundary polygon read from the input file
//! - `Zone` - a persisted street-aligned cell clipped to a neighborhood
//! - `RoadSegment` - transient road edge used to derive a bearing
//! - `Bearing` - orientation angle in degrees clockwise from north
//! - `PipelineError` - failure taxonomy for the batch run

pub mod error;
pub mod types;

// Re-export commonly used types at module level
pub use error::PipelineError;
pub use types::{Bearing, Neighborhood, RoadSegment, Zone};
