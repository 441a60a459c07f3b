//! Shared types for the zone generation pipeline

use chrono::{DateTime, Utc};
use geo::{Coord, MultiPolygon};

/// Orientation angle in degrees clockwise from north, normalized to [0, 360)
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Bearing(f64);

impl Bearing {
    /// Wrap an angle in degrees into [0, 360)
    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees.rem_euclid(360.0))
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Bearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A named boundary polygon read once per run from the input file
#[derive(Debug, Clone)]
pub struct Neighborhood {
    pub name: String,
    /// Closed boundary, possibly multi-ring
    pub boundary: MultiPolygon<f64>,
}

/// Transient road edge returned by the tile query service.
/// Only used to derive a bearing; discarded after aggregation.
#[derive(Debug, Clone, Copy)]
pub struct RoadSegment {
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

/// A persisted polygon cell representing one gameplay unit within a neighborhood
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: String,
    /// Derived as "{neighborhood} - Zone {n}", 1-based per neighborhood
    pub name: String,
    pub neighborhood_name: String,
    /// Ordered coordinate pairs forming a single closed ring
    pub boundary_coords: Vec<[f64; 2]>,
    pub created_at: DateTime<Utc>,
}

impl Zone {
    pub fn new(
        neighborhood_name: &str,
        sequence: usize,
        boundary_coords: Vec<[f64; 2]>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            name: format!("{} - Zone {}", neighborhood_name, sequence),
            neighborhood_name: neighborhood_name.to_string(),
            boundary_coords,
            created_at,
        }
    }
}
