//! Batch orchestrator for the zone generation run
//!
//! Sequential flow: load boundaries, then for each neighborhood in load
//! order estimate a road bearing (throttled), generate the rotated grid,
//! clip cells, and buffer the resulting zones; one transactional replace
//! writes the whole generation at the end. Neighborhoods are processed
//! one at a time - the tile service is rate-limited globally, so there
//! is no parallel fan-out.

use crate::domain::{Neighborhood, Zone};
use crate::infra::Config;
use crate::io::boundaries;
use crate::io::store::ZoneStore;
use crate::io::tilequery::BearingSource;
use crate::services::{bearing, clipper, grid, throttle::Throttle};
use anyhow::Result;
use chrono::{DateTime, Utc};
use geo::Centroid;
use tracing::info;

/// Totals for one completed run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub neighborhoods: usize,
    pub zones_written: usize,
    /// Neighborhoods that fell back to zero rotation
    pub without_bearing: usize,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            neighborhoods = %self.neighborhoods,
            zones = %self.zones_written,
            without_bearing = %self.without_bearing,
            "run_complete"
        );
    }
}

pub struct Pipeline {
    config: Config,
    source: Box<dyn BearingSource>,
    store: ZoneStore,
}

impl Pipeline {
    pub fn new(config: Config, source: Box<dyn BearingSource>, store: ZoneStore) -> Self {
        Self { config, source, store }
    }

    /// Execute one full generation run.
    ///
    /// Fatal errors: missing/malformed boundary file (before any network
    /// or store activity) and a rejected replace transaction. Bearing
    /// estimation failures are absorbed per neighborhood.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let neighborhoods = boundaries::load(self.config.boundaries_file())?;
        info!(
            count = %neighborhoods.len(),
            file = %self.config.boundaries_file(),
            "boundaries_loaded"
        );

        // One timestamp for the whole generation
        let created_at = Utc::now();
        let mut throttle = Throttle::new(self.config.throttle_min_interval_ms());
        let mut zones: Vec<Zone> = Vec::new();
        let mut without_bearing = 0usize;

        for neighborhood in &neighborhoods {
            if !self.process_neighborhood(neighborhood, &mut throttle, created_at, &mut zones).await
            {
                without_bearing += 1;
            }
        }

        let zones_written = self.store.replace_all(&zones)?;

        let summary = RunSummary {
            neighborhoods: neighborhoods.len(),
            zones_written,
            without_bearing,
        };
        summary.log();
        Ok(summary)
    }

    /// Buffer zones for one neighborhood; returns false when the bearing
    /// was absent and the grid was left unrotated
    async fn process_neighborhood(
        &self,
        neighborhood: &Neighborhood,
        throttle: &mut Throttle,
        created_at: DateTime<Utc>,
        zones: &mut Vec<Zone>,
    ) -> bool {
        let rotation = match neighborhood.boundary.centroid() {
            Some(center) => {
                throttle.wait().await;
                bearing::estimate(
                    self.source.as_ref(),
                    center,
                    self.config.search_radius_m(),
                    self.config.tilequery_limit(),
                )
                .await
            }
            // A boundary with no centroid has no area; the grid below
            // comes back empty as well
            None => None,
        };

        let cells = grid::generate(&neighborhood.boundary, self.config.cell_size_km(), rotation);

        let mut sequence = 0usize;
        for cell in &cells {
            if let Some(ring) = clipper::clip(cell, &neighborhood.boundary) {
                sequence += 1;
                let coords = ring.coords().map(|c| [c.x, c.y]).collect();
                zones.push(Zone::new(&neighborhood.name, sequence, coords, created_at));
            }
        }

        info!(
            neighborhood = %neighborhood.name,
            cells = %cells.len(),
            zones = %sequence,
            bearing = %rotation.map(|b| b.to_string()).unwrap_or_else(|| "absent".to_string()),
            "neighborhood_processed"
        );
        rotation.is_some()
    }
}
