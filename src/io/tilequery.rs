//! Road geometry lookup via a Mapbox-style tile query service
//!
//! The service is an optional collaborator: when no access token is
//! configured the `DisabledBearingSource` is selected at startup and
//! every neighborhood falls back to zero rotation. Transport failures
//! surface as `ExternalServiceUnavailable` and are absorbed by the
//! bearing estimator; they never abort a run.

use crate::domain::{PipelineError, RoadSegment};
use async_trait::async_trait;
use geo::{Coord, Point};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Capability seam for road geometry lookups
#[async_trait]
pub trait BearingSource: Send + Sync {
    /// Fetch road segments within `radius_m` meters of `center`,
    /// capped at `limit` road features.
    async fn road_segments(
        &self,
        center: Point<f64>,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<RoadSegment>, PipelineError>;
}

/// Selected when no access token is configured
pub struct DisabledBearingSource;

#[async_trait]
impl BearingSource for DisabledBearingSource {
    async fn road_segments(
        &self,
        _center: Point<f64>,
        _radius_m: u32,
        _limit: u32,
    ) -> Result<Vec<RoadSegment>, PipelineError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct TilequeryResponse {
    #[serde(default)]
    features: Vec<TilequeryFeature>,
}

#[derive(Debug, Deserialize)]
struct TilequeryFeature {
    geometry: Option<TilequeryGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(dead_code)]
enum TilequeryGeometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    // The service returns point geometries for non-road layers; they
    // carry no orientation and are skipped during extraction.
    Point { coordinates: Vec<f64> },
}

/// Live tile query client
pub struct TilequeryClient {
    client: reqwest::Client,
    base_url: String,
    tileset: String,
    access_token: String,
}

impl TilequeryClient {
    pub fn new(
        base_url: &str,
        tileset: &str,
        access_token: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        // Create the HTTP client once for reuse (connection pooling)
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tileset: tileset.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn query_url(&self, center: Point<f64>) -> String {
        format!(
            "{}/v4/{}/tilequery/{},{}.json",
            self.base_url,
            self.tileset,
            center.x(),
            center.y()
        )
    }
}

#[async_trait]
impl BearingSource for TilequeryClient {
    async fn road_segments(
        &self,
        center: Point<f64>,
        radius_m: u32,
        limit: u32,
    ) -> Result<Vec<RoadSegment>, PipelineError> {
        let response = self
            .client
            .get(self.query_url(center))
            .query(&[
                ("radius", radius_m.to_string()),
                ("limit", limit.to_string()),
                ("geometry", "linestring".to_string()),
                ("layers", "road".to_string()),
                ("access_token", self.access_token.clone()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::ExternalServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::ExternalServiceUnavailable(format!(
                "tilequery returned status {}",
                status.as_u16()
            )));
        }

        let body: TilequeryResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ExternalServiceUnavailable(e.to_string()))?;

        let segments = extract_segments(&body);
        debug!(
            features = %body.features.len(),
            segments = %segments.len(),
            lon = %center.x(),
            lat = %center.y(),
            "tilequery_response"
        );
        Ok(segments)
    }
}

/// Split every returned road geometry into consecutive coordinate pairs
fn extract_segments(response: &TilequeryResponse) -> Vec<RoadSegment> {
    let mut segments = Vec::new();
    for feature in &response.features {
        match &feature.geometry {
            Some(TilequeryGeometry::LineString { coordinates }) => {
                push_line_segments(coordinates, &mut segments);
            }
            Some(TilequeryGeometry::MultiLineString { coordinates }) => {
                for line in coordinates {
                    push_line_segments(line, &mut segments);
                }
            }
            Some(TilequeryGeometry::Point { .. }) | None => {}
        }
    }
    segments
}

fn push_line_segments(line: &[Vec<f64>], segments: &mut Vec<RoadSegment>) {
    for pair in line.windows(2) {
        if pair[0].len() < 2 || pair[1].len() < 2 {
            continue;
        }
        segments.push(RoadSegment {
            start: Coord { x: pair[0][0], y: pair[0][1] },
            end: Coord { x: pair[1][0], y: pair[1][1] },
        });
    }
}
