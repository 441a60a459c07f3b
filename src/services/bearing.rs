//! Road bearing estimation
//!
//! A neighborhood's representative orientation is the circular mean of
//! the initial bearings of every road segment found near its centroid.
//! Bearings wrap at 0/360, so a naive arithmetic mean is meaningless
//! near north (1 and 359 would average to 180); averaging unit vectors
//! handles the wraparound.

use crate::domain::Bearing;
use crate::io::tilequery::BearingSource;
use geo::{Coord, Point};
use tracing::warn;

/// Initial great-circle bearing from `start` to `end`,
/// in degrees clockwise from north on [0, 360)
pub fn initial_bearing(start: Coord<f64>, end: Coord<f64>) -> f64 {
    let lat1 = start.y.to_radians();
    let lat2 = end.y.to_radians();
    let delta_lon = (end.x - start.x).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Circular mean of a set of bearings in degrees, absent for an empty set
pub fn circular_mean(bearings: &[f64]) -> Option<Bearing> {
    if bearings.is_empty() {
        return None;
    }

    let (sin_sum, cos_sum) = bearings.iter().fold((0.0, 0.0), |(s, c), b| {
        let radians = b.to_radians();
        (s + radians.sin(), c + radians.cos())
    });
    let n = bearings.len() as f64;
    Some(Bearing::from_degrees((sin_sum / n).atan2(cos_sum / n).to_degrees()))
}

/// Estimate the representative road orientation around `center`.
///
/// Absent means "use zero rotation": no source configured, no road data,
/// or a transport failure (logged as a warning, never fatal).
pub async fn estimate(
    source: &dyn BearingSource,
    center: Point<f64>,
    radius_m: u32,
    limit: u32,
) -> Option<Bearing> {
    let segments = match source.road_segments(center, radius_m, limit).await {
        Ok(segments) => segments,
        Err(e) => {
            warn!(error = %e, lon = %center.x(), lat = %center.y(), "tilequery_failed");
            return None;
        }
    };

    let bearings: Vec<f64> = segments
        .iter()
        .map(|segment| initial_bearing(segment.start, segment.end))
        .collect();
    circular_mean(&bearings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PipelineError, RoadSegment};
    use async_trait::async_trait;

    struct FixedSegments(Vec<RoadSegment>);

    #[async_trait]
    impl BearingSource for FixedSegments {
        async fn road_segments(
            &self,
            _center: Point<f64>,
            _radius_m: u32,
            _limit: u32,
        ) -> Result<Vec<RoadSegment>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl BearingSource for FailingSource {
        async fn road_segments(
            &self,
            _center: Point<f64>,
            _radius_m: u32,
            _limit: u32,
        ) -> Result<Vec<RoadSegment>, PipelineError> {
            Err(PipelineError::ExternalServiceUnavailable("connection refused".to_string()))
        }
    }

    /// Distance of a bearing from north, accounting for wraparound
    fn from_north(bearing: Bearing) -> f64 {
        let d = bearing.degrees();
        d.min(360.0 - d)
    }

    #[test]
    fn test_initial_bearing_cardinal_directions() {
        let origin = Coord { x: 0.0, y: 0.0 };
        assert!((initial_bearing(origin, Coord { x: 0.0, y: 1.0 }) - 0.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Coord { x: 1.0, y: 0.0 }) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Coord { x: 0.0, y: -1.0 }) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(origin, Coord { x: -1.0, y: 0.0 }) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_circular_mean_handles_wraparound() {
        // Symmetric about north: must be ~0, never 180
        let mean = circular_mean(&[2.0, 358.0]).unwrap();
        assert!(from_north(mean) < 1e-9);

        let mean = circular_mean(&[1.0, 359.0]).unwrap();
        assert!(from_north(mean) < 1e-9);
    }

    #[test]
    fn test_circular_mean_plain_average_away_from_north() {
        let mean = circular_mean(&[10.0, 20.0, 30.0]).unwrap();
        assert!((mean.degrees() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_circular_mean_empty_is_absent() {
        assert!(circular_mean(&[]).is_none());
    }

    #[tokio::test]
    async fn test_estimate_no_segments_is_absent() {
        let source = FixedSegments(Vec::new());
        let bearing = estimate(&source, Point::new(0.0, 0.0), 500, 50).await;
        assert!(bearing.is_none());
    }

    #[tokio::test]
    async fn test_estimate_transport_failure_is_absent() {
        let bearing = estimate(&FailingSource, Point::new(0.0, 0.0), 500, 50).await;
        assert!(bearing.is_none());
    }

    #[tokio::test]
    async fn test_estimate_aggregates_segment_bearings() {
        // Two segments both heading due east
        let source = FixedSegments(vec![
            RoadSegment { start: Coord { x: 0.0, y: 0.0 }, end: Coord { x: 0.01, y: 0.0 } },
            RoadSegment { start: Coord { x: 0.0, y: 0.1 }, end: Coord { x: 0.01, y: 0.1 } },
        ]);
        let bearing = estimate(&source, Point::new(0.0, 0.0), 500, 50).await.unwrap();
        assert!((bearing.degrees() - 90.0).abs() < 0.1);
    }
}
