//! GPS location traces
//!
//! A trace is the polyline of one rMove trip (`trip_id_location`), built from
//! its timestamped points. The stored line is the points ordered by
//! collection time with repeated vertices dropped.

use chrono::NaiveDateTime;
use core_kernel::spatial::check_point_agreement;
use core_kernel::{Coordinates, SpatialError, Stored, TraceId, TraceShape};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::TravelError;

/// One GPS fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocationPoint {
    pub collected_at: NaiveDateTime,
    /// Metres
    #[validate(range(min = 0.0))]
    pub accuracy: Option<f64>,
    /// Degrees
    #[validate(range(min = 0.0, max = 360.0))]
    pub heading: Option<f64>,
    /// Metres per second
    #[validate(range(min = 0.0))]
    pub speed: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

impl LocationPoint {
    pub fn new(collected_at: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        Self {
            collected_at,
            accuracy: None,
            heading: None,
            speed: None,
            latitude,
            longitude,
            shape: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Supplied point geometry, or one derived from lat/long
    pub fn storage_shape(&self) -> String {
        self.shape
            .clone()
            .unwrap_or_else(|| self.coordinates().to_wkt())
    }

    pub fn check(&self, tolerance: f64) -> Result<(), SpatialError> {
        let coordinates = self.coordinates();
        coordinates.check_range()?;
        match &self.shape {
            Some(shape) => check_point_agreement(shape, &coordinates, tolerance),
            None => Ok(()),
        }
    }
}

/// A trace and its points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LocationTrace {
    pub trip_id_location: TraceId,
    /// WKT `LINESTRING` (or `POINT` for a single distinct vertex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[validate(nested)]
    pub points: Vec<LocationPoint>,
}

impl LocationTrace {
    pub fn new(trip_id_location: TraceId, points: Vec<LocationPoint>) -> Self {
        Self {
            trip_id_location,
            shape: None,
            points,
        }
    }

    pub fn id(&self) -> TraceId {
        self.trip_id_location
    }

    /// True if the points arrive in collection-time order
    pub fn is_time_ordered(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[0].collected_at <= pair[1].collected_at)
    }

    /// Points sorted by collection time; ties keep their input order
    pub fn ordered_points(&self) -> Vec<LocationPoint> {
        let mut points = self.points.clone();
        points.sort_by_key(|point| point.collected_at);
        points
    }

    /// The shape implied by the points
    pub fn derived_shape(&self) -> Option<TraceShape> {
        TraceShape::from_vertices(self.ordered_points().iter().map(LocationPoint::coordinates))
    }

    /// Whether the supplied shape matches the points; None if either is absent
    pub fn shape_matches_points(&self, tolerance: f64) -> Result<Option<bool>, SpatialError> {
        let supplied = match &self.shape {
            Some(wkt) => TraceShape::parse(wkt)?,
            None => return Ok(None),
        };
        Ok(self
            .derived_shape()
            .map(|derived| derived.matches(&supplied, tolerance)))
    }

    /// The geometry to persist: the supplied shape, or one derived from the points
    pub fn storage_shape(&self) -> Result<String, TravelError> {
        if let Some(wkt) = &self.shape {
            TraceShape::parse(wkt)?;
            return Ok(wkt.clone());
        }
        self.derived_shape()
            .map(|shape| shape.to_wkt())
            .ok_or(TravelError::EmptyTrace(self.trip_id_location))
    }
}

/// A trace as persisted: the stored geometry and the points with their ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrace {
    pub trip_id_location: TraceId,
    pub shape: String,
    /// Points in collection-time order
    pub points: Vec<Stored<LocationPoint>>,
}

impl StoredTrace {
    /// Great-circle length of the stored geometry in metres
    pub fn length_meters(&self) -> Result<f64, SpatialError> {
        TraceShape::parse(&self.shape).map(|shape| shape.length_meters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 10, 4)
            .unwrap()
            .and_hms_opt(8, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_line_derived_in_time_order() {
        let trace = LocationTrace::new(
            TraceId::new(1),
            vec![
                LocationPoint::new(at(2), 32.72, -117.12),
                LocationPoint::new(at(0), 32.70, -117.10),
                LocationPoint::new(at(1), 32.71, -117.11),
            ],
        );
        assert!(!trace.is_time_ordered());
        let shape = trace.derived_shape().unwrap();
        let vertices = shape.vertices();
        assert_eq!(vertices[0], Coordinates::new(32.70, -117.10));
        assert_eq!(vertices[2], Coordinates::new(32.72, -117.12));
    }

    #[test]
    fn test_stationary_trace_is_point() {
        let trace = LocationTrace::new(
            TraceId::new(2),
            vec![
                LocationPoint::new(at(0), 32.70, -117.10),
                LocationPoint::new(at(1), 32.70, -117.10),
            ],
        );
        assert!(trace.storage_shape().unwrap().starts_with("POINT"));
    }

    #[test]
    fn test_empty_trace_without_shape_fails() {
        let trace = LocationTrace::new(TraceId::new(3), Vec::new());
        assert!(matches!(trace.storage_shape(), Err(TravelError::EmptyTrace(_))));
        assert_eq!(trace.shape_matches_points(1e-6).unwrap(), None);
    }

    #[test]
    fn test_supplied_shape_compared_to_points() {
        let mut trace = LocationTrace::new(
            TraceId::new(4),
            vec![
                LocationPoint::new(at(0), 32.70, -117.10),
                LocationPoint::new(at(1), 32.71, -117.11),
            ],
        );
        trace.shape = Some("LINESTRING(-117.1 32.7,-117.11 32.71)".to_string());
        assert_eq!(trace.shape_matches_points(1e-6).unwrap(), Some(true));

        trace.shape = Some("LINESTRING(-117.1 32.7,-117.5 32.9)".to_string());
        assert_eq!(trace.shape_matches_points(1e-6).unwrap(), Some(false));
    }
}
