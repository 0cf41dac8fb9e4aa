//! WGS84 coordinates and the geometry/scalar consistency gate
//!
//! Every geocoded location is stored twice: as scalar latitude/longitude
//! columns and as a PostGIS geometry. The scalar pair is authoritative. A
//! missing geometry is derived from it, and a supplied geometry must encode
//! the same point within [`DEFAULT_TOLERANCE_DEGREES`].
//!
//! Geometries travel as WKT text (`POINT(lng lat)`, `LINESTRING(...)`) in
//! SRID 4326 so they can be compared with the scalar columns directly.

use std::collections::HashSet;

use geo::{Coord, HaversineLength, LineString, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wkt::{ToWkt, TryFromWkt};

/// Spatial reference id of every geometry column
pub const SRID: i32 = 4326;

/// Maximum divergence between a geometry and its scalar coordinates
pub const DEFAULT_TOLERANCE_DEGREES: f64 = 1e-6;

/// Errors raised while reading or checking geometries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),

    #[error("Coordinates out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error(
        "Geometry diverges from coordinates by ({dlat:.9}, {dlng:.9}) degrees, tolerance {tolerance}"
    )]
    Divergent { dlat: f64, dlng: f64, tolerance: f64 },
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Checks that both values are finite and inside the WGS84 domain
    pub fn check_range(&self) -> Result<(), SpatialError> {
        let ok = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if ok {
            Ok(())
        } else {
            Err(SpatialError::OutOfRange {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Point geometry with x = longitude, y = latitude
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// WKT point derived from the scalar pair
    pub fn to_wkt(&self) -> String {
        self.to_point().wkt_string()
    }

    fn as_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Parses a WKT `POINT`
pub fn parse_point(wkt: &str) -> Result<Point<f64>, SpatialError> {
    <Point<f64> as TryFromWkt<f64>>::try_from_wkt_str(wkt)
        .map_err(|e| SpatialError::InvalidWkt(e.to_string()))
}

/// Parses a WKT `LINESTRING`
pub fn parse_line(wkt: &str) -> Result<LineString<f64>, SpatialError> {
    <LineString<f64> as TryFromWkt<f64>>::try_from_wkt_str(wkt)
        .map_err(|e| SpatialError::InvalidWkt(e.to_string()))
}

/// Checks that a WKT point encodes the given coordinates within tolerance
pub fn check_point_agreement(
    shape: &str,
    coordinates: &Coordinates,
    tolerance: f64,
) -> Result<(), SpatialError> {
    let point = parse_point(shape)?;
    let dlat = (point.y() - coordinates.latitude).abs();
    let dlng = (point.x() - coordinates.longitude).abs();
    if dlat <= tolerance && dlng <= tolerance {
        Ok(())
    } else {
        Err(SpatialError::Divergent {
            dlat,
            dlng,
            tolerance,
        })
    }
}

/// Geometry of a location trace
///
/// A trace with a single distinct vertex degenerates to a point.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceShape {
    Point(Point<f64>),
    Line(LineString<f64>),
}

impl TraceShape {
    /// Builds a trace shape from time-ordered vertices
    ///
    /// Repeated vertices are dropped, keeping the first occurrence, so the
    /// path never revisits a vertex. Returns None when there are no vertices.
    pub fn from_vertices<I>(vertices: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut seen: HashSet<(u64, u64)> = HashSet::new();
        let mut distinct: Vec<Coord<f64>> = Vec::new();
        for vertex in vertices {
            let coord = vertex.as_coord();
            if seen.insert(vertex_key(coord)) {
                distinct.push(coord);
            }
        }

        match distinct.len() {
            0 => None,
            1 => Some(TraceShape::Point(Point(distinct[0]))),
            _ => Some(TraceShape::Line(LineString::new(distinct))),
        }
    }

    /// Parses either a `POINT` or a `LINESTRING`
    pub fn parse(wkt: &str) -> Result<Self, SpatialError> {
        let trimmed = wkt.trim_start().to_ascii_uppercase();
        if trimmed.starts_with("POINT") {
            parse_point(wkt).map(TraceShape::Point)
        } else {
            parse_line(wkt).map(TraceShape::Line)
        }
    }

    /// Vertices in path order
    pub fn vertices(&self) -> Vec<Coordinates> {
        match self {
            TraceShape::Point(p) => vec![Coordinates::new(p.y(), p.x())],
            TraceShape::Line(line) => line
                .coords()
                .map(|c| Coordinates::new(c.y, c.x))
                .collect(),
        }
    }

    /// True if both shapes have the same vertices within tolerance
    pub fn matches(&self, other: &TraceShape, tolerance: f64) -> bool {
        let a = self.vertices();
        let b = other.vertices();
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|(x, y)| {
                (x.latitude - y.latitude).abs() <= tolerance
                    && (x.longitude - y.longitude).abs() <= tolerance
            })
    }

    /// Great-circle length of the path in metres
    pub fn length_meters(&self) -> f64 {
        match self {
            TraceShape::Point(_) => 0.0,
            TraceShape::Line(line) => line.haversine_length(),
        }
    }

    pub fn to_wkt(&self) -> String {
        match self {
            TraceShape::Point(p) => p.wkt_string(),
            TraceShape::Line(line) => line.wkt_string(),
        }
    }
}

/// Bit pattern of a vertex; adding zero folds -0.0 into 0.0
fn vertex_key(coord: Coord<f64>) -> (u64, u64) {
    ((coord.x + 0.0).to_bits(), (coord.y + 0.0).to_bits())
}
