//! Geocoded places
//!
//! A place is an address plus an optional geocode. The geocode bundles the
//! coordinates, the geometry and the MGRA zone so that they are present or
//! absent together: an ungeocodable address has no coordinates, no shape and
//! no zone.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::category::Sentinel;
use crate::spatial::{check_point_agreement, Coordinates, SpatialError};

/// Coordinates, geometry and zone of a geocoded address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Geocode {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// WKT point in SRID 4326; derived from the coordinates when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// MGRA zone, assigned upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgra_13: Option<i32>,
}

impl Geocode {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            shape: None,
            mgra_13: None,
        }
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_mgra(mut self, mgra: i32) -> Self {
        self.mgra_13 = Some(mgra);
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The geometry to persist: the supplied shape, or one derived from lat/long
    pub fn storage_shape(&self) -> String {
        match &self.shape {
            Some(shape) => shape.clone(),
            None => self.coordinates().to_wkt(),
        }
    }

    /// Fills in the shape from lat/long when none was supplied
    pub fn derive_shape(&mut self) {
        if self.shape.is_none() {
            self.shape = Some(self.coordinates().to_wkt());
        }
    }

    /// Checks the coordinates and, when a shape is supplied, that it encodes them
    pub fn check(&self, tolerance: f64) -> Result<(), SpatialError> {
        let coordinates = self.coordinates();
        coordinates.check_range()?;
        match &self.shape {
            Some(shape) => check_point_agreement(shape, &coordinates, tolerance),
            None => Ok(()),
        }
    }
}

/// An address with its optional geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Place {
    #[validate(length(max = 150))]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub geocode: Option<Geocode>,
}

impl Place {
    /// A place whose address could not be geocoded
    pub fn ungeocoded(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            geocode: None,
        }
    }

    pub fn geocoded(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            geocode: Some(Geocode::new(latitude, longitude)),
        }
    }

    /// A place that does not apply to the respondent (no school, no second job, ...)
    pub fn not_applicable() -> Self {
        Self::ungeocoded(Sentinel::NotApplicable.label())
    }

    pub fn with_geocode(mut self, geocode: Geocode) -> Self {
        self.geocode = Some(geocode);
        self
    }

    pub fn is_geocoded(&self) -> bool {
        self.geocode.is_some()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.geocode.as_ref().map(Geocode::coordinates)
    }

    /// Derives the geocode's missing shape, as written to storage
    pub fn derive_shape(&mut self) {
        if let Some(geocode) = self.geocode.as_mut() {
            geocode.derive_shape();
        }
    }
}
