//! Geographic coordinate value type.

use serde::{Deserialize, Serialize};

use crate::error::InvalidCoordinateError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate, rejecting values outside the WGS84 ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check latitude in [-90, 90] and longitude in [-180, 180].
    ///
    /// NaN fails both range checks.
    pub fn validate(&self) -> Result<(), InvalidCoordinateError> {
        let lat_ok = (-90.0..=90.0).contains(&self.latitude);
        let lng_ok = (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(InvalidCoordinateError {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(Coordinate::try_new(90.0, 180.0).is_ok());
        assert!(Coordinate::try_new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::try_new(90.5, 0.0).is_err());
        assert!(Coordinate::try_new(0.0, -180.1).is_err());
    }

    #[test]
    fn rejects_nan() {
        let err = Coordinate::try_new(f64::NAN, 0.0).unwrap_err();
        assert!(err.latitude.is_nan());
    }
}
