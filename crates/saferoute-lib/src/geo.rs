//! Geographic primitives: coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in metres used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// Rejects NaN and infinite values as well as latitudes outside
    /// `[-90, 90]` and longitudes outside `[-180, 180]`.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check the range invariants of a coordinate built without [`Coordinate::new`]
    /// (for example one deserialized from a dataset).
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Great-circle distance to another coordinate in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(self, other)
    }
}

/// Haversine great-circle distance between two coordinates in metres.
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let point = Coordinate::new(2.4419, -76.6063).unwrap();
        assert!(haversine_distance(&point, &point).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(2.4419, -76.6063).unwrap();
        let b = Coordinate::new(2.4480, -76.5990).unwrap();
        assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
    }

    #[test]
    fn one_millidegree_of_longitude_on_equator() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 0.001).unwrap();
        let expected = EARTH_RADIUS_M * 0.001_f64.to_radians();
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn prague_to_brno_is_about_185_km() {
        let prague = Coordinate::new(50.0755, 14.4378).unwrap();
        let brno = Coordinate::new(49.1951, 16.6068).unwrap();
        let km = prague.distance_to(&brno) / 1000.0;
        assert!((km - 185.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }
}
