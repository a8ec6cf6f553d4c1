//! # Geo
//!
//! Points on the earth's surface, stored the way document stores index them:
//! `[longitude, latitude]`.

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean earth radius used for spherical distance queries.
pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

pub const METERS_PER_KILOMETER: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Creates a point from a `[longitude, latitude]` pair.
    pub fn from_coordinates(coordinates: &[f64]) -> Option<Self> {
        match coordinates {
            [longitude, latitude] if longitude.is_finite() && latitude.is_finite() => {
                Some(Self::new(*longitude, *latitude))
            }
            _ => None,
        }
    }

    pub const fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance in meters, using the haversine formula.
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

/// Converts kilometers to meters.
pub fn kilometers_to_meters(kilometers: f64) -> f64 {
    kilometers * METERS_PER_KILOMETER
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}
