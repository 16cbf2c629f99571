// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Geospatial value objects and the haversine great-circle distance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::validation(format!(
                "latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::validation(format!(
                "longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Great-circle distance between two points in kilometres.
///
/// ```text
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// d = 2·R·atan2(√a, √(1−a))
/// ```
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Best-effort reverse geocoding port.
///
/// Failure degrades to `None` and must never fail the surrounding call;
/// implementations log their own errors.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: GeoPoint) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn point_validation_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(-90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 180.5).is_err());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let jakarta = p(-6.2088, 106.8456);
        assert_eq!(haversine_km(jakarta, jakarta), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let jakarta = p(-6.2088, 106.8456);
        let surabaya = p(-7.2575, 112.7521);
        let there = haversine_km(jakarta, surabaya);
        let back = haversine_km(surabaya, jakarta);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn jakarta_surabaya_sanity() {
        // Road signs say ~780 km; great-circle is around 660 km.
        let d = haversine_km(p(-6.2088, 106.8456), p(-7.2575, 112.7521));
        assert!((600.0..700.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_grows_with_angular_separation() {
        // Points along the equator: a single great circle.
        let origin = p(0.0, 0.0);
        let mut last = 0.0;
        for lon in [1.0, 5.0, 20.0, 60.0, 120.0, 179.0] {
            let d = haversine_km(origin, p(0.0, lon));
            assert!(d > last, "distance must increase: {d} <= {last}");
            last = d;
        }
    }

    #[test]
    fn quarter_circumference() {
        let d = haversine_km(p(0.0, 0.0), p(0.0, 90.0));
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM;
        assert!((d - expected).abs() < 1e-6);
    }
}
