//! Planar coordinates used to decide which stores are "nearby".
//!
//! Latitude and longitude live on a synthetic `[0, 100]` grid. Distance is
//! plain Euclidean distance on that grid, not a geodesic distance.

use serde::{Deserialize, Serialize};

/// Stores strictly closer than this are listed as nearby and accept orders.
pub const NEARBY_RADIUS: f64 = 30.0;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude on the grid.
    pub latitude: f64,
    /// Longitude on the grid.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Euclidean distance to `other`: `sqrt(dlat^2 + dlong^2)`.
    #[must_use]
    #[allow(clippy::imprecise_flops, clippy::suboptimal_flops)]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlong = self.longitude - other.longitude;
        (dlat * dlat + dlong * dlong).sqrt()
    }

    /// Whether `other` is strictly inside [`NEARBY_RADIUS`].
    #[must_use]
    pub fn is_nearby(&self, other: &Self) -> bool {
        self.distance_to(other) < NEARBY_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinates::new(42.5, 17.25);
        assert!(p.distance_to(&p).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let samples = [
            (Coordinates::new(0.0, 0.0), Coordinates::new(100.0, 100.0)),
            (Coordinates::new(10.0, 10.0), Coordinates::new(13.0, 14.0)),
            (Coordinates::new(55.5, 3.25), Coordinates::new(1.0, 99.75)),
        ];
        for (a, b) in samples {
            assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_distance_three_four_five() {
        let a = Coordinates::new(10.0, 10.0);
        let b = Coordinates::new(13.0, 14.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearby_is_strict() {
        let origin = Coordinates::new(0.0, 0.0);
        assert!(origin.is_nearby(&Coordinates::new(29.999, 0.0)));
        assert!(!origin.is_nearby(&Coordinates::new(30.0, 0.0)));
        assert!(!origin.is_nearby(&Coordinates::new(18.0, 24.0)));
    }
}
