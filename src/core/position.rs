//! Position fixes and perimeter regions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mean earth radius in metres, used for great-circle distances.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single position fix: an opaque coordinate plus its capture time.
///
/// The controller retains at most one fix (`last_position`), overwritten on
/// every position-observed event and never merged or averaged.
///
/// # Example
///
/// ```rust
/// use paceline::Position;
/// use chrono::Utc;
///
/// let a = Position::new(52.5200, 13.4050, Utc::now());
/// let b = Position::new(52.5201, 13.4050, Utc::now());
/// assert!(a.distance_m(&b) < 15.0);
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Create a fix from a coordinate and capture time.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    /// Great-circle distance to another fix in metres (haversine).
    pub fn distance_m(&self, other: &Position) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }
}

/// A circular perimeter around a resting position.
///
/// Created only when entering `Stationary` with a known position. Exactly
/// one region is active at a time; creating a new one supersedes the old,
/// and the watch reports exit by identifier so a superseded region's late
/// events can be told apart from the live one's.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PerimeterRegion {
    id: Uuid,
    center: Position,
    radius_m: f64,
}

impl PerimeterRegion {
    /// Create a region around `center` with a freshly minted identifier.
    pub fn around(center: Position, radius_m: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius_m,
        }
    }

    /// The region's identifier, matched against exit events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The resting position the region is centered on.
    pub fn center(&self) -> &Position {
        &self.center
    }

    /// The region's radius in metres.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Whether a fix lies inside the region.
    pub fn contains(&self, position: &Position) -> bool {
        self.center.distance_m(position) <= self.radius_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude, Utc::now())
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = fix(48.8566, 2.3522);
        assert_eq!(a.distance_m(&a), 0.0);
    }

    #[test]
    fn distance_matches_known_value() {
        // One thousandth of a degree of latitude is ~111.2 m.
        let a = fix(0.0, 0.0);
        let b = fix(0.001, 0.0);
        let d = a.distance_m(&b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = fix(40.7128, -74.0060);
        let b = fix(40.7138, -74.0050);
        assert!((a.distance_m(&b) - b.distance_m(&a)).abs() < 1e-9);
    }

    #[test]
    fn region_contains_center_and_nearby_fixes() {
        let center = fix(52.5200, 13.4050);
        let region = PerimeterRegion::around(center, 100.0);

        assert!(region.contains(&center));
        // ~55 m north of center.
        assert!(region.contains(&fix(52.5205, 13.4050)));
        // ~550 m north of center.
        assert!(!region.contains(&fix(52.5250, 13.4050)));
    }

    #[test]
    fn regions_get_distinct_identifiers() {
        let center = fix(52.5200, 13.4050);
        let first = PerimeterRegion::around(center, 100.0);
        let second = PerimeterRegion::around(center, 100.0);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn region_serializes_correctly() {
        let region = PerimeterRegion::around(fix(52.5200, 13.4050), 100.0);
        let json = serde_json::to_string(&region).unwrap();
        let deserialized: PerimeterRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(region, deserialized);
    }
}
