// 🧭 Geo Layer - Points and axis-aligned bounding boxes
// A zone is a latitude/longitude rectangle; membership is boundary-inclusive.

use serde::{Deserialize, Serialize};

// ============================================================================
// POINT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Axis-aligned rectangle in degrees.
///
/// Always normalized: `north >= south` and `east >= west`, whichever corner
/// the drag gesture started from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Build bounds from two arbitrary corners (drag start and drag end).
    ///
    /// Identical points give a zero-area rectangle, which is still valid.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        GeoBounds {
            north: a.lat.max(b.lat),
            south: a.lat.min(b.lat),
            east: a.lng.max(b.lng),
            west: a.lng.min(b.lng),
        }
    }

    /// Build bounds from explicit edges, normalizing swapped values.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self::from_corners(LatLng::new(north, east), LatLng::new(south, west))
    }

    /// True iff the point lies inside or on any edge.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.south <= lat && lat <= self.north && self.west <= lng && lng <= self.east
    }

    pub fn contains_point(&self, point: LatLng) -> bool {
        self.contains(point.lat, point.lng)
    }

    pub fn is_degenerate(&self) -> bool {
        self.north == self.south || self.east == self.west
    }

    /// South-west and north-east corners, the order map libraries expect.
    pub fn corners(&self) -> (LatLng, LatLng) {
        (
            LatLng::new(self.south, self.west),
            LatLng::new(self.north, self.east),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_corners_normalizes_any_order() {
        let a = LatLng::new(51.20, 71.50);
        let b = LatLng::new(51.05, 71.35);

        let forward = GeoBounds::from_corners(a, b);
        let backward = GeoBounds::from_corners(b, a);

        assert_eq!(forward, backward);
        assert_eq!(forward.north, 51.20);
        assert_eq!(forward.south, 51.05);
        assert_eq!(forward.east, 71.50);
        assert_eq!(forward.west, 71.35);
    }

    #[test]
    fn test_mixed_corners() {
        // North-west to south-east drag
        let bounds = GeoBounds::from_corners(LatLng::new(51.2, 71.3), LatLng::new(51.1, 71.6));

        assert_eq!(bounds.north, 51.2);
        assert_eq!(bounds.south, 51.1);
        assert_eq!(bounds.east, 71.6);
        assert_eq!(bounds.west, 71.3);
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let bounds = GeoBounds::new(51.15, 51.05, 71.45, 71.35);

        assert!(bounds.contains(51.10, 71.40));
        assert!(bounds.contains(51.15, 71.40));
        assert!(bounds.contains(51.05, 71.40));
        assert!(bounds.contains(51.10, 71.45));
        assert!(bounds.contains(51.10, 71.35));
        assert!(bounds.contains(51.15, 71.45));

        assert!(!bounds.contains(51.20, 71.50));
        assert!(!bounds.contains(51.151, 71.40));
        assert!(!bounds.contains(51.10, 71.349));
    }

    #[test]
    fn test_degenerate_zone_matches_only_exact_point() {
        let p = LatLng::new(51.1, 71.4);
        let bounds = GeoBounds::from_corners(p, p);

        assert!(bounds.is_degenerate());
        assert!(bounds.contains_point(p));
        assert!(!bounds.contains(51.1, 71.4000001));
        assert!(!bounds.contains(51.0999999, 71.4));
    }

    #[test]
    fn test_new_swaps_inverted_edges() {
        let bounds = GeoBounds::new(51.05, 51.15, 71.35, 71.45);

        assert_eq!(bounds.north, 51.15);
        assert_eq!(bounds.south, 51.05);
        assert_eq!(bounds.east, 71.45);
        assert_eq!(bounds.west, 71.35);
    }

    proptest! {
        #[test]
        fn prop_corners_are_inside_their_bounds(
            lat_a in -90.0f64..=90.0,
            lng_a in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0,
            lng_b in -180.0f64..=180.0,
        ) {
            let a = LatLng::new(lat_a, lng_a);
            let b = LatLng::new(lat_b, lng_b);
            let bounds = GeoBounds::from_corners(a, b);

            prop_assert!(bounds.north >= bounds.south);
            prop_assert!(bounds.east >= bounds.west);
            prop_assert!(bounds.contains_point(a));
            prop_assert!(bounds.contains_point(b));
        }
    }
}
