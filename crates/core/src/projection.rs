//! Projection seam between screen pixels and geographic coordinates.
//!
//! The host map widget owns the real projection; the engine only needs the
//! narrow [`Projection`] interface. [`Equirectangular`] is the host-free
//! stand-in: a linear lat/lon to pixel mapping over a configurable viewport,
//! good enough for demos, snapshots, and tests.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Geographic bounds of a viewport. North must exceed south and east must
/// exceed west (longitudes pre-normalized by the host).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl GeoBounds {
    /// The whole world in plate carrée terms.
    pub const WORLD: GeoBounds = GeoBounds {
        south: -90.0,
        north: 90.0,
        west: -180.0,
        east: 180.0,
    };

    /// True when (lat, lon) lies inside these bounds, edges inclusive.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Bidirectional mapping between screen pixels and geographic coordinates,
/// plus the current viewport extent.
///
/// Implementations must be pure for a fixed viewport state: the engine calls
/// these thousands of times per grid rebuild.
pub trait Projection {
    /// Converts a screen pixel to (lat, lon).
    fn screen_to_geo(&self, x: f64, y: f64) -> (f64, f64);

    /// Converts (lat, lon) to a screen pixel.
    fn geo_to_screen(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Geographic bounds of the current viewport.
    fn bounds(&self) -> GeoBounds;

    /// Viewport size in pixels (width, height).
    fn size(&self) -> (usize, usize);
}

/// Linear lat/lon to pixel projection over a rectangular viewport.
///
/// North is at y = 0 and latitude decreases down the screen. Pan/zoom is a
/// single `set_view` call replacing the whole viewport state, matching the
/// wholesale-rebuild contract of the vector field.
#[derive(Debug, Clone)]
pub struct Equirectangular {
    bounds: GeoBounds,
    width: usize,
    height: usize,
}

impl Equirectangular {
    /// Creates a projection over the given bounds and pixel size.
    ///
    /// Returns `FlowError::InvalidDimensions` for a zero-sized viewport and
    /// `FlowError::InvalidConfig` for inverted bounds.
    pub fn new(bounds: GeoBounds, width: usize, height: usize) -> Result<Self, FlowError> {
        if width == 0 || height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        if bounds.north <= bounds.south || bounds.east <= bounds.west {
            return Err(FlowError::InvalidConfig(format!(
                "inverted geographic bounds: {bounds:?}"
            )));
        }
        Ok(Self {
            bounds,
            width,
            height,
        })
    }

    /// Replaces the viewport state in one step (pan, zoom, or resize).
    pub fn set_view(
        &mut self,
        bounds: GeoBounds,
        width: usize,
        height: usize,
    ) -> Result<(), FlowError> {
        *self = Self::new(bounds, width, height)?;
        Ok(())
    }
}

impl Projection for Equirectangular {
    fn screen_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = self.bounds.west
            + (x / self.width as f64) * (self.bounds.east - self.bounds.west);
        let lat = self.bounds.north
            - (y / self.height as f64) * (self.bounds.north - self.bounds.south);
        (lat, lon)
    }

    fn geo_to_screen(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = (lon - self.bounds.west) / (self.bounds.east - self.bounds.west)
            * self.width as f64;
        let y = (self.bounds.north - lat) / (self.bounds.north - self.bounds.south)
            * self.height as f64;
        (x, y)
    }

    fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(width: usize, height: usize) -> Equirectangular {
        Equirectangular::new(GeoBounds::WORLD, width, height).unwrap()
    }

    #[test]
    fn top_left_pixel_is_north_west_corner() {
        let p = world(360, 180);
        let (lat, lon) = p.screen_to_geo(0.0, 0.0);
        assert!((lat - 90.0).abs() < 1e-9);
        assert!((lon + 180.0).abs() < 1e-9);
    }

    #[test]
    fn center_pixel_is_origin() {
        let p = world(360, 180);
        let (lat, lon) = p.screen_to_geo(180.0, 90.0);
        assert!(lat.abs() < 1e-9, "lat = {lat}");
        assert!(lon.abs() < 1e-9, "lon = {lon}");
    }

    #[test]
    fn round_trip_recovers_screen_position_sub_pixel() {
        let p = world(1024, 512);
        for &(x, y) in &[(0.0, 0.0), (13.5, 77.25), (1023.0, 511.0), (512.0, 256.0)] {
            let (lat, lon) = p.screen_to_geo(x, y);
            let (rx, ry) = p.geo_to_screen(lat, lon);
            assert!((rx - x).abs() < 1e-6, "x: {x} -> {rx}");
            assert!((ry - y).abs() < 1e-6, "y: {y} -> {ry}");
        }
    }

    #[test]
    fn zoomed_view_maps_sub_region() {
        // North Atlantic-ish window
        let bounds = GeoBounds {
            south: 30.0,
            north: 60.0,
            west: -60.0,
            east: 0.0,
        };
        let p = Equirectangular::new(bounds, 600, 300).unwrap();
        let (lat, lon) = p.screen_to_geo(300.0, 150.0);
        assert!((lat - 45.0).abs() < 1e-9);
        assert!((lon + 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_size_viewport_rejected() {
        assert!(Equirectangular::new(GeoBounds::WORLD, 0, 100).is_err());
        assert!(Equirectangular::new(GeoBounds::WORLD, 100, 0).is_err());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let bad = GeoBounds {
            south: 50.0,
            north: 10.0,
            west: 0.0,
            east: 10.0,
        };
        assert!(Equirectangular::new(bad, 100, 100).is_err());
    }

    #[test]
    fn set_view_replaces_state() {
        let mut p = world(360, 180);
        let zoom = GeoBounds {
            south: 0.0,
            north: 45.0,
            west: 0.0,
            east: 45.0,
        };
        p.set_view(zoom, 450, 450).unwrap();
        assert_eq!(p.size(), (450, 450));
        let (lat, lon) = p.screen_to_geo(0.0, 0.0);
        assert!((lat - 45.0).abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
    }

    #[test]
    fn bounds_contains_edges_inclusive() {
        let b = GeoBounds::WORLD;
        assert!(b.contains(90.0, -180.0));
        assert!(b.contains(-90.0, 180.0));
        assert!(!b.contains(91.0, 0.0));
        assert!(!b.contains(0.0, 181.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trip_any_interior_point(
                x in 0.0_f64..1024.0,
                y in 0.0_f64..512.0,
            ) {
                let p = world(1024, 512);
                let (lat, lon) = p.screen_to_geo(x, y);
                let (rx, ry) = p.geo_to_screen(lat, lon);
                prop_assert!((rx - x).abs() < 1e-6);
                prop_assert!((ry - y).abs() < 1e-6);
            }

            #[test]
            fn screen_to_geo_stays_inside_bounds(
                x in 0.0_f64..360.0,
                y in 0.0_f64..180.0,
            ) {
                let p = world(360, 180);
                let (lat, lon) = p.screen_to_geo(x, y);
                prop_assert!(p.bounds().contains(lat, lon), "({lat}, {lon}) escaped bounds");
            }
        }
    }
}
