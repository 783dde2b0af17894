//! Screen-space velocity lattice built from a field source, land mask, and
//! projection.
//!
//! A [`VectorField`] discretizes the viewport at a fixed lattice spacing:
//! each lattice point is projected to a geographic coordinate, sampled, and
//! converted to a pixels-per-tick velocity. Cells with no data or over land
//! hold the zero vector, which downstream code reads as "undefined".
//!
//! The field is plain data after construction — rebuilds are full
//! replacements (new field built, old one dropped), never in-place patches,
//! so interpolation can never observe a mixed-generation grid.

use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::projection::Projection;
use crate::sample::VelocityVector;
use crate::source::{FieldSource, LandMask};

/// A discretized, bilinearly-interpolatable velocity field over the current
/// viewport, for one time index.
///
/// Vectors are stored column-major: `index = col * rows + row`.
#[derive(Debug, Clone)]
pub struct VectorField {
    vectors: Vec<VelocityVector>,
    valid: Vec<bool>,
    cols: usize,
    rows: usize,
    spacing: f64,
    width: usize,
    height: usize,
}

impl VectorField {
    /// Builds the field for `time_index` over the projection's current
    /// viewport.
    ///
    /// One lattice point per `config.lattice_spacing` pixels in each axis;
    /// the lattice extends one column/row past the viewport edge so every
    /// interior point has four surrounding corners, and sampling positions
    /// for points past the edge are clamped to the viewport (partial last
    /// cell).
    pub fn build(
        source: &dyn FieldSource,
        mask: &dyn LandMask,
        projection: &dyn Projection,
        time_index: usize,
        config: &FlowConfig,
    ) -> Result<Self, FlowError> {
        let (width, height) = projection.size();
        if width == 0 || height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        let spacing = config.lattice_spacing;
        let cols = (width - 1) / spacing + 2;
        let rows = (height - 1) / spacing + 2;

        let mut vectors = Vec::with_capacity(cols * rows);
        let mut valid = Vec::with_capacity(cols * rows);
        for col in 0..cols {
            for row in 0..rows {
                // Clamp points past the edge back onto the viewport so the
                // projection never extrapolates.
                let x = ((col * spacing) as f64).min((width - 1) as f64);
                let y = ((row * spacing) as f64).min((height - 1) as f64);
                let (lat, lon) = projection.screen_to_geo(x, y);
                let land = mask.is_land(lat, lon);
                let vector = if land {
                    VelocityVector::ZERO
                } else {
                    source
                        .sample(lat, lon, time_index)
                        .map(|s| s.to_velocity(config.velocity_scale))
                        .unwrap_or(VelocityVector::ZERO)
                };
                vectors.push(vector);
                valid.push(!land);
            }
        }

        Ok(Self {
            vectors,
            valid,
            cols,
            rows,
            spacing: spacing as f64,
            width,
            height,
        })
    }

    /// Viewport width in pixels at build time.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Viewport height in pixels at build time.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Lattice dimensions (columns, rows).
    pub fn lattice_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn at(&self, col: usize, row: usize) -> VelocityVector {
        self.vectors[col * self.rows + row]
    }

    /// Bilinear interpolation over the four lattice cells surrounding
    /// (x, y), floor-based cell indexing.
    ///
    /// Returns the zero vector when any required lattice index is out of
    /// bounds — there is no wraparound. Each component of the result is a
    /// convex combination of the four corner components.
    pub fn interpolate(&self, x: f64, y: f64) -> VelocityVector {
        if x < 0.0 || y < 0.0 || !x.is_finite() || !y.is_finite() {
            return VelocityVector::ZERO;
        }
        let col = (x / self.spacing).floor() as usize;
        let row = (y / self.spacing).floor() as usize;
        if col + 1 >= self.cols || row + 1 >= self.rows {
            return VelocityVector::ZERO;
        }
        let fx = x / self.spacing - col as f64;
        let fy = y / self.spacing - row as f64;

        let c00 = self.at(col, row);
        let c10 = self.at(col + 1, row);
        let c01 = self.at(col, row + 1);
        let c11 = self.at(col + 1, row + 1);

        let w00 = (1.0 - fx) * (1.0 - fy);
        let w10 = fx * (1.0 - fy);
        let w01 = (1.0 - fx) * fy;
        let w11 = fx * fy;

        VelocityVector {
            u: c00.u * w00 + c10.u * w10 + c01.u * w01 + c11.u * w11,
            v: c00.v * w00 + c10.v * w10 + c01.v * w01 + c11.v * w11,
            magnitude: c00.magnitude * w00
                + c10.magnitude * w10
                + c01.magnitude * w01
                + c11.magnitude * w11,
        }
    }

    /// True iff (x, y) is inside the viewport and the nearest lattice cell
    /// is not over land.
    ///
    /// Validity is cached at lattice resolution during the build; the land
    /// mask is approximate to begin with, so the quantization does not
    /// change the contract.
    pub fn is_valid(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return false;
        }
        let col = ((x / self.spacing).round() as usize).min(self.cols - 1);
        let row = ((y / self.spacing).round() as usize).min(self.rows - 1);
        self.valid[col * self.rows + row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Equirectangular, GeoBounds};
    use crate::sample::Sample;
    use crate::source::{BoxLandMask, SyntheticSwell, UniformSwell};

    fn test_config(spacing: usize, scale: f64) -> FlowConfig {
        FlowConfig {
            lattice_spacing: spacing,
            velocity_scale: scale,
            ..Default::default()
        }
    }

    fn world_projection(width: usize, height: usize) -> Equirectangular {
        Equirectangular::new(GeoBounds::WORLD, width, height).unwrap()
    }

    fn uniform_field(width: usize, height: usize, sample: Sample) -> VectorField {
        let source = UniformSwell { sample };
        let mask = BoxLandMask::open_ocean();
        let projection = world_projection(width, height);
        VectorField::build(&source, &mask, &projection, 0, &test_config(4, 1.0)).unwrap()
    }

    #[test]
    fn uniform_source_interpolates_to_constant() {
        let field = uniform_field(64, 64, Sample::new(4.0, 270.0));
        for &(x, y) in &[(1.0, 1.0), (10.5, 20.25), (30.0, 30.0), (50.9, 59.1)] {
            let v = field.interpolate(x, y);
            assert!((v.u - 4.0).abs() < 1e-9, "u at ({x}, {y}) = {}", v.u);
            assert!(v.v.abs() < 1e-9, "v at ({x}, {y}) = {}", v.v);
            assert!((v.magnitude - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn interpolate_outside_grid_returns_zero() {
        let field = uniform_field(64, 64, Sample::new(4.0, 270.0));
        assert!(field.interpolate(-1.0, 10.0).is_zero());
        assert!(field.interpolate(10.0, -0.5).is_zero());
        assert!(field.interpolate(1e9, 10.0).is_zero());
        assert!(field.interpolate(f64::NAN, 10.0).is_zero());
    }

    #[test]
    fn viewport_not_divisible_by_spacing_still_covers_interior() {
        // 61x47 with spacing 4: last cells are partial.
        let field = uniform_field(61, 47, Sample::new(2.0, 180.0));
        let v = field.interpolate(60.5, 46.5);
        assert!(
            (v.magnitude - 2.0).abs() < 1e-9,
            "edge interpolation failed: {v:?}"
        );
    }

    #[test]
    fn land_cells_hold_zero_vector() {
        // Mask the whole western hemisphere.
        let source = UniformSwell {
            sample: Sample::new(3.0, 90.0),
        };
        let mask = BoxLandMask::new(vec![GeoBounds {
            south: -90.0,
            north: 90.0,
            west: -180.0,
            east: 0.0,
        }]);
        let projection = world_projection(360, 180);
        let field =
            VectorField::build(&source, &mask, &projection, 0, &test_config(4, 1.0)).unwrap();
        // Deep inside the masked half
        assert!(field.interpolate(40.0, 90.0).is_zero());
        // Deep inside open ocean
        assert!(!field.interpolate(300.0, 90.0).is_zero());
    }

    #[test]
    fn is_valid_tracks_viewport_and_land() {
        let source = UniformSwell {
            sample: Sample::new(1.0, 0.0),
        };
        let mask = BoxLandMask::new(vec![GeoBounds {
            south: -90.0,
            north: 90.0,
            west: -180.0,
            east: 0.0,
        }]);
        let projection = world_projection(360, 180);
        let field =
            VectorField::build(&source, &mask, &projection, 0, &test_config(4, 1.0)).unwrap();
        assert!(!field.is_valid(-1.0, 10.0), "outside viewport");
        assert!(!field.is_valid(10.0, 500.0), "outside viewport");
        assert!(!field.is_valid(40.0, 90.0), "over land");
        assert!(field.is_valid(300.0, 90.0), "open ocean");
        assert!(!field.is_valid(f64::NAN, 0.0));
    }

    #[test]
    fn build_is_idempotent_for_deterministic_source() {
        let source = SyntheticSwell::default();
        let mask = BoxLandMask::continents();
        let projection = world_projection(180, 90);
        let cfg = test_config(4, 0.8);
        let a = VectorField::build(&source, &mask, &projection, 3, &cfg).unwrap();
        let b = VectorField::build(&source, &mask, &projection, 3, &cfg).unwrap();
        for i in 0..200 {
            let x = (i % 20) as f64 * 8.7;
            let y = (i / 20) as f64 * 8.3;
            let va = a.interpolate(x, y);
            let vb = b.interpolate(x, y);
            assert_eq!(va, vb, "mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn rebuild_for_new_time_index_changes_vectors() {
        let source = SyntheticSwell::default();
        let mask = BoxLandMask::open_ocean();
        let projection = world_projection(120, 60);
        let cfg = test_config(4, 1.0);
        let t0 = VectorField::build(&source, &mask, &projection, 0, &cfg).unwrap();
        let t9 = VectorField::build(&source, &mask, &projection, 9, &cfg).unwrap();
        let changed = (0..50).any(|i| {
            let (x, y) = ((i % 10) as f64 * 11.0, (i / 10) as f64 * 11.0);
            t0.interpolate(x, y) != t9.interpolate(x, y)
        });
        assert!(changed, "field should differ between time indices");
    }

    #[test]
    fn lattice_covers_viewport_with_margin() {
        let field = uniform_field(64, 64, Sample::new(1.0, 0.0));
        let (cols, rows) = field.lattice_size();
        // 64 px at spacing 4: floor(63/4) + 2 = 17 points per axis.
        assert_eq!(cols, 17);
        assert_eq!(rows, 17);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interpolation_is_convex_combination(
                x in 0.0_f64..116.0,
                y in 0.0_f64..56.0,
            ) {
                let source = SyntheticSwell::default();
                let mask = BoxLandMask::open_ocean();
                let projection = world_projection(120, 60);
                let field = VectorField::build(
                    &source, &mask, &projection, 0, &test_config(4, 1.0),
                ).unwrap();

                let col = (x / 4.0).floor() as usize;
                let row = (y / 4.0).floor() as usize;
                let corners = [
                    field.at(col, row),
                    field.at(col + 1, row),
                    field.at(col, row + 1),
                    field.at(col + 1, row + 1),
                ];
                let v = field.interpolate(x, y);

                type Extract = fn(&VelocityVector) -> f64;
                let components: [(&str, Extract); 3] = [
                    ("u", |c| c.u),
                    ("v", |c| c.v),
                    ("magnitude", |c| c.magnitude),
                ];
                for (name, extract) in components {
                    let lo = corners.iter().map(|c| extract(c)).fold(f64::INFINITY, f64::min);
                    let hi = corners.iter().map(|c| extract(c)).fold(f64::NEG_INFINITY, f64::max);
                    let got = extract(&v);
                    prop_assert!(
                        got >= lo - 1e-9 && got <= hi + 1e-9,
                        "{name} = {got} outside corner bounds [{lo}, {hi}] at ({x}, {y})"
                    );
                }
            }

            #[test]
            fn interpolation_never_panics(
                x in -1000.0_f64..1000.0,
                y in -1000.0_f64..1000.0,
            ) {
                let field = uniform_field(64, 48, Sample::new(1.0, 45.0));
                let v = field.interpolate(x, y);
                prop_assert!(v.u.is_finite() && v.v.is_finite());
            }
        }
    }
}
