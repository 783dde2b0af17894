//! Field sources and land masks: the data-side collaborators of the engine.
//!
//! A [`FieldSource`] answers "what is the wave at this coordinate and time
//! index" with `Some(Sample)` or `None` for no coverage. A [`LandMask`]
//! answers "is this coordinate traversable". Both are total — they always
//! return a value and never fail — so the animation loop has no error path
//! to external data faults.
//!
//! All implementations are deterministic: same inputs produce the same
//! output.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::projection::GeoBounds;
use crate::sample::Sample;

/// A source of wave samples over geography and discrete time.
///
/// `None` signals "no coverage here"; downstream it becomes the zero
/// velocity vector. Implementations must be pure per (inputs, dataset
/// snapshot).
pub trait FieldSource: Send + Sync {
    /// Samples the field at (lat, lon) for the given time index.
    fn sample(&self, lat: f64, lon: f64, time_index: usize) -> Option<Sample>;
}

/// An approximate land/sea test.
///
/// Allowed to be piecewise and coarse: treating ocean as land degrades
/// visuals, treating land as ocean draws particles over coastlines. Neither
/// is fatal.
pub trait LandMask: Send + Sync {
    /// True when (lat, lon) is non-traversable.
    fn is_land(&self, lat: f64, lon: f64) -> bool;
}

// ---------------------------------------------------------------------------
// Gridded source (wire-format data)
// ---------------------------------------------------------------------------

/// One time step of gridded wave data in the upstream wire layout:
/// origin at (la1, lo1) = north-west corner, rows north to south, columns
/// west to east, spacing (dx, dy) degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwellFrame {
    /// Latitude of the first (northernmost) row.
    pub la1: f64,
    /// Longitude of the first (westernmost) column.
    pub lo1: f64,
    /// Longitude step in degrees.
    pub dx: f64,
    /// Latitude step in degrees.
    pub dy: f64,
    /// Number of columns.
    pub nx: usize,
    /// Number of rows.
    pub ny: usize,
    /// Row-major cells, `None` where the model has no coverage.
    pub cells: Vec<Option<Sample>>,
}

impl SwellFrame {
    /// Validates the grid geometry against the cell count.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        if !(self.dx > 0.0 && self.dy > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "grid spacing must be positive, got dx={} dy={}",
                self.dx, self.dy
            )));
        }
        let expected = self
            .nx
            .checked_mul(self.ny)
            .ok_or(FlowError::InvalidDimensions)?;
        if self.cells.len() != expected {
            return Err(FlowError::InvalidConfig(format!(
                "grid cell count {} does not match {}x{}",
                self.cells.len(),
                self.nx,
                self.ny
            )));
        }
        Ok(())
    }

    /// Nearest-cell lookup. Returns `None` outside the grid extent.
    fn lookup(&self, lat: f64, lon: f64) -> Option<Sample> {
        let spans_globe = self.nx as f64 * self.dx >= 360.0 - self.dx;
        let dlon = if spans_globe {
            (lon - self.lo1).rem_euclid(360.0)
        } else {
            lon - self.lo1
        };
        let col = (dlon / self.dx).round();
        let row = ((self.la1 - lat) / self.dy).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.nx || row >= self.ny {
            return None;
        }
        self.cells[row * self.nx + col]
    }
}

/// A [`FieldSource`] backed by one [`SwellFrame`] per time index.
#[derive(Debug, Clone)]
pub struct GriddedSwell {
    frames: Vec<SwellFrame>,
}

impl GriddedSwell {
    /// Creates a gridded source, validating every frame.
    pub fn new(frames: Vec<SwellFrame>) -> Result<Self, FlowError> {
        if frames.is_empty() {
            return Err(FlowError::InvalidConfig(
                "gridded source requires at least one frame".into(),
            ));
        }
        for frame in &frames {
            frame.validate()?;
        }
        Ok(Self { frames })
    }

    /// Number of available time indices.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: construction rejects empty frame lists.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FieldSource for GriddedSwell {
    fn sample(&self, lat: f64, lon: f64, time_index: usize) -> Option<Sample> {
        self.frames.get(time_index)?.lookup(lat, lon)
    }
}

// ---------------------------------------------------------------------------
// Synthetic source (demos, tests)
// ---------------------------------------------------------------------------

/// Perlin-noise swell field: smoothly varying magnitude and direction,
/// deterministic by seed. Covers the whole globe for every time index.
pub struct SyntheticSwell {
    noise: Perlin,
    scale: f64,
    peak_magnitude: f64,
    time_step: f64,
}

impl SyntheticSwell {
    /// Creates a synthetic swell source.
    ///
    /// `scale` controls spatial frequency (degrees to noise space),
    /// `peak_magnitude` the largest wave height produced, and `time_step`
    /// how far the pattern drifts per time index.
    pub fn new(seed: u32, scale: f64, peak_magnitude: f64, time_step: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            peak_magnitude,
            time_step,
        }
    }
}

impl Default for SyntheticSwell {
    fn default() -> Self {
        Self::new(42, 0.05, 6.0, 0.35)
    }
}

impl FieldSource for SyntheticSwell {
    fn sample(&self, lat: f64, lon: f64, time_index: usize) -> Option<Sample> {
        let t = time_index as f64 * self.time_step;
        let sx = lon * self.scale;
        let sy = lat * self.scale;
        // Two offset noise reads: one for magnitude, one for direction.
        let m = self.noise.get([sx, sy, t]) * 0.5 + 0.5;
        let d = self.noise.get([sx + 100.0, sy + 100.0, t]) * 0.5 + 0.5;
        Some(Sample::new(
            (m * self.peak_magnitude).max(0.0),
            (d * 360.0).rem_euclid(360.0),
        ))
    }
}

/// Constant sample everywhere. Test fixture.
#[derive(Debug, Clone, Copy)]
pub struct UniformSwell {
    pub sample: Sample,
}

impl FieldSource for UniformSwell {
    fn sample(&self, _lat: f64, _lon: f64, _time_index: usize) -> Option<Sample> {
        Some(self.sample)
    }
}

// ---------------------------------------------------------------------------
// Land masks
// ---------------------------------------------------------------------------

/// Land mask built from a list of geographic bounding boxes.
///
/// Box coordinates are configuration data, not hard-coded logic: hosts with
/// better coastline data supply their own boxes (or their own [`LandMask`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxLandMask {
    boxes: Vec<GeoBounds>,
}

impl BoxLandMask {
    /// Creates a mask from arbitrary boxes.
    pub fn new(boxes: Vec<GeoBounds>) -> Self {
        Self { boxes }
    }

    /// The empty mask: everything is ocean.
    pub fn open_ocean() -> Self {
        Self { boxes: Vec::new() }
    }

    /// A coarse continental mask. Good enough to keep particles off the
    /// obvious land masses in a world view; not a coastline.
    pub fn continents() -> Self {
        let boxes = vec![
            // Antarctica and Arctic ice
            GeoBounds { south: -90.0, north: -60.0, west: -180.0, east: 180.0 },
            GeoBounds { south: 85.0, north: 90.0, west: -180.0, east: 180.0 },
            // North America
            GeoBounds { south: 25.0, north: 70.0, west: -125.0, east: -70.0 },
            // South America
            GeoBounds { south: -55.0, north: 10.0, west: -80.0, east: -40.0 },
            // Europe and North Africa through the Middle East
            GeoBounds { south: 5.0, north: 70.0, west: -10.0, east: 50.0 },
            // Sub-Saharan Africa
            GeoBounds { south: -35.0, north: 5.0, west: 10.0, east: 40.0 },
            // Central and East Asia
            GeoBounds { south: 10.0, north: 75.0, west: 50.0, east: 140.0 },
            // Australia
            GeoBounds { south: -40.0, north: -12.0, west: 113.0, east: 154.0 },
            // Greenland
            GeoBounds { south: 60.0, north: 84.0, west: -60.0, east: -20.0 },
        ];
        Self { boxes }
    }
}

impl LandMask for BoxLandMask {
    fn is_land(&self, lat: f64, lon: f64) -> bool {
        self.boxes.iter().any(|b| b.contains(lat, lon))
    }
}
