//! Wave samples and their conversion to screen-space velocities.
//!
//! A [`Sample`] is a single magnitude + direction reading at a geographic
//! point and time. Directions follow the meteorological convention: the
//! direction the wave comes FROM, in degrees clockwise from north. Converting
//! to a [`VelocityVector`] inverts the direction (+180°) so particles travel
//! the way the wave is going, and applies a scale factor tying physical
//! magnitude to pixel displacement per tick.

use serde::{Deserialize, Serialize};

/// A single wave reading at a geographic point and time index.
///
/// `direction_degrees` is the FROM direction in [0, 360), meteorological
/// convention. `period_seconds` is carried for hosts that chart it; the
/// animation engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wave magnitude (significant height in meters), >= 0.
    pub magnitude: f64,
    /// Direction the wave comes from, degrees clockwise from north.
    pub direction_degrees: f64,
    /// Mean wave period, if the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<f64>,
}

impl Sample {
    /// Creates a sample with no period reading.
    pub fn new(magnitude: f64, direction_degrees: f64) -> Self {
        Self {
            magnitude,
            direction_degrees,
            period_seconds: None,
        }
    }

    /// Converts this sample to a screen-space velocity.
    ///
    /// The FROM direction is inverted to the direction of travel:
    /// `direction_to = (direction_degrees + 180) mod 360`, then
    /// `u = sin(direction_to) * magnitude * scale` (screen-x rate) and
    /// `v = cos(direction_to) * magnitude * scale` (screen-y rate).
    ///
    /// A zero-magnitude sample yields the zero vector regardless of
    /// direction.
    pub fn to_velocity(&self, scale: f64) -> VelocityVector {
        if self.magnitude == 0.0 {
            return VelocityVector::ZERO;
        }
        let direction_to = (self.direction_degrees + 180.0).rem_euclid(360.0);
        let rad = direction_to.to_radians();
        VelocityVector {
            u: rad.sin() * self.magnitude * scale,
            v: rad.cos() * self.magnitude * scale,
            magnitude: self.magnitude,
        }
    }
}

/// A screen-space velocity in pixels per tick.
///
/// The zero vector doubles as the "undefined" marker: lattice cells outside
/// data coverage or over land hold it, and the particle system respawns any
/// particle that interpolates to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityVector {
    /// Eastward / screen-x displacement per tick.
    pub u: f64,
    /// Northward / screen-y displacement per tick.
    pub v: f64,
    /// Magnitude of the originating sample (for color mapping).
    pub magnitude: f64,
}

impl VelocityVector {
    /// The zero vector, used for no-data and land cells.
    pub const ZERO: VelocityVector = VelocityVector {
        u: 0.0,
        v: 0.0,
        magnitude: 0.0,
    };

    /// True when this vector carries no velocity information.
    pub fn is_zero(&self) -> bool {
        self.u == 0.0 && self.v == 0.0 && self.magnitude == 0.0
    }
}
