//! Animation configuration with defaults, validation, and tolerant JSON
//! extraction.
//!
//! Every knob has a default, so `FlowConfig::default()` is always runnable.
//! `validate()` rejects degenerate values at construction time — the engine
//! must never silently run with a zero particle count or a zero frame rate.

use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default target frame rate for the animation driver.
const DEFAULT_TARGET_FPS: f64 = 30.0;
/// Default particle density in particles per pixel of viewport area.
const DEFAULT_PARTICLE_DENSITY: f64 = 1.0 / 600.0;
/// Default particle lifetime in ticks.
const DEFAULT_MAX_AGE: u32 = 90;
/// Default factor tying sample magnitude to pixel displacement per tick.
const DEFAULT_VELOCITY_SCALE: f64 = 0.8;
/// Default lattice spacing in screen pixels.
const DEFAULT_LATTICE_SPACING: usize = 4;
/// Default fraction of the previous frame retained by the trail fade.
const DEFAULT_FADE_OPACITY: f64 = 0.92;
/// Default magnitude at which the color scale saturates (meters).
const DEFAULT_MAX_MAGNITUDE: f64 = 8.0;
/// Default PRNG seed for particle spawning.
const DEFAULT_SEED: u64 = 42;

/// Default swell color stops, calm blue through heavy red.
pub const DEFAULT_COLOR_STOPS: &[&str] = &[
    "#3288bd", "#66c2a5", "#abdda4", "#e6f598", "#fee08b", "#fdae61", "#f46d43", "#d53e4f",
];

/// Tunable parameters for the flow animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowConfig {
    /// Target frames per second for the self-throttling driver.
    pub target_fps: f64,
    /// Particles per pixel of viewport area.
    pub particle_density: f64,
    /// Particle lifetime in ticks before forced respawn.
    pub max_age: u32,
    /// Scale factor from sample magnitude to pixels per tick.
    pub velocity_scale: f64,
    /// Lattice spacing in screen pixels.
    pub lattice_spacing: usize,
    /// Fraction of the previous frame retained each tick, in (0, 1].
    pub fade_opacity: f64,
    /// Magnitude at which the color scale saturates.
    pub max_magnitude: f64,
    /// Hex color stops for the magnitude scale, low to high.
    pub color_stops: Vec<String>,
    /// PRNG seed for particle spawning.
    pub seed: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            particle_density: DEFAULT_PARTICLE_DENSITY,
            max_age: DEFAULT_MAX_AGE,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            lattice_spacing: DEFAULT_LATTICE_SPACING,
            fade_opacity: DEFAULT_FADE_OPACITY,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
            color_stops: DEFAULT_COLOR_STOPS.iter().map(|s| s.to_string()).collect(),
            seed: DEFAULT_SEED,
        }
    }
}

impl FlowConfig {
    /// Extracts a configuration from a JSON object, falling back to defaults
    /// for missing or mistyped keys.
    pub fn from_json(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            target_fps: param_f64(params, "target_fps", defaults.target_fps),
            particle_density: param_f64(params, "particle_density", defaults.particle_density),
            max_age: param_u64(params, "max_age", defaults.max_age as u64) as u32,
            velocity_scale: param_f64(params, "velocity_scale", defaults.velocity_scale),
            lattice_spacing: param_u64(params, "lattice_spacing", defaults.lattice_spacing as u64)
                as usize,
            fade_opacity: param_f64(params, "fade_opacity", defaults.fade_opacity),
            max_magnitude: param_f64(params, "max_magnitude", defaults.max_magnitude),
            color_stops: params
                .get("color_stops")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.color_stops),
            seed: param_u64(params, "seed", defaults.seed),
        }
    }

    /// Validates every field, returning a descriptive error for the first
    /// degenerate value found.
    pub fn validate(&self) -> Result<(), FlowError> {
        if !(self.target_fps > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "target_fps must be > 0, got {}",
                self.target_fps
            )));
        }
        if !(self.particle_density > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "particle_density must be > 0, got {}",
                self.particle_density
            )));
        }
        if self.max_age == 0 {
            return Err(FlowError::InvalidConfig(
                "max_age must be at least 1 tick".into(),
            ));
        }
        if !(self.velocity_scale > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "velocity_scale must be > 0, got {}",
                self.velocity_scale
            )));
        }
        if self.lattice_spacing == 0 {
            return Err(FlowError::InvalidConfig(
                "lattice_spacing must be at least 1 pixel".into(),
            ));
        }
        if !(self.fade_opacity > 0.0 && self.fade_opacity <= 1.0) {
            return Err(FlowError::InvalidConfig(format!(
                "fade_opacity must be in (0, 1], got {}",
                self.fade_opacity
            )));
        }
        if !(self.max_magnitude > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "max_magnitude must be > 0, got {}",
                self.max_magnitude
            )));
        }
        if self.color_stops.is_empty() {
            return Err(FlowError::InvalidConfig(
                "color_stops must contain at least one color".into(),
            ));
        }
        Ok(())
    }

    /// Milliseconds between executed ticks at the target frame rate.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}

/// Extracts an `f64` from `params[name]`, returning `default` if missing or
/// wrong type.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `u64` from `params[name]`, returning `default` if missing,
/// negative, or wrong type.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}
