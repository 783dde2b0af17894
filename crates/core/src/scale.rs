//! Magnitude-to-color bucket table for particle trails.
//!
//! A [`ColorScale`] divides `[0, max_magnitude]` into one bucket per color
//! stop. Bucket selection is floor-indexed and monotonic: a larger magnitude
//! never maps to an earlier stop. Magnitudes past the top saturate at the
//! last stop.

use crate::error::FlowError;

/// An RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

/// Parses a hex color string like "#ff8800" or "ff8800" (case insensitive)
/// into an opaque RGBA value.
pub fn parse_hex(hex: &str) -> Result<Rgba, FlowError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FlowError::InvalidColor(hex.to_string()));
    }
    let parse = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| FlowError::InvalidColor(hex.to_string()))
    };
    Ok([parse(0..2)?, parse(2..4)?, parse(4..6)?, 255])
}

/// A monotonic magnitude-to-color bucket table.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    max_magnitude: f64,
}

impl ColorScale {
    /// Creates a scale from hex color stops spanning `[0, max_magnitude]`.
    ///
    /// Requires at least one stop and a positive, finite `max_magnitude`.
    pub fn from_hex(stops: &[impl AsRef<str>], max_magnitude: f64) -> Result<Self, FlowError> {
        if stops.is_empty() {
            return Err(FlowError::InvalidScale(
                "color scale requires at least 1 stop".into(),
            ));
        }
        if !(max_magnitude > 0.0 && max_magnitude.is_finite()) {
            return Err(FlowError::InvalidScale(format!(
                "max_magnitude must be positive and finite, got {max_magnitude}"
            )));
        }
        let colors = stops
            .iter()
            .map(|s| parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            colors,
            max_magnitude,
        })
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for constructed scales.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the bucket color for a magnitude.
    ///
    /// Negative and NaN magnitudes map to the first bucket; magnitudes at or
    /// above `max_magnitude` map to the last.
    pub fn bucket(&self, magnitude: f64) -> Rgba {
        let n = self.colors.len();
        if !(magnitude > 0.0) {
            return self.colors[0];
        }
        let idx = ((magnitude / self.max_magnitude) * n as f64) as usize;
        self.colors[idx.min(n - 1)]
    }
}
