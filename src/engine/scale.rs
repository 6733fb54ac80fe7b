//! Scale factor model: raw input validation and pixel conversion

/// User-calibrated pixels-per-millimeter multiplier.
///
/// Invalid input never corrupts the stored factor: the last accepted value is
/// retained, or the default of 1.0 if nothing was ever accepted.
#[derive(Debug, Clone)]
pub struct ScaleModel {
    factor: f64,
    last_input_accepted: bool,
}

pub const DEFAULT_SCALE_FACTOR: f64 = 1.0;

impl ScaleModel {
    pub fn new() -> Self {
        Self::with_factor(DEFAULT_SCALE_FACTOR)
    }

    /// Start from a pre-validated factor (e.g. from config). Non-positive or
    /// non-finite values fall back to the default.
    pub fn with_factor(factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            DEFAULT_SCALE_FACTOR
        };
        Self {
            factor,
            last_input_accepted: true,
        }
    }

    /// Parse raw input as the new scale factor.
    ///
    /// Rejected input (unparseable, non-positive, or non-finite) is silently
    /// absorbed and the previous factor kept; whether the last call was
    /// accepted is observable via [`last_input_accepted`](Self::last_input_accepted).
    /// Returns the current factor either way.
    pub fn set_scale(&mut self, raw: &str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {
                self.factor = value;
                self.last_input_accepted = true;
            }
            _ => {
                log::debug!("rejected scale input {:?}, keeping {}", raw, self.factor);
                self.last_input_accepted = false;
            }
        }
        self.factor
    }

    /// Current factor in pixels per millimeter.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Whether the most recent `set_scale` call was accepted.
    pub fn last_input_accepted(&self) -> bool {
        self.last_input_accepted
    }

    /// Pixel size for a physical target size.
    pub fn pixel_size(&self, size_mm: f64) -> f64 {
        self.factor * size_mm
    }
}

impl Default for ScaleModel {
    fn default() -> Self {
        Self::new()
    }
}
