use std::f64::consts::PI;

use crate::foundation::error::{KnobError, KnobResult};

/// Angular travel of a knob, cached in radians for the renderer's lifetime.
///
/// Degrees are measured in the surface's convention: 0 radians points along
/// the positive x axis and the y axis grows downward. The configured degree
/// bounds are shifted by -90° so that a `0..360` degree range visually starts
/// at the bottom of the dial rather than at 3 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleBounds {
    pub min_rad: f64,
    pub max_rad: f64,
}

impl AngleBounds {
    /// Precompute radian bounds from configured degree bounds.
    ///
    /// Non-finite inputs are rejected here; every later draw depends on these
    /// two numbers and a NaN would silently blank the control.
    pub fn from_degrees(min_degrees: f64, max_degrees: f64) -> KnobResult<Self> {
        if !min_degrees.is_finite() || !max_degrees.is_finite() {
            return Err(KnobError::validation(
                "min_degrees and max_degrees must be finite",
            ));
        }
        Ok(Self {
            min_rad: (min_degrees - 90.0) * PI / 180.0,
            max_rad: (max_degrees - 90.0) * PI / 180.0,
        })
    }

    /// Total radians of travel between the two bounds.
    pub fn range(&self) -> f64 {
        self.max_rad - self.min_rad
    }

    /// Signed rotation offset for a percentage reading.
    ///
    /// `delta(50)` is 0; `delta(0)` and `delta(100)` are `range/2` with
    /// opposite signs. Percentages outside [0, 100] extrapolate linearly by
    /// design, the caller owns clamping if it wants any.
    pub fn delta(&self, percentage: f64) -> f64 {
        self.range() * (50.0 - percentage) / 100.0
    }
}
