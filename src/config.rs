//! Tuning constants and the measurement configuration.
//!
//! Lengths are in the unit of the geometry being measured: points for page
//! drawings, user units for SVG paths.

use crate::errors::MeasureError;
use crate::types::{NumericError, check_non_negative, check_positive};

/// Stop subdividing a cubic once control polygon and chord differ by less than this.
pub const FLATTEN_TOLERANCE: f64 = 0.25;
/// Hard bound on cubic subdivision depth.
pub const MAX_FLATTEN_DEPTH: u32 = 12;
/// Subpaths shorter than this are treated as specks and dropped.
pub const MIN_SUBPATH_LENGTH: f64 = 0.75;
/// Accuracy handed to kurbo when measuring SVG segments.
pub const SVG_ARCLEN_ACCURACY: f64 = 1e-3;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const INCHES_PER_FOOT: f64 = 12.0;
/// CSS reference pixel; the last-resort SVG user unit.
pub const DEFAULT_INCHES_PER_USER_UNIT: f64 = 1.0 / 96.0;

/// Tuning for one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureConfig {
    pub flatten_tolerance: f64,
    pub max_flatten_depth: u32,
    pub min_subpath_length: f64,
    pub svg_arclen_accuracy: f64,
    /// Write the fallback rendering to a temporary file and parse it back from disk.
    pub spool_fallback_svg: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            flatten_tolerance: FLATTEN_TOLERANCE,
            max_flatten_depth: MAX_FLATTEN_DEPTH,
            min_subpath_length: MIN_SUBPATH_LENGTH,
            svg_arclen_accuracy: SVG_ARCLEN_ACCURACY,
            spool_fallback_svg: false,
        }
    }
}

impl MeasureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flatten_tolerance(mut self, tolerance: f64) -> Self {
        self.flatten_tolerance = tolerance;
        self
    }

    pub fn with_max_flatten_depth(mut self, depth: u32) -> Self {
        self.max_flatten_depth = depth;
        self
    }

    pub fn with_min_subpath_length(mut self, length: f64) -> Self {
        self.min_subpath_length = length;
        self
    }

    pub fn with_svg_arclen_accuracy(mut self, accuracy: f64) -> Self {
        self.svg_arclen_accuracy = accuracy;
        self
    }

    pub fn with_spooled_fallback(mut self, spool: bool) -> Self {
        self.spool_fallback_svg = spool;
        self
    }

    /// Reject values the engine cannot work with.
    ///
    /// The flatten tolerance and SVG accuracy must be finite and positive; the
    /// minimum subpath length may be zero (keep everything) but not negative.
    /// Subdivision depth may not exceed [`MAX_FLATTEN_DEPTH`].
    pub fn validate(&self) -> Result<(), MeasureError> {
        if self.max_flatten_depth > MAX_FLATTEN_DEPTH {
            return Err(MeasureError::InvalidConfig {
                field: "max_flatten_depth",
                source: NumericError::AboveMaximum(f64::from(MAX_FLATTEN_DEPTH)),
            });
        }
        check_positive(self.flatten_tolerance).map_err(|source| MeasureError::InvalidConfig {
            field: "flatten_tolerance",
            source,
        })?;
        check_non_negative(self.min_subpath_length).map_err(|source| {
            MeasureError::InvalidConfig {
                field: "min_subpath_length",
                source,
            }
        })?;
        check_positive(self.svg_arclen_accuracy).map_err(|source| MeasureError::InvalidConfig {
            field: "svg_arclen_accuracy",
            source,
        })?;
        Ok(())
    }
}
