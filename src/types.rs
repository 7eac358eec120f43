//! Strongly-typed length primitives for perimeter measurement (zero-cost newtypes).
//!
//! Page geometry is measured in PostScript points, SVG geometry in user units,
//! and results are reported in inches and feet. Keeping them apart means a
//! conversion can only happen through a named method or a scale factor.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use crate::config::{INCHES_PER_FOOT, POINTS_PER_INCH};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
    /// Value is above the largest accepted value
    AboveMaximum(f64),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::AboveMaximum(max) => write!(f, "value exceeds the maximum of {max}"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a value that must be finite and strictly positive.
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    let val = check_non_negative(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else {
        Ok(val)
    }
}

/// Validate a value that must be finite and not negative.
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Round to three decimals, the precision results are reported with.
///
/// Rounds the exact binary value, so `0.0045` (stored just below the tie)
/// becomes `0.004`. Scaling by 1000 first would round the product instead
/// and land on `0.005`.
pub fn round3(val: f64) -> f64 {
    if !val.is_finite() {
        return val;
    }
    format!("{val:.3}").parse().unwrap_or(val)
}

macro_rules! length_newtype {
    ($(#[$meta:meta])* $name:ident, $suffix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: $name = $name(0.0);

            /// Get the raw value (use sparingly, prefer typed operations)
            #[inline]
            pub fn raw(self) -> f64 {
                self.0
            }

            /// Check if this length is finite (not NaN or infinite)
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name { $name(self.0 + rhs.0) }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name { $name(self.0 * rhs) }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                iter.fold($name::ZERO, |acc, l| acc + l)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }
    };
}

length_newtype!(
    /// Length in PostScript points (1/72 inch), the native page unit
    Points,
    "pt"
);

length_newtype!(
    /// Length in inches
    Inches,
    "in"
);

length_newtype!(
    /// Length in feet
    Feet,
    "ft"
);

length_newtype!(
    /// Length in SVG user units (before width/height/viewBox scaling)
    UserUnits,
    "uu"
);

impl Points {
    pub fn to_inches(self) -> Inches {
        Inches(self.0 / POINTS_PER_INCH)
    }
}

impl Inches {
    pub fn to_points(self) -> Points {
        Points(self.0 * POINTS_PER_INCH)
    }

    pub fn to_feet(self) -> Feet {
        Feet(self.0 / INCHES_PER_FOOT)
    }

    /// Round to the reported precision
    pub fn rounded(self) -> Inches {
        Inches(round3(self.0))
    }
}

impl Feet {
    /// Round to the reported precision
    pub fn rounded(self) -> Feet {
        Feet(round3(self.0))
    }
}

/// Physical size of one SVG user unit, in inches.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct InchesPerUnit(pub f64);

impl InchesPerUnit {
    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for InchesPerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}in/uu", self.0)
    }
}

/// UserUnits * InchesPerUnit = Inches
impl Mul<InchesPerUnit> for UserUnits {
    type Output = Inches;
    fn mul(self, rhs: InchesPerUnit) -> Inches {
        Inches(self.0 * rhs.0)
    }
}
