//! Geometry helpers for length measurement.

pub mod flatten;

pub use flatten::CubicSegment;
