//! Path accumulator: turns one drawing's operation stream into a length.
//!
//! The accumulator is a two-state machine. `Idle` holds no current point;
//! `InSubpath` tracks where the subpath started, where the pen is, and how
//! far it has travelled. A subpath is committed to the drawing total when
//! the next `MoveTo` arrives or the stream ends, and only if it is at least
//! [`MeasureConfig::min_subpath_length`] long, so specks from hatching or
//! font hinting do not inflate the result.
//!
//! Rectangles are the exception: they go straight to the drawing total and
//! never touch the subpath or the minimum filter.

use crate::config::MeasureConfig;
use crate::drawing::{Drawing, PathOperation, Point};
use crate::geometry::CubicSegment;
use crate::types::Points;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SubpathState {
    Idle,
    InSubpath {
        start: Point,
        current: Point,
        running: f64,
    },
}

/// Accumulates subpath lengths for a single drawing.
#[derive(Debug)]
pub struct PathAccumulator {
    config: MeasureConfig,
    state: SubpathState,
    total: f64,
    skipped: usize,
}

impl PathAccumulator {
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            config,
            state: SubpathState::Idle,
            total: 0.0,
            skipped: 0,
        }
    }

    /// Feed one operation.
    ///
    /// Operations that cannot be measured (unknown operators, a segment with
    /// no current point, a segment whose length overflows) are counted and
    /// skipped; they never abort the drawing.
    pub fn push(&mut self, op: &PathOperation) {
        if !op.is_well_formed() {
            self.skip(op, "non-finite operand");
            return;
        }
        let (tolerance, max_depth) = (self.config.flatten_tolerance, self.config.max_flatten_depth);
        let before = self.state;
        match (*op, self.state) {
            (PathOperation::MoveTo(p), _) => {
                self.commit();
                self.state = SubpathState::InSubpath {
                    start: p,
                    current: p,
                    running: 0.0,
                };
            }
            (PathOperation::LineTo(p), SubpathState::InSubpath { start, current, running }) => {
                self.state = SubpathState::InSubpath {
                    start,
                    current: p,
                    running: running + current.distance(p),
                };
            }
            (
                PathOperation::CurveTo(p1, p2, p3),
                SubpathState::InSubpath { start, current, running },
            ) => {
                let curve = CubicSegment::new(current, p1, p2, p3);
                self.state = SubpathState::InSubpath {
                    start,
                    current: p3,
                    running: running + curve.flattened_length(tolerance, max_depth),
                };
            }
            (PathOperation::ClosePath, SubpathState::InSubpath { start, current, running }) => {
                self.state = SubpathState::InSubpath {
                    start,
                    current: start,
                    running: running + current.distance(start),
                };
            }
            (PathOperation::Rect { width, height }, _) => {
                let perimeter = 2.0 * (width.abs() + height.abs());
                if (self.total + perimeter).is_finite() {
                    self.total += perimeter;
                } else {
                    self.skip(op, "length overflow");
                }
            }
            (PathOperation::Unknown, _) => self.skip(op, "unknown operator"),
            (_, SubpathState::Idle) => self.skip(op, "no current point"),
        }
        if let SubpathState::InSubpath { running, .. } = self.state {
            if !running.is_finite() {
                self.state = before;
                self.skip(op, "length overflow");
            }
        }
    }

    fn skip(&mut self, op: &PathOperation, reason: &str) {
        self.skipped += 1;
        crate::log::debug!(?op, reason, "skipping path operation");
    }

    /// Commit the open subpath if it clears the minimum length.
    fn commit(&mut self) {
        if let SubpathState::InSubpath { running, .. } = self.state {
            if !(self.total + running).is_finite() {
                crate::log::warn!(running, "dropping subpath that overflows the drawing total");
            } else if running >= self.config.min_subpath_length {
                self.total += running;
            } else if running > 0.0 {
                crate::log::debug!(running, "dropping subpath below minimum length");
            }
        }
        self.state = SubpathState::Idle;
    }

    /// Number of operations skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Close out the stream and return the drawing total.
    pub fn finish(mut self) -> Points {
        self.commit();
        Points(self.total)
    }
}

/// Total path length of one drawing, in the drawing's own units.
///
/// With `only_visible`, a drawing whose style says it is neither stroked nor
/// filled with a non-zero opacity measures zero.
pub fn drawing_length(drawing: &Drawing, config: &MeasureConfig, only_visible: bool) -> Points {
    if only_visible && !drawing.is_visible() {
        crate::log::debug!(ops = drawing.operations.len(), "skipping invisible drawing");
        return Points::ZERO;
    }
    let mut acc = PathAccumulator::new(*config);
    for op in &drawing.operations {
        acc.push(op);
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{DrawingStyle, Paint};
    use glam::dvec2;
    use PathOperation::*;

    fn measure(ops: Vec<PathOperation>) -> f64 {
        drawing_length(&Drawing::new(ops), &MeasureConfig::default(), false).raw()
    }

    #[test]
    fn polyline_is_exact() {
        let len = measure(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(3.0, 4.0)),
            LineTo(dvec2(3.0, 10.0)),
            ClosePath,
        ]);
        // 5 + 6 + back to origin (sqrt(9 + 100))
        assert_eq!(len, 5.0 + 6.0 + 109f64.sqrt());
    }

    #[test]
    fn closed_rectangle_path() {
        let len = measure(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(720.0, 0.0)),
            LineTo(dvec2(720.0, 360.0)),
            LineTo(dvec2(0.0, 360.0)),
            ClosePath,
        ]);
        assert_eq!(len, 2160.0);
    }

    #[test]
    fn short_subpath_is_dropped() {
        assert_eq!(measure(vec![MoveTo(dvec2(0.0, 0.0)), LineTo(dvec2(0.5, 0.0))]), 0.0);
    }

    #[test]
    fn short_subpath_dropped_but_long_one_kept() {
        let len = measure(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(0.5, 0.0)),
            MoveTo(dvec2(10.0, 0.0)),
            LineTo(dvec2(20.0, 0.0)),
        ]);
        assert_eq!(len, 10.0);
    }

    #[test]
    fn rect_bypasses_subpath_and_minimum() {
        // Counted in full even though it lands in the middle of a subpath
        // that is itself too short to commit.
        let len = measure(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(0.25, 0.0)),
            Rect { width: 3.0, height: -4.0 },
            LineTo(dvec2(0.5, 0.0)),
        ]);
        assert_eq!(len, 14.0);
        assert_eq!(measure(vec![Rect { width: 3.0, height: 4.0 }]), 14.0);
        assert_eq!(measure(vec![Rect { width: 0.1, height: 0.1 }]), 0.4);
    }

    #[test]
    fn segments_without_current_point_are_skipped() {
        let mut acc = PathAccumulator::new(MeasureConfig::default());
        acc.push(&LineTo(dvec2(100.0, 0.0)));
        acc.push(&ClosePath);
        acc.push(&CurveTo(dvec2(1.0, 1.0), dvec2(2.0, 2.0), dvec2(3.0, 3.0)));
        acc.push(&Unknown);
        acc.push(&MoveTo(dvec2(0.0, 0.0)));
        acc.push(&LineTo(dvec2(0.0, 2.0)));
        assert_eq!(acc.skipped(), 4);
        assert_eq!(acc.finish(), Points(2.0));
    }

    #[test]
    fn overflowing_segments_are_skipped() {
        let mut acc = PathAccumulator::new(MeasureConfig::default());
        acc.push(&MoveTo(dvec2(-1e308, 0.0)));
        acc.push(&LineTo(dvec2(1e308, 0.0)));
        acc.push(&Rect { width: 1e308, height: 1e308 });
        acc.push(&MoveTo(dvec2(0.0, 0.0)));
        acc.push(&LineTo(dvec2(5.0, 0.0)));
        assert_eq!(acc.skipped(), 2);
        assert_eq!(acc.finish(), Points(5.0));
    }

    #[test]
    fn close_path_returns_to_start() {
        let len = measure(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(4.0, 0.0)),
            ClosePath,
            LineTo(dvec2(0.0, 3.0)),
        ]);
        assert_eq!(len, 11.0);
    }

    #[test]
    fn curves_use_the_flattener() {
        let p0 = dvec2(0.0, 0.0);
        let (p1, p2, p3) = (dvec2(0.0, 50.0), dvec2(100.0, 50.0), dvec2(100.0, 0.0));
        let config = MeasureConfig::default();
        let expected = CubicSegment::new(p0, p1, p2, p3)
            .flattened_length(config.flatten_tolerance, config.max_flatten_depth);
        assert_eq!(measure(vec![MoveTo(p0), CurveTo(p1, p2, p3)]), expected);
    }

    #[test]
    fn visibility_filter() {
        let hidden = Drawing::new(vec![MoveTo(dvec2(0.0, 0.0)), LineTo(dvec2(10.0, 0.0))])
            .with_style(DrawingStyle {
                stroke: Some(Paint { opacity: 0.0 }),
                fill: None,
            });
        let config = MeasureConfig::default();
        assert_eq!(drawing_length(&hidden, &config, true), Points::ZERO);
        assert_eq!(drawing_length(&hidden, &config, false), Points(10.0));
    }

    #[test]
    fn zero_minimum_keeps_everything() {
        let config = MeasureConfig::new().with_min_subpath_length(0.0);
        let drawing = Drawing::new(vec![MoveTo(dvec2(0.0, 0.0)), LineTo(dvec2(0.5, 0.0))]);
        assert_eq!(drawing_length(&drawing, &config, false), Points(0.5));
    }
}
