//! Drawing data model: path operations, style metadata, pages.

use glam::{DVec2, dvec2};

/// A point in page points or SVG user units.
pub type Point = DVec2;

/// One drawing operation, in stream order.
///
/// Order is significant: every `MoveTo` opens a new subpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOperation {
    MoveTo(Point),
    LineTo(Point),
    /// Control points p1, p2 and endpoint p3; p0 is the current point.
    CurveTo(Point, Point, Point),
    ClosePath,
    /// An axis-aligned rectangle; only its extent matters for length.
    Rect { width: f64, height: f64 },
    /// Anything the engine does not measure (quads, unknown or malformed operators).
    Unknown,
}

impl PathOperation {
    /// Map a PDF-style path operator and its operands to an operation.
    ///
    /// `m x y`, `l x y`, `c x1 y1 x2 y2 x3 y3`, `h`, `re x y w h`. A wrong
    /// operand count, a non-finite operand or any other operator yields
    /// [`PathOperation::Unknown`].
    pub fn from_operator(name: &str, args: &[f64]) -> PathOperation {
        if args.iter().any(|v| !v.is_finite()) {
            return PathOperation::Unknown;
        }
        match (name, args) {
            ("m", &[x, y]) => PathOperation::MoveTo(dvec2(x, y)),
            ("l", &[x, y]) => PathOperation::LineTo(dvec2(x, y)),
            ("c", &[x1, y1, x2, y2, x3, y3]) => {
                PathOperation::CurveTo(dvec2(x1, y1), dvec2(x2, y2), dvec2(x3, y3))
            }
            ("h", &[]) => PathOperation::ClosePath,
            ("re", &[_x, _y, width, height]) => PathOperation::Rect { width, height },
            _ => PathOperation::Unknown,
        }
    }

    /// True unless the operation carries a NaN or infinite coordinate.
    pub fn is_well_formed(&self) -> bool {
        match *self {
            PathOperation::MoveTo(p) | PathOperation::LineTo(p) => p.is_finite(),
            PathOperation::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
            PathOperation::Rect { width, height } => width.is_finite() && height.is_finite(),
            PathOperation::ClosePath | PathOperation::Unknown => true,
        }
    }
}

/// A stroke or fill paint; only its opacity matters for visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub opacity: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Paint { opacity: 1.0 }
    }
}

/// Optional style metadata of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawingStyle {
    pub stroke: Option<Paint>,
    pub fill: Option<Paint>,
}

impl DrawingStyle {
    /// Visible when it has a stroke or a fill that is not fully transparent.
    pub fn is_visible(&self) -> bool {
        let painted = |paint: Option<Paint>| paint.is_some_and(|p| p.opacity > 0.0);
        painted(self.stroke) || painted(self.fill)
    }
}

/// An ordered operation stream plus optional style metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    pub operations: Vec<PathOperation>,
    pub style: Option<DrawingStyle>,
}

impl Drawing {
    pub fn new(operations: Vec<PathOperation>) -> Self {
        Drawing {
            operations,
            style: None,
        }
    }

    pub fn with_style(mut self, style: DrawingStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// A drawing without style metadata counts as visible.
    pub fn is_visible(&self) -> bool {
        self.style.as_ref().is_none_or(DrawingStyle::is_visible)
    }
}

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// One page: its size (when known) and its drawings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub size: Option<PageSize>,
    pub drawings: Vec<Drawing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pdf_operators() {
        assert_eq!(
            PathOperation::from_operator("m", &[1.0, 2.0]),
            PathOperation::MoveTo(dvec2(1.0, 2.0))
        );
        assert_eq!(
            PathOperation::from_operator("c", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            PathOperation::CurveTo(dvec2(1.0, 2.0), dvec2(3.0, 4.0), dvec2(5.0, 6.0))
        );
        assert_eq!(PathOperation::from_operator("h", &[]), PathOperation::ClosePath);
        assert_eq!(
            PathOperation::from_operator("re", &[10.0, 10.0, 3.0, -4.0]),
            PathOperation::Rect {
                width: 3.0,
                height: -4.0
            }
        );
    }

    #[test]
    fn malformed_operators_become_unknown() {
        assert_eq!(PathOperation::from_operator("l", &[1.0]), PathOperation::Unknown);
        assert_eq!(PathOperation::from_operator("qu", &[0.0; 8]), PathOperation::Unknown);
        assert_eq!(
            PathOperation::from_operator("l", &[f64::NAN, 0.0]),
            PathOperation::Unknown
        );
        assert_eq!(PathOperation::from_operator("h", &[1.0]), PathOperation::Unknown);
    }

    #[test]
    fn visibility_rules() {
        let invisible = DrawingStyle {
            stroke: Some(Paint { opacity: 0.0 }),
            fill: None,
        };
        let filled = DrawingStyle {
            stroke: None,
            fill: Some(Paint { opacity: 0.4 }),
        };
        assert!(!invisible.is_visible());
        assert!(filled.is_visible());
        assert!(!DrawingStyle::default().is_visible());
        assert!(Drawing::new(vec![]).is_visible());
        assert!(!Drawing::new(vec![]).with_style(invisible).is_visible());
    }
}
