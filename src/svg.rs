//! SVG reader for fallback renderings.
//!
//! Collects every shape element of a document as an [`SvgPath`] together
//! with the root element's sizing attributes. Geometry stays in user units;
//! transforms are not applied.

use std::path::Path;

use kurbo::{BezPath, Circle, Ellipse, Line, ParamCurveArclen, Point, Rect, RoundedRect, Shape};

use crate::drawing::PageSize;
use crate::errors::SvgError;
use crate::scale::{ScaleContext, ViewBox};
use crate::types::UserUnits;

/// One measurable shape from an SVG document.
#[derive(Debug, Clone)]
pub enum SvgPath {
    Path(BezPath),
    Line(Line),
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
    Rect(Rect),
    RoundedRect(RoundedRect),
    Circle(Circle),
    Ellipse(Ellipse),
}

impl SvgPath {
    /// Outline length in user units.
    pub fn length(&self, accuracy: f64) -> UserUnits {
        let len = match self {
            SvgPath::Path(path) => path.segments().map(|seg| seg.arclen(accuracy)).sum::<f64>(),
            SvgPath::Line(line) => line.length(),
            SvgPath::Polyline(points) => polyline_length(points),
            SvgPath::Polygon(points) => {
                let closing = match (points.first(), points.last()) {
                    (Some(first), Some(last)) => last.distance(*first),
                    _ => 0.0,
                };
                polyline_length(points) + closing
            }
            SvgPath::Rect(rect) => rect.perimeter(accuracy),
            SvgPath::RoundedRect(rect) => rect.perimeter(accuracy),
            SvgPath::Circle(circle) => circle.perimeter(accuracy),
            SvgPath::Ellipse(ellipse) => ellipse.perimeter(accuracy),
        };
        UserUnits(len)
    }

    /// Build from a shape element; `None` for non-shapes and unusable shapes.
    fn from_node(node: roxmltree::Node<'_, '_>) -> Option<SvgPath> {
        let num = |name: &str| node.attribute(name).and_then(parse_number);
        let shape = match node.tag_name().name() {
            "path" => {
                let d = node.attribute("d")?;
                let path = BezPath::from_svg(d)
                    .inspect_err(|err| {
                        crate::log::warn!(%err, id = node.attribute("id"), "skipping path with malformed data");
                    })
                    .ok()?;
                SvgPath::Path(path)
            }
            "line" => SvgPath::Line(Line::new(
                (num("x1").unwrap_or(0.0), num("y1").unwrap_or(0.0)),
                (num("x2").unwrap_or(0.0), num("y2").unwrap_or(0.0)),
            )),
            "polyline" => SvgPath::Polyline(parse_points(node.attribute("points")?)),
            "polygon" => SvgPath::Polygon(parse_points(node.attribute("points")?)),
            "rect" => {
                let (x, y) = (num("x").unwrap_or(0.0), num("y").unwrap_or(0.0));
                let (width, height) = (num("width")?, num("height")?);
                if width <= 0.0 || height <= 0.0 {
                    return None;
                }
                let rect = Rect::new(x, y, x + width, y + height);
                let radius = num("rx").or_else(|| num("ry")).unwrap_or(0.0);
                if radius > 0.0 {
                    let radius = radius.min(width / 2.0).min(height / 2.0);
                    SvgPath::RoundedRect(RoundedRect::from_rect(rect, radius))
                } else {
                    SvgPath::Rect(rect)
                }
            }
            "circle" => {
                let r = num("r").filter(|r| *r > 0.0)?;
                SvgPath::Circle(Circle::new(
                    (num("cx").unwrap_or(0.0), num("cy").unwrap_or(0.0)),
                    r,
                ))
            }
            "ellipse" => {
                let rx = num("rx").filter(|r| *r > 0.0)?;
                let ry = num("ry").filter(|r| *r > 0.0)?;
                SvgPath::Ellipse(Ellipse::new(
                    (num("cx").unwrap_or(0.0), num("cy").unwrap_or(0.0)),
                    (rx, ry),
                    0.0,
                ))
            }
            _ => return None,
        };
        Some(shape)
    }
}

fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// A coordinate attribute: a plain number, optionally suffixed with `px`.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix("px").unwrap_or(text);
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `points="x1,y1 x2,y2 ..."`; a dangling odd coordinate is dropped.
fn parse_points(text: &str) -> Vec<Point> {
    let coords: Vec<f64> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map_while(|part| part.parse::<f64>().ok())
        .collect();
    coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// A parsed SVG document: root sizing attributes plus its shapes.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: Option<String>,
    height: Option<String>,
    view_box: Option<ViewBox>,
    paths: Vec<SvgPath>,
}

impl SvgDocument {
    pub fn parse(text: &str) -> Result<SvgDocument, SvgError> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        if !root.has_tag_name("svg") {
            return Err(SvgError::NotSvg {
                tag: root.tag_name().name().to_string(),
            });
        }
        let view_box = root
            .attribute("viewBox")
            .or_else(|| root.attribute("viewbox"))
            .and_then(|vb| {
                let parsed = ViewBox::parse(vb);
                if parsed.is_none() {
                    crate::log::debug!(view_box = vb, "ignoring malformed viewBox");
                }
                parsed
            });
        let paths: Vec<SvgPath> = root.descendants().filter_map(SvgPath::from_node).collect();
        crate::log::debug!(paths = paths.len(), "parsed SVG document");
        Ok(SvgDocument {
            width: root.attribute("width").map(str::to_string),
            height: root.attribute("height").map(str::to_string),
            view_box,
            paths,
        })
    }

    pub fn from_path(path: &Path) -> Result<SvgDocument, SvgError> {
        let text = std::fs::read_to_string(path).map_err(|source| SvgError::Io {
            path: path.display().to_string(),
            source,
        })?;
        SvgDocument::parse(&text)
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box
    }

    pub fn paths(&self) -> &[SvgPath] {
        &self.paths
    }

    /// Sum of every shape's length, in user units.
    pub fn total_length(&self, accuracy: f64) -> UserUnits {
        self.paths.iter().map(|path| path.length(accuracy)).sum()
    }

    /// Sizing information for the scale resolver.
    pub fn scale_context(&self, page_size: Option<PageSize>) -> ScaleContext {
        ScaleContext {
            page_size,
            width: self.width.clone(),
            height: self.height.clone(),
            view_box: self.view_box,
        }
    }
}
