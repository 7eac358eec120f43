//! Unit and scale resolution for SVG renderings.
//!
//! An SVG measures its geometry in user units. How big a user unit is
//! physically comes from the root element's `width`/`height` (which carry
//! real units) together with its `viewBox` (which says how many user units
//! those dimensions span). When that information is missing we fall back
//! to the page size of the source document, then to the CSS pixel.

use std::fmt;

use crate::config::{DEFAULT_INCHES_PER_USER_UNIT, POINTS_PER_INCH};
use crate::drawing::PageSize;
use crate::types::{Inches, InchesPerUnit};

const LENGTH_PATTERN: &str = r"(?i)^\s*([+-]?\d+(?:\.\d+)?)\s*([a-z%]*)\s*$";

/// Inches per unit suffix; unknown suffixes (including `%`) count as pixels.
fn unit_to_inches(unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "in" => 1.0,
        "mm" => 1.0 / 25.4,
        "cm" => 1.0 / 2.54,
        "pt" => 1.0 / 72.0,
        "pc" => 1.0 / 6.0,
        _ => DEFAULT_INCHES_PER_USER_UNIT,
    }
}

/// Parse an SVG length such as `"10in"`, `"210mm"` or `"800"` into inches.
///
/// Returns `None` for anything that does not look like a number with an
/// optional unit suffix. The sign is kept; callers decide what is usable.
pub fn parse_length(text: &str) -> Option<Inches> {
    let re = regex_lite::Regex::new(LENGTH_PATTERN).ok()?;
    let caps = re.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2).map_or("", |m| m.as_str());
    Some(Inches(value * unit_to_inches(unit)))
}

/// A length that can be used as a physical dimension: positive and finite.
fn usable_length(text: Option<&str>) -> Option<Inches> {
    parse_length(text?).filter(|inches| inches.is_finite() && inches.raw() > 0.0)
}

/// The `viewBox` of an SVG root: origin and extent in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Four numbers separated by commas and/or whitespace.
    pub fn parse(text: &str) -> Option<ViewBox> {
        let values: Vec<f64> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<_>>()?;
        match values[..] {
            [x, y, width, height] => Some(ViewBox { x, y, width, height }),
            _ => None,
        }
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Which rule produced an [`InchesPerUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleRule {
    ViewBoxWidth,
    ViewBoxHeight,
    PageWidth,
    PageHeight,
    Default,
}

/// Everything known about the physical size of an SVG rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleContext {
    pub page_size: Option<PageSize>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub view_box: Option<ViewBox>,
}

impl ScaleContext {
    /// Inches per user unit. Never fails: see [`ScaleContext::resolve`].
    pub fn inches_per_unit(&self) -> InchesPerUnit {
        self.resolve().0
    }

    /// Inches per user unit plus the rule that decided it.
    ///
    /// 1. viewBox width against the intrinsic width,
    /// 2. viewBox height against the intrinsic height,
    /// 3. viewBox against the page size (width, then height),
    /// 4. one CSS pixel.
    pub fn resolve(&self) -> (InchesPerUnit, ScaleRule) {
        let (ipu, rule) = self
            .from_intrinsic_size()
            .or_else(|| self.from_page_size())
            .unwrap_or((DEFAULT_INCHES_PER_USER_UNIT, ScaleRule::Default));
        crate::log::debug!(?rule, ipu, "resolved SVG scale");
        (InchesPerUnit(ipu), rule)
    }

    fn from_intrinsic_size(&self) -> Option<(f64, ScaleRule)> {
        let vb = self.view_box?;
        if let Some(width) = usable_length(self.width.as_deref()).filter(|_| vb.width != 0.0) {
            return Some((width.raw() / vb.width, ScaleRule::ViewBoxWidth));
        }
        let height = usable_length(self.height.as_deref()).filter(|_| vb.height != 0.0)?;
        Some((height.raw() / vb.height, ScaleRule::ViewBoxHeight))
    }

    fn from_page_size(&self) -> Option<(f64, ScaleRule)> {
        let vb = self.view_box?;
        let page = self.page_size?;
        if page.width > 0.0 && vb.width != 0.0 {
            Some((page.width / POINTS_PER_INCH / vb.width, ScaleRule::PageWidth))
        } else if page.height > 0.0 && vb.height != 0.0 {
            Some((page.height / POINTS_PER_INCH / vb.height, ScaleRule::PageHeight))
        } else {
            None
        }
    }
}
