//! SVG fallback measurement.
//!
//! Used only when the native drawing stream measured nothing (a file whose
//! artwork is all text, say). Page one is rendered to SVG with text as
//! outlines, the SVG is parsed back, and its path lengths are scaled to
//! inches with the rendering's own sizing attributes. Later pages are not
//! covered.

use std::io::Write;

use crate::config::MeasureConfig;
use crate::document::{TextRendering, VectorDocument};
use crate::drawing::PageSize;
use crate::errors::FallbackError;
use crate::scale::ScaleRule;
use crate::svg::SvgDocument;
use crate::types::{Inches, InchesPerUnit, UserUnits};

/// What the fallback pass measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackMeasurement {
    pub user_length: UserUnits,
    pub inches_per_unit: InchesPerUnit,
    pub rule: ScaleRule,
    pub page_size: Option<PageSize>,
    /// Unrounded `user_length * inches_per_unit`.
    pub inches: Inches,
}

/// Measure page one of `document` through its SVG rendering.
///
/// Fails when the page cannot be rendered or parsed, or when the result
/// rounds to zero inches.
pub fn measure_fallback<D: VectorDocument>(
    document: &D,
    config: &MeasureConfig,
) -> Result<FallbackMeasurement, FallbackError> {
    if document.page_count() == 0 {
        return Err(FallbackError::NoPages);
    }
    let markup = document
        .render_svg(0, TextRendering::Outlines)
        .map_err(FallbackError::Render)?;
    let svg = if config.spool_fallback_svg {
        spool_and_parse(&markup)?
    } else {
        SvgDocument::parse(&markup)?
    };

    let page_size = document.page_size(0);
    let user_length = svg.total_length(config.svg_arclen_accuracy);
    let (inches_per_unit, rule) = svg.scale_context(page_size).resolve();
    let inches = user_length * inches_per_unit;
    crate::log::debug!(
        paths = svg.paths().len(),
        user_length = user_length.raw(),
        ipu = inches_per_unit.raw(),
        "measured fallback rendering"
    );

    if !inches.is_finite() || inches.rounded().raw() <= 0.0 {
        return Err(FallbackError::ZeroLength {
            user_length,
            inches_per_unit,
        });
    }
    Ok(FallbackMeasurement {
        user_length,
        inches_per_unit,
        rule,
        page_size,
        inches,
    })
}

/// Write the rendering to a temporary file and parse it back from disk.
/// The file is removed when the handle drops.
fn spool_and_parse(markup: &str) -> Result<SvgDocument, FallbackError> {
    let mut file = tempfile::Builder::new()
        .prefix("perimeter-")
        .suffix(".svg")
        .tempfile()?;
    file.write_all(markup.as_bytes())?;
    file.flush()?;
    crate::log::debug!(path = %file.path().display(), "spooled fallback rendering");
    SvgDocument::from_path(file.path()).map_err(FallbackError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::Page;
    use crate::errors::DocumentError;

    /// A document with no drawings whose rendering is fixed markup.
    struct Rendered {
        pages: usize,
        size: Option<PageSize>,
        svg: Result<&'static str, &'static str>,
    }

    impl VectorDocument for Rendered {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn page(&self, _index: usize) -> Result<Page, DocumentError> {
            Ok(Page::default())
        }

        fn page_size(&self, _index: usize) -> Option<PageSize> {
            self.size
        }

        fn render_svg(&self, _index: usize, text: TextRendering) -> Result<String, DocumentError> {
            assert_eq!(text, TextRendering::Outlines);
            self.svg
                .map(str::to_string)
                .map_err(|_| DocumentError::UnsupportedFormat { format: "test" })
        }
    }

    fn rendered(svg: &'static str) -> Rendered {
        Rendered {
            pages: 1,
            size: None,
            svg: Ok(svg),
        }
    }

    const LONG_LINE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="9.42in" height="1in" viewBox="0 0 942 100">
        <path d="M0 0 L942 0"/>
    </svg>"#;

    #[test]
    fn scales_user_units_to_inches() {
        let m = measure_fallback(&rendered(LONG_LINE), &MeasureConfig::default()).unwrap();
        assert!((m.user_length.raw() - 942.0).abs() < 1e-9);
        assert_eq!(m.rule, ScaleRule::ViewBoxWidth);
        assert_eq!(m.inches.rounded(), Inches(9.42));
    }

    #[test]
    fn spooled_rendering_gives_the_same_result() {
        let config = MeasureConfig::default().with_spooled_fallback(true);
        let spooled = measure_fallback(&rendered(LONG_LINE), &config).unwrap();
        let direct = measure_fallback(&rendered(LONG_LINE), &MeasureConfig::default()).unwrap();
        assert_eq!(spooled, direct);
    }

    #[test]
    fn page_size_scales_bare_view_box() {
        let doc = Rendered {
            pages: 1,
            size: Some(PageSize {
                width: 720.0,
                height: 720.0,
            }),
            svg: Ok(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1000 1000"><path d="M0 0 L500 0"/></svg>"#),
        };
        let m = measure_fallback(&doc, &MeasureConfig::default()).unwrap();
        assert_eq!(m.rule, ScaleRule::PageWidth);
        assert_eq!(m.inches.rounded(), Inches(5.0));
    }

    #[test]
    fn empty_rendering_is_zero_length() {
        let err = measure_fallback(
            &rendered(r#"<svg xmlns="http://www.w3.org/2000/svg"><text>only text</text></svg>"#),
            &MeasureConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FallbackError::ZeroLength { .. }));
    }

    #[test]
    fn tiny_lengths_round_to_zero() {
        // 0.04 px is 0.0004 in, which rounds away.
        let err = measure_fallback(
            &rendered(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L0.04 0"/></svg>"#),
            &MeasureConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FallbackError::ZeroLength { .. }));
    }

    #[test]
    fn render_and_parse_failures() {
        let no_pages = Rendered {
            pages: 0,
            size: None,
            svg: Ok(""),
        };
        assert!(matches!(
            measure_fallback(&no_pages, &MeasureConfig::default()),
            Err(FallbackError::NoPages)
        ));

        let broken = Rendered {
            pages: 1,
            size: None,
            svg: Err("renderer crashed"),
        };
        assert!(matches!(
            measure_fallback(&broken, &MeasureConfig::default()),
            Err(FallbackError::Render(_))
        ));

        assert!(matches!(
            measure_fallback(&rendered("<svg"), &MeasureConfig::default()),
            Err(FallbackError::Svg(_))
        ));
    }
}
