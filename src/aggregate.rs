//! Page and document totals.
//!
//! Pages are fed one at a time so a document can be read lazily; the
//! result is either a positive length in points or [`EmptyResult`], the
//! signal that the native drawing stream had nothing to measure.

use std::fmt;

use crate::accumulate::drawing_length;
use crate::config::MeasureConfig;
use crate::drawing::Page;
use crate::types::Points;

/// The native pass found no measurable geometry.
///
/// Not an error: it tells the caller to try the SVG fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyResult {
    pub pages: usize,
}

impl fmt::Display for EmptyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no measurable geometry on {} page(s)", self.pages)
    }
}

/// Sum of every drawing on one page.
pub fn page_length(page: &Page, config: &MeasureConfig, only_visible: bool) -> Points {
    page.drawings
        .iter()
        .map(|drawing| drawing_length(drawing, config, only_visible))
        .sum()
}

/// Running total over the pages of one document.
#[derive(Debug, Clone)]
pub struct DocumentTotal {
    config: MeasureConfig,
    only_visible: bool,
    total: Points,
    pages: usize,
}

impl DocumentTotal {
    pub fn new(config: MeasureConfig, only_visible: bool) -> Self {
        Self {
            config,
            only_visible,
            total: Points::ZERO,
            pages: 0,
        }
    }

    /// Add one page and return its own contribution.
    pub fn add_page(&mut self, page: &Page) -> Points {
        let length = page_length(page, &self.config, self.only_visible);
        crate::log::debug!(
            page = self.pages,
            drawings = page.drawings.len(),
            length = length.raw(),
            "measured page"
        );
        self.total += length;
        self.pages += 1;
        length
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn finish(self) -> Result<Points, EmptyResult> {
        if self.total.raw() > 0.0 {
            Ok(self.total)
        } else {
            Err(EmptyResult { pages: self.pages })
        }
    }
}

/// One-shot total over already-loaded pages.
pub fn aggregate_pages<'a>(
    pages: impl IntoIterator<Item = &'a Page>,
    config: &MeasureConfig,
    only_visible: bool,
) -> Result<Points, EmptyResult> {
    let mut total = DocumentTotal::new(*config, only_visible);
    for page in pages {
        total.add_page(page);
    }
    total.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Drawing, PathOperation::*};
    use glam::dvec2;

    fn square(side: f64) -> Drawing {
        Drawing::new(vec![
            MoveTo(dvec2(0.0, 0.0)),
            LineTo(dvec2(side, 0.0)),
            LineTo(dvec2(side, side)),
            LineTo(dvec2(0.0, side)),
            ClosePath,
        ])
    }

    #[test]
    fn sums_drawings_and_pages() {
        let pages = vec![
            Page {
                size: None,
                drawings: vec![square(1.0), square(2.0)],
            },
            Page {
                size: None,
                drawings: vec![square(10.0)],
            },
        ];
        let total = aggregate_pages(&pages, &MeasureConfig::default(), false).unwrap();
        assert_eq!(total, Points(4.0 + 8.0 + 40.0));
    }

    #[test]
    fn empty_document_signals_fallback() {
        let pages = vec![Page::default(), Page::default()];
        assert_eq!(
            aggregate_pages(&pages, &MeasureConfig::default(), false),
            Err(EmptyResult { pages: 2 })
        );
        assert_eq!(
            aggregate_pages(&Vec::<Page>::new(), &MeasureConfig::default(), false),
            Err(EmptyResult { pages: 0 })
        );
    }

    #[test]
    fn specks_alone_are_empty() {
        let page = Page {
            size: None,
            drawings: vec![Drawing::new(vec![MoveTo(dvec2(0.0, 0.0)), LineTo(dvec2(0.5, 0.0))])],
        };
        assert!(aggregate_pages([&page], &MeasureConfig::default(), false).is_err());
    }

    #[test]
    fn add_page_reports_its_contribution() {
        let mut total = DocumentTotal::new(MeasureConfig::default(), false);
        let page = Page {
            size: None,
            drawings: vec![square(5.0)],
        };
        assert_eq!(total.add_page(&page), Points(20.0));
        assert_eq!(total.add_page(&page), Points(20.0));
        assert_eq!(total.pages(), 2);
        assert_eq!(total.finish(), Ok(Points(40.0)));
    }
}
