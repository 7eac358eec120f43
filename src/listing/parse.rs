//! Parse pest pairs into a [`Listing`].

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use super::{Listing, ListingDrawing, ListingPage, ListingParser, Operator, Rule, TextRun};
use crate::drawing::{DrawingStyle, Paint, PageSize};
use crate::errors::DocumentError;

/// Source text being parsed, for error reporting.
struct Source<'a> {
    name: &'a str,
    text: &'a str,
}

impl Source<'_> {
    fn error(&self, span: impl Into<SourceSpan>, message: impl Into<String>) -> DocumentError {
        DocumentError::Syntax {
            message: message.into(),
            src: NamedSource::new(self.name, self.text.to_string()),
            span: span.into(),
        }
    }

    fn error_at(&self, pair: &Pair<Rule>, message: impl Into<String>) -> DocumentError {
        let span = pair.as_span();
        self.error((span.start(), span.end() - span.start()), message)
    }
}

/// Parse a drawing listing. `name` labels diagnostics.
pub fn parse_listing(name: &str, text: &str) -> Result<Listing, DocumentError> {
    let src = Source { name, text };
    let pairs = ListingParser::parse(Rule::listing, text).map_err(|err| {
        let span = match err.location {
            InputLocation::Pos(pos) => (pos, 0),
            InputLocation::Span((start, end)) => (start, end - start),
        };
        src.error(span, err.variant.message().into_owned())
    })?;

    let mut pages = Vec::new();
    for listing in pairs {
        for pair in listing.into_inner() {
            if pair.as_rule() == Rule::page {
                pages.push(parse_page(&src, pair)?);
            }
        }
    }
    crate::log::debug!(name, pages = pages.len(), "parsed listing");
    Ok(Listing { pages })
}

fn parse_page(src: &Source<'_>, pair: Pair<Rule>) -> Result<ListingPage, DocumentError> {
    let mut page = ListingPage::default();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::page_size => page.size = Some(parse_page_size(src, inner)?),
            Rule::drawing => page.drawings.push(parse_drawing(src, inner)?),
            Rule::text => page.texts.push(parse_text(inner)),
            _ => {}
        }
    }
    Ok(page)
}

fn parse_page_size(src: &Source<'_>, pair: Pair<Rule>) -> Result<PageSize, DocumentError> {
    let numbers = pair
        .clone()
        .into_inner()
        .map(|n| parse_number(src, &n))
        .collect::<Result<Vec<_>, _>>()?;
    match numbers[..] {
        [width, height] if width > 0.0 && height > 0.0 => Ok(PageSize { width, height }),
        _ => Err(src.error_at(&pair, "page size must be two positive numbers")),
    }
}

fn parse_number(src: &Source<'_>, pair: &Pair<Rule>) -> Result<f64, DocumentError> {
    pair.as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| src.error_at(pair, "number out of range"))
}

fn parse_drawing(src: &Source<'_>, pair: Pair<Rule>) -> Result<ListingDrawing, DocumentError> {
    let mut style = StyleBuilder::default();
    let mut operators = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::style => style.apply(src, inner)?,
            Rule::operation => operators.push(parse_operator(src, inner)?),
            _ => {}
        }
    }
    Ok(ListingDrawing {
        operators,
        style: style.build(),
    })
}

fn parse_operator(src: &Source<'_>, pair: Pair<Rule>) -> Result<Operator, DocumentError> {
    let mut name = String::new();
    let mut args = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::op_name => name = inner.as_str().to_string(),
            Rule::number => args.push(parse_number(src, &inner)?),
            _ => {}
        }
    }
    Ok(Operator { name, args })
}

fn parse_text(pair: Pair<Rule>) -> TextRun {
    let mut strings = pair
        .into_inner()
        .filter(|inner| inner.as_rule() == Rule::string)
        .map(|s| s.into_inner().next().map_or("", |body| body.as_str()).to_string());
    TextRun {
        label: strings.next().unwrap_or_default(),
        outline: strings.next().unwrap_or_default(),
    }
}

/// Collects `key=value` pairs of a drawing line.
///
/// A paint key (`stroke`, `fill`) set to anything but `none` makes that
/// paint present; its `-opacity` key sets the opacity. An opacity without
/// its paint has no effect. A drawing that names no known key has no style.
#[derive(Debug, Default)]
struct StyleBuilder {
    seen: bool,
    stroke: Option<bool>,
    stroke_opacity: Option<f64>,
    fill: Option<bool>,
    fill_opacity: Option<f64>,
}

impl StyleBuilder {
    fn apply(&mut self, src: &Source<'_>, pair: Pair<Rule>) -> Result<(), DocumentError> {
        let mut inner = pair.clone().into_inner();
        let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
            return Err(src.error_at(&pair, "expected key=value"));
        };
        let painted = !value.as_str().eq_ignore_ascii_case("none");
        match key.as_str() {
            "stroke" => self.stroke = Some(painted),
            "fill" => self.fill = Some(painted),
            "stroke-opacity" => self.stroke_opacity = Some(parse_opacity(src, &value)?),
            "fill-opacity" => self.fill_opacity = Some(parse_opacity(src, &value)?),
            other => {
                crate::log::debug!(key = other, "ignoring unknown style key");
                return Ok(());
            }
        }
        self.seen = true;
        Ok(())
    }

    fn build(self) -> Option<DrawingStyle> {
        if !self.seen {
            return None;
        }
        let paint = |present: Option<bool>, opacity: Option<f64>| {
            present.unwrap_or(false).then(|| Paint {
                opacity: opacity.unwrap_or(1.0),
            })
        };
        Some(DrawingStyle {
            stroke: paint(self.stroke, self.stroke_opacity),
            fill: paint(self.fill, self.fill_opacity),
        })
    }
}

fn parse_opacity(src: &Source<'_>, pair: &Pair<Rule>) -> Result<f64, DocumentError> {
    pair.as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
        .ok_or_else(|| src.error_at(pair, "opacity must be a number between 0 and 1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Listing {
        parse_listing("test", text).unwrap()
    }

    #[test]
    fn parses_pages_drawings_and_text() {
        let listing = parse(
            r#"
# exported drawing
page 612 792

drawing stroke=#000 fill=none   # outline only
  m 0 0
  c 1 2 3 4 5 6
  re 10 10 -3.5 4e1
  h
end
text "A & B" outline "M 0 0 L 10 0"
endpage
"#,
        );
        assert_eq!(listing.pages.len(), 1);
        let page = &listing.pages[0];
        assert_eq!(page.size, Some(PageSize { width: 612.0, height: 792.0 }));
        let drawing = &page.drawings[0];
        assert_eq!(
            drawing.style,
            Some(DrawingStyle {
                stroke: Some(Paint { opacity: 1.0 }),
                fill: None,
            })
        );
        let names: Vec<&str> = drawing.operators.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, ["m", "c", "re", "h"]);
        assert_eq!(drawing.operators[2].args, [10.0, 10.0, -3.5, 40.0]);
        assert_eq!(
            page.texts,
            [TextRun {
                label: "A & B".to_string(),
                outline: "M 0 0 L 10 0".to_string(),
            }]
        );
    }

    #[test]
    fn hex_colours_are_not_comments() {
        let listing = parse(
            "page\ndrawing stroke=#000 fill=none  # comment\n  l 1 1\nend\n\
             drawing fill=#ccc fill-opacity=0.5\nend\nendpage\n",
        );
        let drawings = &listing.pages[0].drawings;
        assert_eq!(drawings.len(), 2);
        assert_eq!(
            drawings[0].style,
            Some(DrawingStyle {
                stroke: Some(Paint { opacity: 1.0 }),
                fill: None,
            })
        );
        assert_eq!(drawings[0].operators.len(), 1);
        assert_eq!(
            drawings[1].style,
            Some(DrawingStyle {
                stroke: None,
                fill: Some(Paint { opacity: 0.5 }),
            })
        );
    }

    #[test]
    fn empty_listing_has_no_pages() {
        assert!(parse("").pages.is_empty());
        assert!(parse("# nothing here\n\n").pages.is_empty());
    }

    #[test]
    fn unknown_operators_and_keys_are_kept_or_ignored() {
        let listing = parse("page\ndrawing dash=3\n  qu 0 0 1 1 2 2 3 3\n  f*\nend\nendpage\n");
        let drawing = &listing.pages[0].drawings[0];
        assert_eq!(drawing.style, None);
        assert_eq!(drawing.operators.len(), 2);
        assert_eq!(drawing.operators[1].name, "f*");
        assert!(drawing.operators[1].args.is_empty());
    }

    #[test]
    fn opacity_applies_to_present_paint() {
        let listing = parse(
            "page\ndrawing stroke=red stroke-opacity=0 fill-opacity=0.5\nend\nendpage\n",
        );
        let style = listing.pages[0].drawings[0].style.unwrap();
        assert_eq!(style.stroke, Some(Paint { opacity: 0.0 }));
        assert_eq!(style.fill, None);
        assert!(!style.is_visible());
    }

    #[test]
    fn syntax_errors_carry_a_span() {
        let err = parse_listing("bad", "page 612 792\ndrawing\n  l 1 x\nend\nendpage\n").unwrap_err();
        match err {
            DocumentError::Syntax { span, .. } => assert_eq!(span.offset(), 27),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_opacity_is_a_syntax_error() {
        let err = parse_listing("bad", "page\ndrawing fill=red fill-opacity=2\nend\nendpage\n")
            .unwrap_err();
        match err {
            DocumentError::Syntax { span, message, .. } => {
                assert_eq!(span.offset(), 35);
                assert!(message.contains("opacity"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_page_size() {
        assert!(parse_listing("bad", "page 0 792\nendpage\n").is_err());
    }
}
