//! Render a listing page as SVG.
//!
//! Output is in points: `width`/`height` carry a `pt` unit and the viewBox
//! spans the same numbers, so one user unit is one point.

use super::{ListingDrawing, ListingPage, Operator, TextRun};
use crate::document::TextRendering;
use crate::drawing::{DrawingStyle, PageSize};

/// US Letter, the page size assumed when a listing page gives none.
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize {
    width: 612.0,
    height: 792.0,
};

/// Render one page. Drawings become `<path>` elements; text becomes outline
/// paths or `<text>` elements depending on `text`.
pub fn render_page(page: &ListingPage, text: TextRendering) -> String {
    let PageSize { width, height } = page.size.unwrap_or(DEFAULT_PAGE_SIZE);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}pt\" height=\"{height}pt\" viewBox=\"0 0 {width} {height}\">\n"
    );
    for drawing in &page.drawings {
        if let Some(element) = render_drawing(drawing) {
            svg.push_str("  ");
            svg.push_str(&element);
            svg.push('\n');
        }
    }
    for run in &page.texts {
        svg.push_str("  ");
        svg.push_str(&render_text(run, text));
        svg.push('\n');
    }
    svg.push_str("</svg>\n");
    svg
}

fn render_drawing(drawing: &ListingDrawing) -> Option<String> {
    let d = path_data(&drawing.operators);
    if d.is_empty() {
        return None;
    }
    Some(format!("<path d=\"{d}\"{}/>", paint_attributes(drawing.style)))
}

fn paint_attributes(style: Option<DrawingStyle>) -> String {
    let Some(style) = style else {
        return " fill=\"none\" stroke=\"black\"".to_string();
    };
    let mut attrs = String::new();
    match style.fill {
        Some(paint) => {
            attrs.push_str(" fill=\"black\"");
            if paint.opacity != 1.0 {
                attrs.push_str(&format!(" fill-opacity=\"{}\"", paint.opacity));
            }
        }
        None => attrs.push_str(" fill=\"none\""),
    }
    if let Some(paint) = style.stroke {
        attrs.push_str(" stroke=\"black\"");
        if paint.opacity != 1.0 {
            attrs.push_str(&format!(" stroke-opacity=\"{}\"", paint.opacity));
        }
    }
    attrs
}

fn render_text(run: &TextRun, text: TextRendering) -> String {
    let label = escape(&run.label);
    match text {
        TextRendering::Outlines => format!(
            "<g aria-label=\"{label}\"><path d=\"{}\" fill=\"black\"/></g>",
            escape(&run.outline)
        ),
        TextRendering::Glyphs => format!("<text>{label}</text>"),
    }
}

/// SVG path data for a run of PDF path operators.
///
/// Segments before the first move are dropped, as are operators SVG has no
/// equivalent for.
fn path_data(operators: &[Operator]) -> String {
    let mut parts = Vec::new();
    let mut has_current = false;
    for op in operators {
        match (op.name.as_str(), op.args.as_slice()) {
            ("m", &[x, y]) => {
                parts.push(format!("M {x} {y}"));
                has_current = true;
            }
            ("l", &[x, y]) if has_current => parts.push(format!("L {x} {y}")),
            ("c", &[x1, y1, x2, y2, x3, y3]) if has_current => {
                parts.push(format!("C {x1} {y1} {x2} {y2} {x3} {y3}"))
            }
            ("h", &[]) if has_current => parts.push("Z".to_string()),
            ("re", &[x, y, w, h]) => {
                parts.push(format!(
                    "M {x} {y} L {} {y} L {} {} L {x} {} Z",
                    x + w,
                    x + w,
                    y + h,
                    y + h
                ));
                has_current = true;
            }
            _ => {}
        }
    }
    parts.join(" ")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
