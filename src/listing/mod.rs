//! Drawing listing documents.
//!
//! A drawing listing is a plain-text dump of a vector document: per page,
//! the drawings with their PDF path operators and style, plus text runs
//! with their glyph outlines. It is the document format the measurement
//! engine reads natively, and it can render any page back to SVG for the
//! fallback pass.

mod parse;
mod render;

use std::path::Path;

use pest_derive::Parser;

use crate::document::{DocumentOpener, TextRendering, VectorDocument};
use crate::drawing::{Drawing, DrawingStyle, Page, PageSize, PathOperation};
use crate::errors::DocumentError;

pub use parse::parse_listing;
pub use render::render_page;

#[derive(Parser)]
#[grammar = "listing/listing.pest"]
pub struct ListingParser;

/// One path operator as written: name and operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub args: Vec<f64>,
}

impl Operator {
    pub fn to_operation(&self) -> PathOperation {
        PathOperation::from_operator(&self.name, &self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingDrawing {
    pub operators: Vec<Operator>,
    pub style: Option<DrawingStyle>,
}

impl ListingDrawing {
    pub fn to_drawing(&self) -> Drawing {
        Drawing {
            operations: self.operators.iter().map(Operator::to_operation).collect(),
            style: self.style,
        }
    }
}

/// A text run and its glyph outlines as SVG path data.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub label: String,
    pub outline: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingPage {
    pub size: Option<PageSize>,
    pub drawings: Vec<ListingDrawing>,
    pub texts: Vec<TextRun>,
}

impl ListingPage {
    /// The drawing stream the measurement engine sees. Text is not part of it.
    pub fn to_page(&self) -> Page {
        Page {
            size: self.size,
            drawings: self.drawings.iter().map(ListingDrawing::to_drawing).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    pub pages: Vec<ListingPage>,
}

/// An open listing; implements [`VectorDocument`].
#[derive(Debug, Clone)]
pub struct ListingDocument {
    name: String,
    listing: Listing,
}

impl ListingDocument {
    pub fn parse(name: &str, source: &str) -> Result<ListingDocument, DocumentError> {
        Ok(ListingDocument {
            name: name.to_string(),
            listing: parse_listing(name, source)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    fn listing_page(&self, index: usize) -> Result<&ListingPage, DocumentError> {
        self.listing
            .pages
            .get(index)
            .ok_or(DocumentError::PageOutOfRange {
                index,
                count: self.listing.pages.len(),
            })
    }
}

impl VectorDocument for ListingDocument {
    fn page_count(&self) -> usize {
        self.listing.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page, DocumentError> {
        Ok(self.listing_page(index)?.to_page())
    }

    fn page_size(&self, index: usize) -> Option<PageSize> {
        self.listing.pages.get(index).and_then(|page| page.size)
    }

    fn render_svg(&self, index: usize, text: TextRendering) -> Result<String, DocumentError> {
        Ok(render_page(self.listing_page(index)?, text))
    }
}

/// Binary formats recognised by their magic bytes.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "PDF"),
    (b"%!PS-Adobe", "PostScript"),
    (b"\x89PNG", "PNG"),
    (b"\xFF\xD8\xFF", "JPEG"),
];

/// Opens drawing listings from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOpener;

impl DocumentOpener for ListingOpener {
    type Document = ListingDocument;

    fn open(&self, path: &Path) -> Result<ListingDocument, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if let Some(&(_, format)) = SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
            return Err(DocumentError::UnsupportedFormat { format });
        }
        let source = String::from_utf8(bytes)
            .map_err(|_| DocumentError::UnsupportedFormat { format: "binary" })?;
        ListingDocument::parse(&path.display().to_string(), &source)
    }
}
