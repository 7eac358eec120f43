//! Error types with rich diagnostics using miette
//!
//! Document-level failures carry source spans where the input is text, and
//! every fatal error names its concrete cause plus a hint on how to act.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::{InchesPerUnit, NumericError, UserUnits};

// ============================================================================
// Document Errors
// ============================================================================

/// Errors raised by a document collaborator (opening, reading pages, rendering)
#[derive(Error, Diagnostic, Debug)]
pub enum DocumentError {
    #[error("could not read {path}")]
    #[diagnostic(code(perimeter::document::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error: {message}")]
    #[diagnostic(code(perimeter::document::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{format} documents are not supported by this reader")]
    #[diagnostic(
        code(perimeter::document::unsupported_format),
        help("export the drawing as a drawing listing")
    )]
    UnsupportedFormat { format: &'static str },

    #[error("page {index} is out of range (document has {count} pages)")]
    #[diagnostic(code(perimeter::document::page_out_of_range))]
    PageOutOfRange { index: usize, count: usize },
}

// ============================================================================
// SVG Errors
// ============================================================================

/// Errors that occur while reading an SVG rendering
#[derive(Error, Diagnostic, Debug)]
pub enum SvgError {
    #[error("could not read SVG file {path}")]
    #[diagnostic(code(perimeter::svg::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed SVG document")]
    #[diagnostic(code(perimeter::svg::xml))]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{tag}>, expected <svg>")]
    #[diagnostic(code(perimeter::svg::not_svg))]
    NotSvg { tag: String },
}

// ============================================================================
// Fallback Errors
// ============================================================================

/// Reasons the SVG fallback could not produce a length
#[derive(Error, Diagnostic, Debug)]
pub enum FallbackError {
    #[error("could not reopen the document for rendering")]
    #[diagnostic(code(perimeter::fallback::open))]
    Open(#[source] DocumentError),

    #[error("document has no pages to render")]
    #[diagnostic(code(perimeter::fallback::no_pages))]
    NoPages,

    #[error("could not render page 1 as SVG")]
    #[diagnostic(code(perimeter::fallback::render))]
    Render(#[source] DocumentError),

    #[error("could not spool the SVG rendering to a temporary file")]
    #[diagnostic(code(perimeter::fallback::spool))]
    Spool(#[from] std::io::Error),

    #[error("could not parse the SVG rendering")]
    #[diagnostic(code(perimeter::fallback::svg))]
    Svg(#[from] SvgError),

    #[error("SVG rendering measured zero length ({user_length} at {inches_per_unit})")]
    #[diagnostic(code(perimeter::fallback::zero_length))]
    ZeroLength {
        user_length: UserUnits,
        inches_per_unit: InchesPerUnit,
    },
}

// ============================================================================
// User-Facing Errors
// ============================================================================

/// Errors surfaced by a measurement call
#[derive(Error, Diagnostic, Debug)]
pub enum MeasureError {
    #[error("file not found: {reference}")]
    #[diagnostic(
        code(perimeter::input_not_found),
        help("check the file reference and the configured site roots")
    )]
    InputNotFound { reference: String },

    #[error("cannot open {path} with the vector document reader")]
    #[diagnostic(
        code(perimeter::unsupported_document),
        help("make sure the file is a compatible vector document, or export it as a drawing listing")
    )]
    UnsupportedDocument {
        path: String,
        #[source]
        #[diagnostic_source]
        source: DocumentError,
    },

    #[error(
        "measured length is zero for {reference}: the file may contain only raster images \
         or non-vector content (or content hidden in unsupported constructs)"
    )]
    #[diagnostic(
        code(perimeter::measurement_unavailable),
        help("try exporting outlines from the drawing tool, or send a compatible vector export")
    )]
    MeasurementUnavailable {
        reference: String,
        #[source]
        source: FallbackError,
    },

    #[error("invalid configuration value for {field}: {source}")]
    #[diagnostic(code(perimeter::invalid_config))]
    InvalidConfig {
        field: &'static str,
        source: NumericError,
    },
}
