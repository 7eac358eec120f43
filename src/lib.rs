//! Vector path length ("perimeter") measurement for technical drawings.
//!
//! The engine walks the drawing operations of every page, adds up the
//! length of each subpath (curves by adaptive subdivision), drops specks,
//! and reports the total in points, inches and feet. When a document has
//! no measurable drawing stream, page one is rendered to SVG with text as
//! outlines and measured from that instead.
//!
//! ```no_run
//! let result = perimeter::measure_file("drawings/sign.listing", false)?;
//! println!("{result}");
//! # Ok::<(), perimeter::MeasureError>(())
//! ```

pub mod accumulate;
pub mod aggregate;
pub mod config;
pub mod document;
pub mod drawing;
pub mod errors;
pub mod fallback;
pub mod geometry;
pub mod listing;
pub mod log;
pub mod measure;
pub mod scale;
pub mod svg;
pub mod types;

pub use config::MeasureConfig;
pub use document::{DocumentOpener, FileResolver, SiteResolver, TextRendering, VectorDocument};
pub use drawing::{Drawing, DrawingStyle, Page, PageSize, Paint, PathOperation};
pub use errors::{DocumentError, FallbackError, MeasureError, SvgError};
pub use listing::{ListingDocument, ListingOpener};
pub use measure::{MeasurementResult, Measurer, Source, measure_file};
pub use types::{Feet, Inches, InchesPerUnit, Points, UserUnits};
