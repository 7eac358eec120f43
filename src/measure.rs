//! The measurement entry point.
//!
//! Resolve the reference, open the document, sum every drawing on every
//! page. If that comes out empty, reopen the document and measure its SVG
//! rendering instead.

use std::fmt;
use std::path::Path;

use crate::aggregate::{DocumentTotal, EmptyResult};
use crate::config::MeasureConfig;
use crate::document::{DocumentOpener, FileResolver, SiteResolver, VectorDocument};
use crate::errors::{FallbackError, MeasureError};
use crate::fallback::measure_fallback;
use crate::listing::ListingOpener;
use crate::types::{Inches, Points};

/// Which pass produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Source {
    Native,
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Native => write!(f, "native"),
            Source::Fallback => write!(f, "fallback"),
        }
    }
}

/// Total path length of a document.
///
/// Inches and feet are rounded to three decimals; points are not.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementResult {
    pub length_points: f64,
    pub length_inches: f64,
    pub length_feet: f64,
    pub source: Source,
}

impl MeasurementResult {
    fn from_points(points: Points) -> Self {
        let inches = points.to_inches().rounded();
        MeasurementResult {
            length_points: points.raw(),
            length_inches: inches.raw(),
            length_feet: inches.to_feet().rounded().raw(),
            source: Source::Native,
        }
    }

    fn from_fallback(inches: Inches) -> Self {
        let rounded = inches.rounded();
        MeasurementResult {
            length_points: inches.to_points().raw(),
            length_inches: rounded.raw(),
            length_feet: rounded.to_feet().rounded().raw(),
            source: Source::Fallback,
        }
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in ({} ft, {} pt, {})",
            self.length_inches, self.length_feet, self.length_points, self.source
        )
    }
}

/// Measures documents found by a resolver and read by an opener.
#[derive(Debug, Clone)]
pub struct Measurer<R, O> {
    resolver: R,
    opener: O,
    config: MeasureConfig,
}

impl Measurer<SiteResolver, ListingOpener> {
    /// Listings under the current directory, default tuning.
    pub fn with_defaults() -> Self {
        Measurer {
            resolver: SiteResolver::current_dir(),
            opener: ListingOpener,
            config: MeasureConfig::default(),
        }
    }
}

impl<R: FileResolver, O: DocumentOpener> Measurer<R, O> {
    /// Fails if `config` holds a value the engine cannot use.
    pub fn new(resolver: R, opener: O, config: MeasureConfig) -> Result<Self, MeasureError> {
        config.validate()?;
        Ok(Measurer {
            resolver,
            opener,
            config,
        })
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Measure the document `reference` points at.
    ///
    /// With `only_visible`, drawings that are neither stroked nor filled are
    /// left out of the native pass.
    pub fn measure(
        &self,
        reference: &str,
        only_visible: bool,
    ) -> Result<MeasurementResult, MeasureError> {
        let path = self
            .resolver
            .resolve(reference)
            .ok_or_else(|| MeasureError::InputNotFound {
                reference: reference.to_string(),
            })?;

        match self.native_total(&path, only_visible)? {
            Ok(points) => {
                let result = MeasurementResult::from_points(points);
                crate::log::info!(
                    file = %path.display(),
                    points = result.length_points,
                    inches = result.length_inches,
                    feet = result.length_feet,
                    "measured drawing stream"
                );
                Ok(result)
            }
            Err(empty) => {
                crate::log::debug!(%empty, "native pass empty, trying SVG fallback");
                self.fallback(reference, &path)
            }
        }
    }

    /// Sum the drawing stream of every page. The document is closed before
    /// this returns, on every path.
    fn native_total(
        &self,
        path: &Path,
        only_visible: bool,
    ) -> Result<Result<Points, EmptyResult>, MeasureError> {
        let unsupported = |source| MeasureError::UnsupportedDocument {
            path: path.display().to_string(),
            source,
        };
        let document = self.opener.open(path).map_err(unsupported)?;
        let mut total = DocumentTotal::new(self.config, only_visible);
        for index in 0..document.page_count() {
            let page = document.page(index).map_err(unsupported)?;
            total.add_page(&page);
        }
        Ok(total.finish())
    }

    fn fallback(&self, reference: &str, path: &Path) -> Result<MeasurementResult, MeasureError> {
        let unavailable = |source| MeasureError::MeasurementUnavailable {
            reference: reference.to_string(),
            source,
        };
        let document = self
            .opener
            .open(path)
            .map_err(|err| unavailable(FallbackError::Open(err)))?;
        let measured = measure_fallback(&document, &self.config).map_err(unavailable)?;
        drop(document);

        crate::log::info!(
            file = %path.display(),
            user_length = measured.user_length.raw(),
            ipu = measured.inches_per_unit.raw(),
            rule = ?measured.rule,
            page_size = ?measured.page_size,
            "measured SVG fallback"
        );
        Ok(MeasurementResult::from_fallback(measured.inches))
    }
}

/// Measure a drawing listing relative to the current directory with the
/// default configuration.
pub fn measure_file(reference: &str, only_visible: bool) -> Result<MeasurementResult, MeasureError> {
    Measurer::with_defaults().measure(reference, only_visible)
}
