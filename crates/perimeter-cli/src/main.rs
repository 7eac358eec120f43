//! `perimeter` command: measure the total path length of a drawing.
//!
//! ```text
//! perimeter /files/sign.listing --root public --root private
//! RUST_LOG=perimeter=debug perimeter drawing.listing --only-visible --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use perimeter::{ListingOpener, MeasureConfig, Measurer, SiteResolver};

/// Measure the vector path length of a drawing listing
#[derive(Parser)]
#[command(name = "perimeter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// File path or site-relative reference (e.g. /files/sign.listing)
    reference: String,

    /// Only count drawings that are stroked or filled
    #[arg(long)]
    only_visible: bool,

    /// Site root to resolve references against (repeatable)
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    roots: Vec<PathBuf>,

    /// Curve flattening tolerance, in points
    #[arg(long, default_value_t = perimeter::config::FLATTEN_TOLERANCE)]
    tolerance: f64,

    /// Subpaths shorter than this many points are ignored
    #[arg(long, default_value_t = perimeter::config::MIN_SUBPATH_LENGTH)]
    min_subpath: f64,

    /// Maximum curve subdivision depth
    #[arg(long, default_value_t = perimeter::config::MAX_FLATTEN_DEPTH)]
    max_depth: u32,

    /// Write the fallback SVG rendering to a temporary file before parsing it
    #[arg(long)]
    spool_svg: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MeasureConfig::new()
        .with_flatten_tolerance(cli.tolerance)
        .with_min_subpath_length(cli.min_subpath)
        .with_max_flatten_depth(cli.max_depth)
        .with_spooled_fallback(cli.spool_svg);

    let measurer = Measurer::new(
        SiteResolver::new(cli.roots).with_direct_paths(true),
        ListingOpener,
        config,
    )?;
    let result = measurer.measure(&cli.reference, cli.only_visible)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{result}");
    }
    Ok(())
}
