use camino::{Utf8Path, Utf8PathBuf};
use perimeter::{ListingOpener, MeasureConfig, Measurer, SiteResolver};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  fixture-report    Measure every test fixture and write fixture-report.md");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "fixture-report" => {
            if let Err(e) = fixture_report() {
                eprintln!("fixture-report failed: {e}");
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// One row of the report.
struct Row {
    name: String,
    outcome: Result<perimeter::MeasurementResult, String>,
}

fn workspace_root() -> Utf8PathBuf {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture_report() -> Result<(), Box<dyn std::error::Error>> {
    let root = workspace_root();
    let fixtures_dir = root.join("tests/fixtures");
    let output_path = root.join("fixture-report.md");

    let mut fixtures: Vec<Utf8PathBuf> = fs::read_dir(&fixtures_dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.path()).ok())
        .filter(|p| p.extension() == Some("listing"))
        .collect();
    fixtures.sort();

    let measurer = Measurer::new(
        SiteResolver::new(Vec::<PathBuf>::new()).with_direct_paths(true),
        ListingOpener,
        MeasureConfig::default(),
    )?;

    let rows: Vec<Row> = fixtures
        .par_iter()
        .map(|path| Row {
            name: path.file_name().unwrap_or(path.as_str()).to_string(),
            outcome: measurer
                .measure(path.as_str(), false)
                .map_err(|e| e.to_string()),
        })
        .collect();

    let mut report = String::new();
    report.push_str("# Fixture report\n\n");
    report.push_str("| Fixture | Source | Inches | Feet | Error |\n");
    report.push_str("|---|---|---:|---:|---|\n");
    let mut failures = 0;
    for row in &rows {
        match &row.outcome {
            Ok(result) => report.push_str(&format!(
                "| {} | {} | {} | {} | |\n",
                row.name, result.source, result.length_inches, result.length_feet
            )),
            Err(e) => {
                failures += 1;
                report.push_str(&format!("| {} | | | | {} |\n", row.name, e.replace('|', "\\|")));
            }
        }
    }
    report.push_str(&format!(
        "\n{} fixtures, {} measured, {} failed\n",
        rows.len(),
        rows.len() - failures,
        failures
    ));

    fs::write(&output_path, report)?;
    eprintln!("Wrote {output_path}");
    Ok(())
}
