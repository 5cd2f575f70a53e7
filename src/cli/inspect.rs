use anyhow::{Context, Result};
use std::path::PathBuf;

use seebeck_reduce::pipeline::Reducer;

use super::config::{Config, Overrides};

/// Reduce one raw record and print what was found
pub fn run(input: PathBuf, config_path: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let config = Config::load(config_path.as_deref())?.resolve(&overrides);
    let reducer = Reducer::new(config).context("Invalid reduction configuration")?;
    let report = reducer
        .reduce_file(&input)
        .with_context(|| format!("Failed to reduce {}", input.display()))?;

    println!("Seebeck Run Information");
    println!("=======================");
    println!("File: {}", input.display());
    println!();

    println!("Record:");
    println!("  Raw lines: {}", report.raw_lines);
    println!("  Resampled points: {}", report.series.len());
    if let (Some(first), Some(last)) = (report.series.time.first(), report.series.time.last()) {
        println!("  Time span: {:.1} s .. {:.1} s", first, last);
    }
    println!();

    println!("Segments:");
    println!(
        "  {:>3}  {:>11}  {:>7}  {:>12}  {:>8}  {:>12}  {:>8}",
        "#", "range", "T (°C)", "S_low", "r²_low", "S_high", "r²_high"
    );
    for (i, fit) in report.fits.iter().enumerate() {
        println!(
            "  {:3}  {:>11}  {:7.2}  {:12.4}  {:8.5}  {:12.4}  {:8.5}",
            i + 1,
            format!("{}-{}", fit.segment.start, fit.segment.stop),
            fit.segment.temperature,
            fit.low.slope,
            fit.low.r_squared,
            fit.high.slope,
            fit.high.r_squared
        );
    }

    Ok(())
}
