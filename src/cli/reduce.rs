use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use seebeck_reduce::pipeline::{process_batch, Reducer};

use super::config::{Config, Overrides};

/// Reduce a batch of raw records into `output_dir`
pub fn run(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    overrides: Overrides,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?.resolve(&overrides);

    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    info!("Seebeck reduction");
    info!("=================");
    info!("Runs:      {}", inputs.len());
    info!("Output:    {}", output_dir.display());
    info!("Variant:   {}", config.variant);
    info!("Alignment: {:?}", config.fit_alignment);

    let reducer = Reducer::new(config).context("Invalid reduction configuration")?;
    let summary = process_batch(&reducer, &inputs, &output_dir);

    #[cfg(feature = "colorized_output")]
    {
        print!("{}", summary.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", summary);
    }

    // Exit with error code if any run failed
    if summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
