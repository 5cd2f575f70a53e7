use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use seebeck_reduce::config::Variant;

mod config;
mod inspect;
mod layout;
mod reduce;

use config::Overrides;

/// seebeck-reduce - Seebeck coefficient data reduction
#[derive(Parser)]
#[command(name = "seebeck-reduce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Acquisition program that wrote the records.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VariantArg {
    /// High temperature furnace program (17 fields)
    HighTemperature,
    /// Room temperature program (16 fields)
    RoomTemperature,
    /// Continuous temperature profile program (17 fields)
    Continuous,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::HighTemperature => Variant::HighTemperature,
            VariantArg::RoomTemperature => Variant::RoomTemperature,
            VariantArg::Continuous => Variant::Continuous,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce raw records into series, summary and manifest files
    Reduce {
        /// Raw record files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to the current directory)
        #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Program variant that wrote the records
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Pair each temperature difference with the previous voltage sample
        #[arg(long)]
        legacy_lag: bool,

        /// Decimal places in written tables
        #[arg(long)]
        decimals: Option<usize>,

        /// Header lines to skip
        #[arg(long, hide = true)]
        header_lines: Option<usize>,
    },

    /// Reduce a raw record and print its segments and fits
    Inspect {
        /// Raw record file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Program variant that wrote the record
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Pair each temperature difference with the previous voltage sample
        #[arg(long)]
        legacy_lag: bool,
    },

    /// Print the column layout in effect as TOML
    Layout {
        /// Program variant
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reduce {
            inputs,
            output_dir,
            variant,
            config,
            legacy_lag,
            decimals,
            header_lines,
        } => {
            let overrides = Overrides {
                variant: variant.map(Into::into),
                legacy_lag,
                decimals,
                header_lines,
            };
            reduce::run(inputs, output_dir, config, overrides)
        }
        Commands::Inspect {
            input,
            variant,
            config,
            legacy_lag,
        } => {
            let overrides = Overrides {
                variant: variant.map(Into::into),
                legacy_lag,
                ..Default::default()
            };
            inspect::run(input, config, overrides)
        }
        Commands::Layout { variant, config } => {
            let overrides = Overrides {
                variant: variant.map(Into::into),
                ..Default::default()
            };
            layout::run(config, overrides)
        }
    }
}
