//! # seebeck-reduce - Seebeck Coefficient Data Reduction
//!
//! `seebeck_reduce` turns the raw records written by a Seebeck measurement rig
//! into Seebeck coefficients, one per measured temperature plateau.
//!
//! The rig samples two thermocouple temperatures and two leg voltages, each at
//! its own instant, while a heater cycles a small temperature gradient across
//! the sample. Reduction runs these stages:
//!
//! 1. **Ingest**: read the raw record into per-channel sample sequences
//!    ([`ingest`])
//! 2. **Resample**: interpolate every channel onto one shared time base and
//!    derive the average temperature and temperature difference ([`resample`])
//! 3. **Correct**: remove each thermocouple leg's own thermoelectric voltage
//!    ([`correction`])
//! 4. **Segment**: find the oscillation windows from the state markers
//!    ([`segment`])
//! 5. **Fit**: least-squares slope of corrected voltage against temperature
//!    difference in each window ([`fit`])
//! 6. **Aggregate**: per-point and per-segment result tables ([`report`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seebeck_reduce::prelude::*;
//!
//! let reducer = Reducer::new(PipelineConfig::for_variant(Variant::RoomTemperature))?;
//! let report = reducer.reduce_file("run_01.txt")?;
//!
//! for row in &report.tables.summary {
//!     println!(
//!         "{:.2} °C: S_low = {:.3} µV/K, S_high = {:.3} µV/K",
//!         row.low.temperature, row.low.slope, row.high.slope
//!     );
//! }
//!
//! reducer.write_outputs(&report, std::path::Path::new("out"), "run_01")?;
//! # Ok::<(), seebeck_reduce::pipeline::PipelineError>(())
//! ```
//!
//! ## Batches
//!
//! [`pipeline::process_batch`] reduces many records independently; a failing
//! record is reported in the [`pipeline::BatchSummary`] and never stops the
//! others. Enable the `parallel` feature to reduce records concurrently.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod correction;
pub mod fit;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod resample;
pub mod segment;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Channel, ChannelColumns, ChannelLayout, PipelineConfig, Variant};
    pub use crate::correction::{correct, CorrectedSeries, Leg, Side, ThermocoupleConfig};
    pub use crate::fit::{FitAlignment, FitResult, LinearFit, SegmentFit};
    pub use crate::ingest::{RawChannelSample, RawRun, RawRunReader};
    pub use crate::pipeline::{
        process_batch, BatchSummary, PipelineError, Reducer, RunFailure, RunReport, Stage,
    };
    pub use crate::report::ReportTables;
    pub use crate::resample::{ResampledSeries, TimeBase};
    pub use crate::segment::{Segment, StateMarker};
}
