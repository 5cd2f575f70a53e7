//! # Raw Record Ingestion
//!
//! The acquisition program writes a text file with a few header/metadata lines
//! followed by one comma-separated line per scan. Each line carries a
//! timestamp/value pair per channel and, in the marker column, the state the
//! rig entered on that scan. Column positions come from a [`ChannelLayout`].

mod error;
mod types;

pub use error::IngestError;
pub use types::{LineBounds, RawChannelSample, RawRun};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::config::{Channel, ChannelLayout};
use crate::segment::StateMarker;

/// Reads raw records laid out according to a [`ChannelLayout`].
#[derive(Debug, Clone)]
pub struct RawRunReader {
    layout: ChannelLayout,
    header_lines: usize,
}

impl RawRunReader {
    /// Create a reader, validating the layout.
    pub fn new(layout: ChannelLayout, header_lines: usize) -> Result<Self, IngestError> {
        layout.validate()?;
        Ok(Self {
            layout,
            header_lines,
        })
    }

    /// Layout in use
    pub fn layout(&self) -> &ChannelLayout {
        &self.layout
    }

    /// Read a raw record from a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<RawRun, IngestError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let run = self.read_from(BufReader::new(file))?;
        info!("Read {} raw lines from {}", run.len(), path.display());
        Ok(run)
    }

    /// Read a raw record from any reader.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawRun, IngestError> {
        // Header text is free-form, so quotes carry no meaning here
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut run = RawRun::new();
        let mut samples = Vec::with_capacity(8);
        let mut record = csv::StringRecord::new();

        while csv_reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            if line <= self.header_lines as u64 || is_blank(&record) {
                continue;
            }

            samples.clear();
            let marker = self.parse_line(&record, line, &mut samples)?;
            run.push_line(&samples, marker);
        }

        debug!(
            "Parsed {} data lines ({} channels) after {} header lines",
            run.len(),
            run.channels.len(),
            self.header_lines
        );

        Ok(run)
    }

    fn parse_line(
        &self,
        record: &csv::StringRecord,
        line: u64,
        samples: &mut Vec<(Channel, RawChannelSample)>,
    ) -> Result<StateMarker, IngestError> {
        let required = self.layout.required_fields();
        if record.len() < required || record.len() > self.layout.field_count {
            return Err(IngestError::MalformedInput {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    self.layout.field_count,
                    record.len()
                ),
            });
        }

        for (channel, cols) in self.layout.channels() {
            let timestamp = parse_number(record, cols.time, line, channel, "time")?;
            let value = parse_number(record, cols.value, line, channel, "value")?;
            samples.push((channel, RawChannelSample::new(timestamp, value)));
        }

        let marker = match self.layout.marker.and_then(|i| record.get(i)) {
            Some(text) => text.parse().map_err(|e| IngestError::MalformedInput {
                line,
                reason: format!("{e}"),
            })?,
            None => StateMarker::Blank,
        };

        Ok(marker)
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn parse_number(
    record: &csv::StringRecord,
    column: usize,
    line: u64,
    channel: Channel,
    what: &str,
) -> Result<f64, IngestError> {
    let field = record.get(column).unwrap_or_default();
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(IngestError::MalformedInput {
            line,
            reason: format!(
                "{} {} in column {} is not a finite number: {:?}",
                channel, what, column, field
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    const HEADER: &str = "Seebeck run\nsample: test\ndate: 2024-01-15\noperator: lab\ntA,A,tB,B,...\n";

    fn line(t: f64, marker: &str) -> String {
        let mut fields: Vec<String> = (0..8)
            .flat_map(|k| {
                let ts = t + 0.1 * k as f64;
                [format!("{ts:.3}"), format!("{:.3}", 100.0 + k as f64)]
            })
            .collect();
        fields.push(marker.to_string());
        fields.join(",")
    }

    fn reader() -> RawRunReader {
        RawRunReader::new(Variant::HighTemperature.layout(), 5).unwrap()
    }

    #[test]
    fn test_reads_lines_after_header() {
        let text = format!(
            "{HEADER}{}\n{}\n{}\n",
            line(0.0, ""),
            line(1.0, "Start Oscillation"),
            line(2.0, "Stop Oscillation")
        );
        let run = reader().read_from(text.as_bytes()).unwrap();

        assert_eq!(run.len(), 3);
        assert_eq!(run.channels.len(), 8);
        assert_eq!(
            run.markers,
            vec![
                StateMarker::Blank,
                StateMarker::StartOscillation,
                StateMarker::StopOscillation
            ]
        );
        let temp_b = run.channel(Channel::TempB).unwrap();
        assert_eq!(temp_b[1], RawChannelSample::new(1.1, 101.0));
        assert_eq!(run.bounds[2].start, 2.0);
        assert!((run.bounds[2].end - 2.7).abs() < 1e-12);
    }

    #[test]
    fn test_missing_trailing_marker_is_blank() {
        let mut data = line(0.0, "");
        data.pop(); // drop the trailing comma
        let text = format!("{HEADER}{data}\n");
        let run = reader().read_from(text.as_bytes()).unwrap();
        assert_eq!(run.markers, vec![StateMarker::Blank]);
    }

    #[test]
    fn test_short_line_reports_line_number() {
        let text = format!("{HEADER}{}\n1.0,2.0,3.0\n", line(0.0, ""));
        match reader().read_from(text.as_bytes()) {
            Err(IngestError::MalformedInput { line, reason }) => {
                assert_eq!(line, 7);
                assert!(reason.contains("expected 17 fields"));
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_long_line_reports_line_number() {
        let text = format!("{HEADER}{}\n{},9.9\n", line(0.0, ""), line(1.0, ""));
        match reader().read_from(text.as_bytes()) {
            Err(IngestError::MalformedInput { line, reason }) => {
                assert_eq!(line, 7);
                assert_eq!(reason, "expected 17 fields, found 18");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_value() {
        let bad = line(0.0, "").replacen("100.000", "n/a", 1);
        let text = format!("{HEADER}{bad}\n");
        let err = reader().read_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput { line: 6, .. }));
        assert!(err.to_string().contains("temp_a value"));
    }

    #[test]
    fn test_unknown_marker_is_malformed() {
        let text = format!("{HEADER}{}\n", line(0.0, "Pause"));
        assert!(matches!(
            reader().read_from(text.as_bytes()),
            Err(IngestError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = format!("{HEADER}{}\n\n{}\n\n", line(0.0, ""), line(1.0, ""));
        let run = reader().read_from(text.as_bytes()).unwrap();
        assert_eq!(run.len(), 2);
    }

    #[test]
    fn test_header_with_commas_and_quotes() {
        let header = "title, \"quoted\nsample \"x\", y\na\nb\nc\n";
        let text = format!("{header}{}\n", line(0.0, "Left Equilibrium"));
        let run = reader().read_from(text.as_bytes()).unwrap();
        assert_eq!(run.markers, vec![StateMarker::LeftEquilibrium]);
    }
}
