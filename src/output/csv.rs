//! CSV results table writer.

use crate::constants::score::DECIMAL_PLACES;
use crate::error::Result;
use crate::event::AcousticEvent;
use crate::output::OutputWriter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: &str = "Source,Name,Segment start (s),Start (s),End (s),Duration (s),\
Low freq (Hz),High freq (Hz),Bandwidth (Hz),Score,Normalised score,Components";

/// CSV format output writer.
///
/// Start and end times are on the recording timeline.
pub struct CsvWriter<W: Write> {
    writer: W,
}

impl CsvWriter<BufWriter<File>> {
    /// Create a CSV file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Write CSV to any byte sink.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "{HEADER}")?;
        Ok(())
    }

    fn write_event(&mut self, event: &AcousticEvent) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{:.3},{:.3},{:.3},{:.3},{:.1},{:.1},{:.1},{:.decimal$},{:.decimal$},{}",
            escape_csv(event.source().unwrap_or_default()),
            escape_csv(event.name()),
            event.segment_start(),
            event.absolute_start(),
            event.absolute_end(),
            event.duration(),
            event.min_hz(),
            event.max_hz(),
            event.bandwidth_hz(),
            event.score(),
            event.normalised_score(),
            event.component_count(),
            decimal = DECIMAL_PLACES,
        )?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::ScoreRange;
    use tempfile::NamedTempFile;

    fn event() -> AcousticEvent {
        let mut event = AcousticEvent::new(1.25, 0.5, 200.0, 800.0)
            .unwrap()
            .with_name("whistle")
            .with_source("site 1, dawn.wav")
            .with_segment_start(60.0);
        event.set_scores(0.8542, ScoreRange::default());
        event
    }

    #[test]
    fn test_csv_writer_basic() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_header().unwrap();
        writer.write_event(&event()).unwrap();
        writer.finalize().unwrap();

        let contents = String::from_utf8(writer.into_inner()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some(
                "\"site 1, dawn.wav\",whistle,60.000,61.250,61.750,0.500,200.0,800.0,600.0,0.8542,0.8542,1"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_writer_file() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = CsvWriter::create(file.path()).unwrap();
        writer.write_header().unwrap();
        writer.write_event(&event()).unwrap();
        writer.finalize().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("Source,Name"));
        assert!(contents.contains("whistle"));
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
