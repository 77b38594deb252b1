//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use eyefit_core::{Measurement, ScanSummary, SummaryOutput};

/// Writes measurements as JSON, one document per line.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    /// Writes one measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_measurement(&self, measurement: &Measurement) -> Result<()> {
        self.write_value(measurement)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_value<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }
}

impl SummaryOutput for JsonOutput {
    fn write(&self, summary: &ScanSummary) -> Result<()> {
        self.write_value(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, PoisonError};

    use super::*;

    /// A cloneable in-memory writer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn measurement() -> Measurement {
        Measurement {
            eye_width_mm: 26.48,
            bridge_width_mm: 36.52,
            b_size_mm: 16.43,
        }
    }

    #[test]
    fn test_measurement_fields() {
        let buf = SharedBuf::default();
        JsonOutput::new(Box::new(buf.clone()), false)
            .write_measurement(&measurement())
            .unwrap();

        assert_eq!(
            buf.text(),
            "{\"eye_width_mm\":26.48,\"bridge_width_mm\":36.52,\"b_size_mm\":16.43}\n"
        );
    }

    #[test]
    fn test_summary_counts() {
        let buf = SharedBuf::default();
        let summary = ScanSummary {
            measurement: measurement(),
            batches: 5,
            frames: 100,
        };
        JsonOutput::new(Box::new(buf.clone()), true)
            .write(&summary)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&buf.text()).unwrap();
        assert_eq!(value["batches"], 5);
        assert_eq!(value["frames"], 100);
        assert_eq!(value["measurement"]["b_size_mm"], 16.43);
    }
}
