//! File-based measurement source.
//!
//! Polls a JSON file holding an array of measurements.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use stalwart_types::Measurement;

use super::MeasurementSource;

/// Read a JSON array of measurements from a file.
pub fn read_measurements(path: impl AsRef<Path>) -> Result<Vec<Measurement>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// A source that re-reads a measurement file whenever it changes.
///
/// A data logger overwrites the file with each new batch; this source
/// tracks the modification time and only returns a batch when the file
/// has been updated since the last successful read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being polled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<Vec<Measurement>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(batch) => {
                    self.last_error = None;
                    Some(batch)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl MeasurementSource for FileSource {
    fn poll(&mut self) -> Option<Vec<Measurement>> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep the last batch
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(batch) = self.read_file() {
                self.last_modified = current_modified;
                return Some(batch);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"[
            { "sensor_id": "LVDT-001", "structure_id": "GGB-001", "timestamp_ms": 1000, "value": 2.5, "unit": "mm" },
            { "sensor_id": "TEMP-001", "structure_id": "GGB-001", "timestamp_ms": 1000, "value": 18.0, "unit": "C", "quality": 0.9 }
        ]"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/readings.json");
        assert_eq!(source.path(), Path::new("/tmp/readings.json"));
        assert_eq!(source.description(), "file: /tmp/readings.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let batch = source.poll().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].sensor_id, "LVDT-001");
        assert_eq!(batch[0].quality, 1.0);
        assert_eq!(batch[1].quality, 0.9);

        // Unchanged file yields nothing
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(
            file,
            r#"[{{ "sensor_id": "LVDT-001", "structure_id": "GGB-001", "timestamp_ms": 2000, "value": 3.0, "unit": "mm" }}]"#
        )
        .unwrap();
        file.flush().unwrap();

        // Filesystems with coarse mtime resolution may not report the change
        if let Some(batch) = source.poll() {
            assert_eq!(batch[0].timestamp_ms, 2000);
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/readings.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_read_measurements() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        assert_eq!(read_measurements(file.path()).unwrap().len(), 2);
        assert!(read_measurements("/nonexistent/readings.json").is_err());
    }
}
