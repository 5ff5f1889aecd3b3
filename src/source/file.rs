//! Fixture-file data source.
//!
//! Reads a [`Dataset`] from a JSON file and re-reads it whenever the file's
//! modification time moves forward. Handy for demos and for working against a
//! captured backend state without the services running.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{DataSource, Dataset};

/// A data source that reads a [`Dataset`] from a JSON file.
///
/// The source tracks the file's modification time and only returns new data
/// when the file has been updated, or after [`DataSource::refresh`].
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    /// Re-read on the next poll even if the file is unchanged
    reload_requested: bool,
}

impl FileSource {
    /// Create a file source for the given path. Nothing is read until the
    /// first poll.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("fichier : {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            reload_requested: false,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file, recording any failure.
    fn read_file(&mut self) -> Option<Dataset> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(dataset) => {
                    self.last_error = None;
                    Some(dataset)
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "invalid dataset file");
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

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Dataset> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            // File disappeared, keep what we have
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if file_changed || std::mem::take(&mut self.reload_requested) {
            if let Some(dataset) = self.read_file() {
                self.last_modified = current_modified;
                tracing::debug!(path = %self.path.display(), records = dataset.len(), "dataset loaded");
                return Some(dataset);
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

    fn refresh(&mut self) {
        self.reload_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "members": [
                { "id": 1, "firstName": "Jean", "lastName": "Dupont",
                  "email": "jean.dupont@example.com", "phone": "0601020304", "active": true }
            ],
            "activities": [
                { "id": 7, "name": "Yoga", "coach": "Sophie", "maxCapacity": 20,
                  "currentParticipants": 12 }
            ]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/centre.json");
        assert_eq!(source.path(), Path::new("/tmp/centre.json"));
        assert_eq!(source.description(), "fichier : /tmp/centre.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let dataset = source.poll().unwrap();
        assert_eq!(dataset.members.len(), 1);
        assert_eq!(dataset.members[0].last_name, "Dupont");
        assert_eq!(dataset.activities[0].max_capacity, Some(20));
        assert!(dataset.bookings.is_empty());

        // Unchanged file
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_refresh_forces_reread() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        source.refresh();
        assert!(source.poll().is_some());
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
        writeln!(file, r#"{{ "members": [], "payments": [] }}"#).unwrap();
        file.flush().unwrap();

        // mtime resolution varies by filesystem, so only check when a change was seen
        if let Some(dataset) = source.poll() {
            assert!(dataset.members.is_empty());
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/centre.json");

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
}
