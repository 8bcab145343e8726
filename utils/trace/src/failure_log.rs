use std::error::Error as StdError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Append-only text record of failed cycles.
///
/// Each entry holds a timestamp, the error message and every cause in its
/// `source()` chain, followed by a blank line.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

#[derive(Debug, Error)]
pub enum FailureLogError {
    #[error("OpenFailureLog {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("WriteFailureLog {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, error: &(dyn StdError + 'static)) -> Result<(), FailureLogError> {
        self.append_at(Utc::now(), error)
    }

    pub fn append_at(
        &self,
        at: DateTime<Utc>,
        error: &(dyn StdError + 'static),
    ) -> Result<(), FailureLogError> {
        let entry = format_entry(at, error);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| FailureLogError::Open {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(entry.as_bytes())
            .map_err(|source| FailureLogError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn format_entry(at: DateTime<Utc>, error: &(dyn StdError + 'static)) -> String {
    let mut entry = format!(
        "[{}] cycle failed: {error}\n",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let mut cause = error.source();
    while let Some(inner) = cause {
        entry.push_str(&format!("    caused by: {inner}\n"));
        cause = inner.source();
    }

    entry.push('\n');
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Error)]
    #[error("Outer: {source}")]
    struct Outer {
        source: std::io::Error,
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap()
    }

    #[test]
    fn entry_lists_every_cause() {
        let err = Outer {
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk gone"),
        };

        let entry = format_entry(fixed_time(), &err);

        assert_eq!(
            entry,
            "[2024-03-09T12:30:00Z] cycle failed: Outer: disk gone\n    caused by: disk gone\n\n"
        );
    }

    #[test]
    fn appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(dir.path().join("failures.log"));
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");

        log.append_at(fixed_time(), &err).unwrap();
        log.append_at(fixed_time(), &err).unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(written.matches("cycle failed: boom").count(), 2);
    }

    #[test]
    fn missing_parent_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(dir.path().join("nope").join("failures.log"));
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");

        let result = log.append_at(fixed_time(), &err);

        assert!(matches!(result, Err(FailureLogError::Open { .. })));
    }
}
