//! Append-only run history, one `RunRecord` per JSON line.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::schema::{RunRecord, SCHEMA_VERSION};
use crate::{MungeError, MungeResult};

#[derive(Debug, Clone)]
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    /// History backed by `path`; the file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        RunHistory {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Records from another schema version are refused.
    pub fn append(&self, record: &RunRecord) -> MungeResult<()> {
        if record.schema_version != SCHEMA_VERSION {
            return Err(MungeError::Message(format!(
                "schema version mismatch: record has v{}, expected v{}",
                record.schema_version, SCHEMA_VERSION
            )));
        }
        let line = serde_json::to_string(record)
            .map_err(|e| MungeError::Message(format!("failed to serialize record: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MungeError::Message(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error("open", e))?;
        writeln!(file, "{line}").map_err(|e| self.io_error("write", e))?;

        debug!(path = %self.path.display(), record = %record.record_id, "appended run record");
        Ok(())
    }

    pub fn read_all(&self) -> MungeResult<Vec<RunRecord>> {
        self.read_filtered(None)
    }

    /// Records in file order, keeping only runs of `processor` when given.
    ///
    /// A missing file or any unparsable line is an error; blank lines are skipped.
    pub fn read_filtered(&self, processor: Option<&str>) -> MungeResult<Vec<RunRecord>> {
        if !self.path.exists() {
            return Err(MungeError::Message(format!(
                "file not found: {}",
                self.path.display()
            )));
        }

        let mut records = Vec::new();
        for (number, line) in self.lines()? {
            let record: RunRecord = serde_json::from_str(&line?).map_err(|e| {
                MungeError::Message(format!("failed to parse line {number}: {e}"))
            })?;
            if processor.is_none_or(|name| record.info.processor == name) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Number of stored runs; a history that was never written is empty.
    pub fn len(&self) -> MungeResult<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let mut count = 0;
        for (_, line) in self.lines()? {
            line?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> MungeResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Non-blank lines with their 1-based line numbers.
    fn lines(&self) -> MungeResult<impl Iterator<Item = (usize, MungeResult<String>)> + '_> {
        let file = File::open(&self.path).map_err(|e| self.io_error("open", e))?;
        Ok(BufReader::new(file)
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let line = line.map_err(|e| {
                    MungeError::Message(format!("failed to read line {}: {e}", i + 1))
                });
                (i + 1, line)
            })
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty())))
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> MungeError {
        MungeError::Message(format!("failed to {action} {}: {err}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExecutionInfo, InputRef};
    use crate::results::Results;
    use std::time::Duration;

    fn record(processor: &str) -> RunRecord {
        RunRecord::new(
            ExecutionInfo {
                date: time::OffsetDateTime::now_utc(),
                processor: processor.to_string(),
                input: vec![InputRef::new("srs", "0")],
                time: Duration::from_millis(3),
                prngs_seed: Some(1),
            },
            Vec::new(),
            Results::new().with("mean", 0.5),
        )
    }

    #[test]
    fn test_foreign_schema_version_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::new(dir.path().join("runs.jsonl"));

        let mut stale = record("stats");
        stale.schema_version = 999;

        let err = history.append(&stale).unwrap_err();
        assert!(err.to_string().contains("schema version mismatch"));
        assert!(!history.path().exists());
    }

    #[test]
    fn test_unwritten_history_is_empty_but_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::new(dir.path().join("none.jsonl"));
        assert_eq!(history.len().unwrap(), 0);
        assert!(history.is_empty().unwrap());
        assert!(history.read_all().is_err());
    }

    #[test]
    fn test_blank_lines_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::new(dir.path().join("runs.jsonl"));
        history.append(&record("stats")).unwrap();

        let mut contents = std::fs::read_to_string(history.path()).unwrap();
        contents.push_str("\n   \n");
        std::fs::write(history.path(), contents).unwrap();
        history.append(&record("diff")).unwrap();

        assert_eq!(history.len().unwrap(), 2);
        assert_eq!(history.read_all().unwrap().len(), 2);
    }
}
