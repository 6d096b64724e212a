//! On-disk collector: one file per dataset under a collector directory.
//!
//! `<root>/<key>.json` holds any JSON payload. `<key>.csv` is read as an
//! array of row objects keyed by the header, with numeric cells parsed as
//! numbers. JSON wins when both exist.

use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use crate::{MungeError, MungeResult};

use super::traits::{Collector, CollectorSession};

#[derive(Debug, Clone)]
pub struct DirectoryCollector {
    name: String,
    root: PathBuf,
}

impl DirectoryCollector {
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Self {
        DirectoryCollector {
            name: name.into(),
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Collector for DirectoryCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> MungeResult<Box<dyn CollectorSession + '_>> {
        if !self.root.is_dir() {
            return Err(MungeError::Message(format!(
                "collector '{}': directory not found: {}",
                self.name,
                self.root.display()
            )));
        }
        debug!(collector = %self.name, root = %self.root.display(), "opened collector");
        Ok(Box::new(DirectorySession { collector: self }))
    }
}

struct DirectorySession<'a> {
    collector: &'a DirectoryCollector,
}

impl DirectorySession<'_> {
    fn path_for(&self, key: &str, extension: &str) -> PathBuf {
        self.collector.root.join(format!("{key}.{extension}"))
    }
}

impl CollectorSession for DirectorySession<'_> {
    fn fetch(&mut self, key: &str) -> MungeResult<Option<JsonValue>> {
        // Keys never escape the collector directory.
        if !is_plain_key(key) {
            return Ok(None);
        }

        let json_path = self.path_for(key, "json");
        if json_path.is_file() {
            let bytes = std::fs::read(&json_path)?;
            let payload = serde_json::from_slice(&bytes).map_err(|e| {
                MungeError::Message(format!("failed to parse {}: {e}", json_path.display()))
            })?;
            return Ok(Some(payload));
        }

        let csv_path = self.path_for(key, "csv");
        if csv_path.is_file() {
            return read_csv_rows(&csv_path).map(Some);
        }

        Ok(None)
    }

    fn keys(&mut self) -> MungeResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.collector.root)? {
            let path = entry?.path();
            let supported = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("json") | Some("csv")
            );
            if !supported || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

impl Drop for DirectorySession<'_> {
    fn drop(&mut self) {
        debug!(collector = %self.collector.name, "released collector");
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\'])
        && !key.contains("..")
}

fn read_csv_rows(path: &Path) -> MungeResult<JsonValue> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| MungeError::Message(format!("failed to open {}: {e}", path.display())))?;
    let headers = reader
        .headers()
        .map_err(|e| MungeError::Message(format!("failed to read {}: {e}", path.display())))?
        .clone();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            MungeError::Message(format!(
                "failed to read {} row {}: {e}",
                path.display(),
                line + 1
            ))
        })?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), parse_cell(cell));
        }
        rows.push(JsonValue::Object(row));
    }
    Ok(JsonValue::Array(rows))
}

fn parse_cell(cell: &str) -> JsonValue {
    let trimmed = cell.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return JsonValue::Number(i.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return JsonValue::Number(n);
    }
    JsonValue::String(cell.to_string())
}
