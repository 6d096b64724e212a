//! Single-document JSON output.

use std::path::Path;

use serde::Serialize;

use crate::{MungeError, MungeResult};

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> MungeResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| MungeError::Message(format!("failed to serialize report: {e}")))?;
    std::fs::write(path, json)?;
    Ok(())
}
