//! JSONL ingest: one typed row per line.
//!
//! The interchange format with the persistence layer. Each line is a JSON
//! object tagged with `kind` (`survey`, `page`, `question` or `rule`).
//! Blank lines and `#` comments are skipped.

use crate::page::Page;
use crate::question::Question;
use crate::rule::ConditionalRule;
use crate::survey::Survey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One persisted row of a survey snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotRow {
    Survey(Survey),
    Page(Page),
    Question(Question),
    Rule(ConditionalRule),
}

/// Read rows from a JSONL reader.
pub fn read_rows(reader: impl BufRead) -> Result<Vec<SnapshotRow>, JsonlError> {
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row: SnapshotRow = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read rows from a JSONL file path.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<SnapshotRow>, JsonlError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| JsonlError::Io(0, format!("{}: {e}", path.display())))?;
    validate_substrate_bytes(path, &bytes)?;
    read_rows(BufReader::new(bytes.as_slice()))
}

fn validate_substrate_bytes(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    if bytes.contains(&0) {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}

/// Errors from JSONL ingest.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("corrupted input: {0}")]
    Corrupt(String),
}
