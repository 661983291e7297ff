use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::Utc;

use crate::models::PatientRecord;

/// Append-only log of finalized and booked records: a JSON array file with
/// one object per event, each carrying the record's fields plus a timestamp.
/// Appends are read-modify-write of the whole file, serialized within this
/// process; writers in other processes are not coordinated.
pub struct RecordLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecordLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the backing file as an empty array if it does not exist yet.
    pub fn ensure_exists(&self) -> anyhow::Result<()> {
        if !self.path.exists() {
            fs::write(&self.path, "[]").with_context(|| {
                format!("failed to create record log at {}", self.path.display())
            })?;
        }
        Ok(())
    }

    pub fn append(&self, record: &PatientRecord) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().unwrap();

        let mut entries = self.read_all()?;

        let mut entry = serde_json::to_value(record).context("failed to serialize record")?;
        if let Some(obj) = entry.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(Utc::now().to_rfc3339()),
            );
        }
        entries.push(entry);

        let body =
            serde_json::to_string_pretty(&entries).context("failed to serialize record log")?;
        fs::write(&self.path, body)
            .with_context(|| format!("failed to write record log at {}", self.path.display()))?;

        Ok(())
    }

    pub fn read_all(&self) -> anyhow::Result<Vec<serde_json::Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read record log at {}", self.path.display())
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&content).context("record log is not a valid JSON array")
    }
}
