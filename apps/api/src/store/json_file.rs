use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::models::job::Job;
use crate::store::{JobStore, StoreError};

/// Stores all jobs as one pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Jobs file {} does not exist yet", self.path.display());
                None
            }
            Err(e) => {
                warn!("Could not read jobs file {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Records currently on disk that do not fit the `Job` schema.
    async fn foreign_records(&self) -> Vec<Value> {
        match self.read_raw().await {
            Some(raw) => split_records(&raw, &self.path).1,
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl JobStore for JsonFileStore {
    async fn load_all(&self) -> Vec<Job> {
        match self.read_raw().await {
            Some(raw) => split_records(&raw, &self.path).0,
            None => Vec::new(),
        }
    }

    /// Foreign records already in the file are written back after `jobs`, so
    /// a record this service cannot read is never dropped by a mutation.
    async fn save_all(&self, jobs: &[Job]) -> Result<(), StoreError> {
        let mut records = jobs
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;
        records.extend(self.foreign_records().await);

        let body = serde_json::to_string_pretty(&records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, body.as_bytes())).await??;
        debug!("Wrote {} jobs to {}", jobs.len(), self.path.display());
        Ok(())
    }
}

/// Splits the file into records that parse as `Job` and those that don't.
/// A file that is not a JSON array counts as empty.
fn split_records(raw: &str, path: &Path) -> (Vec<Job>, Vec<Value>) {
    let records: Vec<Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Jobs file {} is not a valid job list, treating as empty: {e}",
                path.display()
            );
            return (Vec::new(), Vec::new());
        }
    };

    let mut jobs = Vec::with_capacity(records.len());
    let mut foreign = Vec::new();
    for record in records {
        match Job::deserialize(&record) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                warn!("Skipping unreadable job record in {}: {e}", path.display());
                foreign.push(record);
            }
        }
    }
    (jobs, foreign)
}

/// Writes to a sibling temp file, then renames it over `path`, so readers
/// never observe a half-written list.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
