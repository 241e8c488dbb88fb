//! Persistence boundary for job records.
//!
//! Handlers never touch the backing file directly: they go through
//! `JobService`, which holds an `Arc<dyn JobStore>`. Swapping the flat file
//! for a real datastore means adding another `JobStore` implementation.

pub mod json_file;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::job::Job;

pub use json_file::JsonFileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Background write failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Whole-collection storage for job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Returns every stored job in insertion order.
    /// Read failures are not surfaced: an unreadable store is an empty store.
    async fn load_all(&self) -> Vec<Job>;

    /// Replaces the stored collection with `jobs`.
    async fn save_all(&self, jobs: &[Job]) -> Result<(), StoreError>;
}
