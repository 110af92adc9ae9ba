//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes, plus the
//! watermark bookkeeping the sync loop drives: `starting_cursor` at run
//! start, `observe` per emitted record, `checkpoint` at page boundaries.

use super::types::ReplicationState;
use crate::error::{Error, Result};
use crate::streams::StreamDefinition;
use crate::types::{JsonObject, ReplicationMethod};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// State manager for persisting and loading replication state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<ReplicationState>>,
}

impl StateManager {
    /// Create a new state manager with the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(ReplicationState::new())),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(ReplicationState::new())),
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read state file: {e}"),
            })?;
            serde_json::from_str(&contents).map_err(|e| Error::State {
                message: format!("Failed to parse state file: {e}"),
            })?
        } else {
            ReplicationState::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create a state manager from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: ReplicationState = serde_json::from_str(json).map_err(|e| Error::State {
            message: format!("Failed to parse state JSON: {e}"),
        })?;

        Ok(Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Compute the starting cursor for a stream
    ///
    /// The greater of the persisted watermark and the configured start date;
    /// the Unix epoch when neither is set. Guarantees the next run never asks
    /// for less than what was already confirmed emitted.
    pub async fn starting_cursor(
        &self,
        stream: &str,
        start_date: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let state = self.state.read().await;
        let watermark = state.get_watermark(stream);

        watermark
            .into_iter()
            .chain(start_date)
            .max()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Observe an emitted record, raising the stream's watermark
    ///
    /// Only incremental streams with the replication-key field present and
    /// parseable as a timestamp move the watermark. Arrival order within a
    /// page does not matter; the watermark ends at the maximum either way.
    pub async fn observe(&self, stream: &StreamDefinition, record: &JsonObject) {
        if stream.replication_method != ReplicationMethod::Incremental {
            return;
        }
        let Some(key) = &stream.replication_key else {
            return;
        };
        let Some(value) = record.get(key).and_then(|v| v.as_str()) else {
            return;
        };
        let Ok(timestamp) = value.parse::<DateTime<Utc>>() else {
            debug!(
                "Ignoring unparseable replication key '{key}' = '{value}' in stream {}",
                stream.name
            );
            return;
        };

        let mut state = self.state.write().await;
        state.advance_watermark(&stream.name, timestamp);
    }

    /// Current watermark mapping, for persistence or emission
    ///
    /// Safe to call at page boundaries; the snapshot only ever reflects
    /// records already emitted.
    pub async fn snapshot(&self) -> ReplicationState {
        self.state.read().await.clone()
    }

    /// Get the watermark for a stream
    pub async fn get_watermark(&self, stream: &str) -> Option<DateTime<Utc>> {
        self.state.read().await.get_watermark(stream)
    }

    /// Persist the current snapshot (alias for save)
    pub async fn checkpoint(&self) -> Result<()> {
        self.save().await
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(()); // In-memory mode
        }

        let state = self.state.read().await;
        let contents = serde_json::to_string_pretty(&*state).map_err(|e| Error::Checkpoint {
            message: format!("Failed to serialize state: {e}"),
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::Checkpoint {
                message: format!("Failed to write state file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::Checkpoint {
                message: format!("Failed to rename state file: {e}"),
            })?;

        Ok(())
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
        }
    }
}
