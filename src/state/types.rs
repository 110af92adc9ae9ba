//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete replication state for a connector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicationState {
    /// Per-stream state
    #[serde(default)]
    pub streams: HashMap<String, StreamState>,
}

impl ReplicationState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get the watermark for a stream
    pub fn get_watermark(&self, stream: &str) -> Option<DateTime<Utc>> {
        self.streams.get(stream)?.replication_key_value
    }

    /// Raise the watermark for a stream
    ///
    /// The watermark only ever moves forward; a lower candidate is ignored.
    /// Returns true when the watermark advanced.
    pub fn advance_watermark(&mut self, stream: &str, candidate: DateTime<Utc>) -> bool {
        let state = self.get_stream_mut(stream);
        match state.replication_key_value {
            Some(current) if candidate <= current => false,
            _ => {
                state.replication_key_value = Some(candidate);
                true
            }
        }
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Highest replication-key value observed (for incremental sync)
    #[serde(default)]
    pub replication_key_value: Option<DateTime<Utc>>,
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }
}
