//! Execution engine module
//!
//! Main sync loop and stream orchestration.
//!
//! A stream moves through request, extract, emit and either loops on the
//! continuation token or finishes. One request is in flight at a time per
//! stream; each request depends on the previous response's token, so there
//! is no prefetching. The replication state is checkpointed after every
//! fully emitted page, which bounds duplicate re-emission after a crash to
//! one page (at-least-once).

mod types;

pub use types::{LogLevel, Message, SyncConfig, SyncStats};

use crate::config::{ConnectorConfig, ValidationPolicy};
use crate::error::{Error, Result};
use crate::extract::{parse_body, RecordExtractor};
use crate::http::{HttpClient, RequestConfig};
use crate::state::StateManager;
use crate::streams::StreamDefinition;
use crate::types::StringMap;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Records requested per page
///
/// Generous enough to bound round-trips without inflating per-request
/// latency.
pub const PAGE_LIMIT: u32 = 500;

/// Timestamp format the API expects for `updatedFrom` (seconds precision)
const CURSOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// Replication state manager
    state: StateManager,
    /// Connector configuration
    config: ConnectorConfig,
    /// Sync configuration
    sync_config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, state: StateManager, config: ConnectorConfig) -> Self {
        Self {
            client,
            state,
            config,
            sync_config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_sync_config(mut self, sync_config: SyncConfig) -> Self {
        self.sync_config = sync_config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = SyncStats::default();
    }

    /// Sync every given stream sequentially
    ///
    /// A stream failure aborts only that stream; siblings still run.
    /// Credential rejection aborts the whole run immediately.
    pub async fn sync_streams(&mut self, streams: &[StreamDefinition]) -> Result<Vec<Message>> {
        let mut messages = Vec::new();

        for stream in streams {
            match self.sync_stream(stream).await {
                Ok(msgs) => messages.extend(msgs),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.stats.add_error();
                    messages.push(Message::error(format!(
                        "Stream {} failed: {e}",
                        stream.name
                    )));
                }
            }
        }

        Ok(messages)
    }

    /// Sync a single stream
    pub async fn sync_stream(&mut self, stream: &StreamDefinition) -> Result<Vec<Message>> {
        let start = Instant::now();
        let mut messages = Vec::new();

        messages.push(Message::info(format!(
            "Starting sync for stream: {}",
            stream.name
        )));

        let extractor = RecordExtractor::new(&stream.record_path);
        let paginator = stream.pagination.build();

        let starting_cursor = self
            .state
            .starting_cursor(&stream.name, self.config.start_date)
            .await;
        debug!(
            "Stream {} starting from {}",
            stream.name,
            starting_cursor.format(CURSOR_FORMAT)
        );

        let base_params = self.base_params(starting_cursor);
        let mut continuation: Vec<(String, String)> = Vec::new();
        let mut page_count = 0;

        loop {
            // Continuation params override base params on key collision
            let mut params = base_params.clone();
            for (key, value) in continuation.drain(..) {
                params.insert(key, value);
            }

            let mut req = RequestConfig::new();
            for (key, value) in &params {
                req = req.query(key, value);
            }

            let response = self.client.get_with_config(&stream.path, req).await?;
            let body_text = response.text().await.map_err(Error::Http)?;
            let body = parse_body(&body_text)?;

            page_count += 1;
            self.stats.add_page();

            let records = extractor.extract(&body)?;
            let next = paginator.decide_next(&body);

            debug!(
                "Stream {} page {page_count}: {} records",
                stream.name,
                records.len()
            );

            self.emit_page(stream, records, &mut messages).await?;

            // Checkpoint after the page is fully emitted; a crash from here
            // re-emits at most this one page
            self.state.checkpoint().await?;
            if self.sync_config.emit_state_per_page {
                messages.push(Message::state(
                    &stream.name,
                    self.watermark_data(stream).await,
                ));
            }

            match next {
                Some(token) => {
                    continuation = token.query_params();
                }
                None => break,
            }
        }

        self.stats.add_stream();
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        messages.push(Message::info(format!(
            "Completed sync for {}: {} records in {page_count} pages",
            stream.name, self.stats.records_synced
        )));

        Ok(messages)
    }

    /// Base request parameters for the first page
    fn base_params(&self, starting_cursor: chrono::DateTime<chrono::Utc>) -> StringMap {
        let mut params = StringMap::new();
        params.insert(
            "updatedFrom".to_string(),
            starting_cursor.format(CURSOR_FORMAT).to_string(),
        );
        params.insert("orderBy".to_string(), "UPDATED".to_string());
        params.insert("limit".to_string(), PAGE_LIMIT.to_string());
        params
    }

    /// Post-process, validate and emit one page of raw records
    async fn emit_page(
        &mut self,
        stream: &StreamDefinition,
        records: Vec<Value>,
        messages: &mut Vec<Message>,
    ) -> Result<()> {
        for raw in records {
            let Value::Object(mut record) = raw else {
                self.stats.add_dropped();
                messages.push(Message::warn(format!(
                    "Dropping non-object record in stream {}",
                    stream.name
                )));
                continue;
            };

            // Post-processing: stamp the configured org id into every record
            if let Some(org_id) = &self.config.org_id {
                record.insert("org_id".to_string(), Value::String(org_id.clone()));
            }

            let validated = stream
                .check_primary_key(&record)
                .and_then(|()| crate::schema::validate_record(&record, &stream.schema));

            match validated {
                Ok(validated) => {
                    self.state.observe(stream, &validated).await;
                    self.stats.add_record();
                    messages.push(Message::record(&stream.name, Value::Object(validated)));
                }
                Err(e) if e.is_record_error() => {
                    self.stats.add_dropped();
                    self.stats.add_error();
                    if self.config.validation == ValidationPolicy::FailStream {
                        return Err(e);
                    }
                    // A missing primary key is fatal for the record; everything
                    // else is a plain skip
                    if matches!(e, Error::MissingPrimaryKey { .. }) {
                        messages.push(Message::error(format!("Dropping record: {e}")));
                    } else {
                        warn!("Dropping record in stream {}: {e}", stream.name);
                        messages.push(Message::warn(format!("Dropping record: {e}")));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    async fn watermark_data(&self, stream: &StreamDefinition) -> Value {
        let watermark = self.state.get_watermark(&stream.name).await;
        serde_json::json!({
            "replication_key_value": watermark.map(|w| w.to_rfc3339()),
        })
    }
}
