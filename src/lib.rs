// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tempo-connect
//!
//! A Rust-native incremental extraction connector for the Tempo REST API.
//!
//! ## Features
//!
//! - **Incremental Sync**: per-stream watermarks with page-boundary
//!   checkpointing and idempotent resumption
//! - **HATEOAS Pagination**: follows the next-page URL embedded in each
//!   response body
//! - **Schema Validation**: declarative field schemas with type coercion and
//!   permissive pass-through of unknown fields
//! - **Exact Decimals**: numeric fields never round-trip through binary
//!   floats
//! - **Robust HTTP**: bounded retries with exponential backoff and token
//!   bucket rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tempo_connect::config::ConnectorConfig;
//! use tempo_connect::engine::SyncEngine;
//! use tempo_connect::state::StateManager;
//! use tempo_connect::streams::builtin_streams;
//!
//! #[tokio::main]
//! async fn main() -> tempo_connect::Result<()> {
//!     let config = ConnectorConfig::from_file("config.json")?;
//!     let state = StateManager::from_file("state.json")?;
//!
//!     let client = /* HttpClient with BearerToken credentials */;
//!     let mut engine = SyncEngine::new(client, state, config);
//!
//!     let messages = engine.sync_streams(&builtin_streams()).await?;
//!     for msg in messages {
//!         // Emit records downstream
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Sync Engine (per stream)                  │
//! │  starting cursor → request → extract → validate → emit → loop  │
//! └────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬───────────┬──────┴───────┬────────────┬────────────┐
//! │   Auth   │   HTTP    │  Pagination  │   Schema   │   State    │
//! ├──────────┼───────────┼──────────────┼────────────┼────────────┤
//! │ Bearer   │ GET       │ Next URL     │ Coercion   │ Watermark  │
//! │          │ Retry     │ (HATEOAS)    │ Recursion  │ Checkpoint │
//! │          │ Rate Limit│              │ Passthrough│ Resume     │
//! └──────────┴───────────┴──────────────┴────────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential providers
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Record extraction from response bodies
pub mod extract;

/// Declarative schemas and record validation
pub mod schema;

/// Replication state management and checkpointing
pub mod state;

/// Stream definitions
pub mod streams;

/// Main execution engine
pub mod engine;

/// Connector configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ConnectorConfig;
pub use streams::{builtin_streams, StreamDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
