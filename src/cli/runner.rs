//! CLI runner - executes commands

use crate::auth::BearerToken;
use crate::cli::commands::{Cli, Commands};
use crate::config::ConnectorConfig;
use crate::engine::{LogLevel, Message, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::state::StateManager;
use crate::streams::{builtin_streams, find_stream, StreamDefinition};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Sync { streams } => self.sync(streams.as_deref()).await,
        }
    }

    fn load_config(&self) -> Result<ConnectorConfig> {
        if let Some(json) = &self.cli.config_json {
            return ConnectorConfig::from_json(json);
        }
        if let Some(path) = &self.cli.config {
            return ConnectorConfig::from_file(path);
        }
        Err(Error::config("pass --config <file> or --config-json"))
    }

    fn load_state(&self) -> Result<StateManager> {
        if let Some(json) = &self.cli.state_json {
            return StateManager::from_json(json);
        }
        if let Some(path) = &self.cli.state {
            return StateManager::from_file(path);
        }
        warn!("No state file given; watermarks will not persist across runs");
        Ok(StateManager::in_memory())
    }

    fn build_client(&self, config: &ConnectorConfig) -> Result<HttpClient> {
        let client_config = HttpClientConfig::from_connector(
            &config.api_url,
            &config.http,
            config.user_agent.as_deref(),
        );
        let credentials = Arc::new(BearerToken::new(&config.auth_token)?);
        Ok(HttpClient::with_credentials(client_config, credentials))
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = self.build_client(&config)?;

        let stream = builtin_streams()
            .into_iter()
            .next()
            .expect("at least one built-in stream");
        let req = RequestConfig::new().query("limit", "1");
        client.get_with_config(&stream.path, req).await?;

        println!("{}", json!({"type": "CONNECTION_STATUS", "status": "SUCCEEDED"}));
        Ok(())
    }

    fn discover(&self) -> Result<()> {
        for stream in builtin_streams() {
            let entry = json!({
                "name": stream.name,
                "path": stream.path,
                "primary_key": stream.primary_key,
                "replication_key": stream.replication_key,
                "replication_method": stream.replication_method,
                "schema": stream.schema,
            });
            println!("{entry}");
        }
        Ok(())
    }

    async fn sync(&self, selected: Option<&[String]>) -> Result<()> {
        let config = self.load_config()?;
        let client = self.build_client(&config)?;
        let state = self.load_state()?;

        let streams: Vec<StreamDefinition> = match selected {
            Some(names) => names
                .iter()
                .map(|name| find_stream(name))
                .collect::<Result<_>>()?,
            None => builtin_streams(),
        };

        let mut engine = SyncEngine::new(client, state, config);
        let messages = engine.sync_streams(&streams).await?;

        for message in messages {
            print_message(&message);
        }

        let snapshot = engine.state().snapshot().await;
        println!(
            "{}",
            json!({"type": "STATE", "value": serde_json::to_value(&snapshot)?})
        );

        let stats = engine.stats();
        info!(
            "Synced {} records over {} pages ({} dropped, {} errors)",
            stats.records_synced, stats.pages_fetched, stats.records_dropped, stats.errors
        );

        Ok(())
    }
}

fn print_message(message: &Message) {
    match message {
        Message::Record { stream, record } => {
            println!(
                "{}",
                json!({"type": "RECORD", "stream": stream, "record": record})
            );
        }
        Message::State { stream, data } => {
            println!(
                "{}",
                json!({"type": "STATE", "stream": stream, "value": data})
            );
        }
        Message::Log { level, message } => match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        },
    }
}
