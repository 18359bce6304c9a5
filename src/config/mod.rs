mod file_config;

pub use file_config::{EnrichmentConfig, FileConfig, MockEnrichmentConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_ENRICHMENT_URL: &str = "http://localhost:8081";
pub const DEFAULT_ENRICHMENT_TIMEOUT_SEC: u64 = 10;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub enrichment_url: String,
    pub enrichment_timeout_sec: u64,
    pub mock_enrichment_port: Option<u16>,
    pub mock_dataset_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("songs.db"),
            port: 8080,
            logging_level: RequestsLoggingLevel::Path,
            enrichment_url: DEFAULT_ENRICHMENT_URL.to_string(),
            enrichment_timeout_sec: DEFAULT_ENRICHMENT_TIMEOUT_SEC,
            mock_enrichment_port: None,
            mock_dataset_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub enrichment: EnrichmentSettings,
    /// Present when the process should also serve the mock enrichment service.
    pub mock_enrichment: Option<MockEnrichmentSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentSettings {
    pub base_url: String,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockEnrichmentSettings {
    pub port: u16,
    /// `None` serves the built-in dataset.
    pub dataset_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let enrichment_file = file.enrichment.unwrap_or_default();
        let base_url = enrichment_file
            .base_url
            .unwrap_or_else(|| cli.enrichment_url.clone());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!(
                "Enrichment URL must start with http:// or https://, got {:?}",
                base_url
            );
        }
        let timeout_sec = enrichment_file
            .timeout_sec
            .unwrap_or(cli.enrichment_timeout_sec);
        if timeout_sec == 0 {
            bail!("Enrichment timeout must be greater than zero");
        }

        let mock_file = file.mock_enrichment.unwrap_or_default();
        let mock_dataset_path = mock_file
            .dataset_path
            .map(PathBuf::from)
            .or_else(|| cli.mock_dataset_path.clone());
        if let Some(path) = &mock_dataset_path {
            if !path.exists() {
                bail!("Mock dataset file not found: {:?}", path);
            }
        }
        let mock_enrichment = mock_file
            .port
            .or(cli.mock_enrichment_port)
            .map(|port| MockEnrichmentSettings {
                port,
                dataset_path: mock_dataset_path,
            });

        Ok(Self {
            db_path,
            port,
            logging_level,
            enrichment: EnrichmentSettings {
                base_url,
                timeout_sec,
            },
            mock_enrichment,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
