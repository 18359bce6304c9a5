use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_library_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_ENRICHMENT_TIMEOUT_SEC, DEFAULT_ENRICHMENT_URL,
};
use song_library_server::mock_enrichment::{run_mock_enrichment_server, MockDataset};
use song_library_server::{
    run_server, EnrichmentClient, RequestsLoggingLevel, ServerConfig, SongLibrary,
    SqliteSongStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite songs database file. Created if missing.
    #[clap(value_parser = parse_path, env = "SONGS_DB", default_value = "songs.db")]
    pub db_path: PathBuf,

    /// The port to listen on.
    #[clap(short, long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the song enrichment service.
    #[clap(long, env = "API_BASE_URL", default_value = DEFAULT_ENRICHMENT_URL)]
    pub enrichment_url: String,

    /// Timeout in seconds for enrichment requests.
    #[clap(long, default_value_t = DEFAULT_ENRICHMENT_TIMEOUT_SEC)]
    pub enrichment_timeout_sec: u64,

    /// Also serve the mock enrichment service on this port.
    #[clap(long, env = "MOCK_ENRICHMENT_PORT")]
    pub mock_enrichment_port: Option<u16>,

    /// JSON dataset for the mock enrichment service. Defaults to the built-in table.
    #[clap(long = "mock-dataset", value_parser = parse_path)]
    pub mock_dataset_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override command line arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            enrichment_url: self.enrichment_url.clone(),
            enrichment_timeout_sec: self.enrichment_timeout_sec,
            mock_enrichment_port: self.mock_enrichment_port,
            mock_dataset_path: self.mock_dataset_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    if let Some(mock) = &config.mock_enrichment {
        let dataset = match &mock.dataset_path {
            Some(path) => MockDataset::load(path)?,
            None => MockDataset::builtin(),
        };
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", mock.port))
            .await
            .with_context(|| format!("Failed to bind mock enrichment port {}", mock.port))?;
        tokio::spawn(async move {
            if let Err(e) = run_mock_enrichment_server(listener, dataset).await {
                error!("Mock enrichment service stopped: {}", e);
            }
        });
    }

    info!("Opening SQLite songs database at {:?}...", config.db_path);
    let store = Arc::new(SqliteSongStore::new(&config.db_path)?);

    info!(
        "Enrichment service configured at {} (timeout {}s)",
        config.enrichment.base_url, config.enrichment.timeout_sec
    );
    let enricher = Arc::new(EnrichmentClient::new(
        config.enrichment.base_url.clone(),
        config.enrichment.timeout_sec,
    )?);

    let library = SongLibrary::new(store, enricher);
    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
    };

    run_server(server_config, library).await
}
