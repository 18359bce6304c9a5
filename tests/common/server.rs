//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own database and its own mock
//! enrichment service.

use super::constants::*;
use song_library_server::mock_enrichment::{make_mock_enrichment_app, MockDataset};
use song_library_server::song_store::SongStore;
use song_library_server::{
    make_app, EnrichmentClient, RequestsLoggingLevel, ServerConfig, SongLibrary, SqliteSongStore,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, both servers shut down and the temp directory is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Base URL of the mock enrichment service the server talks to
    pub enrichment_url: String,

    /// Song store for direct database access in tests
    pub store: Arc<dyn SongStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_txs: Vec<tokio::sync::oneshot::Sender<()>>,
}

async fn spawn_router(router: axum::Router) -> (String, tokio::sync::oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
    });

    (format!("http://127.0.0.1:{}", port), shutdown_tx)
}

impl TestServer {
    /// Spawns the mock enrichment service with the built-in dataset and a
    /// song server pointing at it, both on random ports.
    pub async fn spawn() -> Self {
        Self::spawn_with_dataset(MockDataset::builtin()).await
    }

    pub async fn spawn_with_dataset(dataset: MockDataset) -> Self {
        let (enrichment_url, mock_shutdown_tx) =
            spawn_router(make_mock_enrichment_app(dataset)).await;
        Self::spawn_with_enrichment_url(enrichment_url, vec![mock_shutdown_tx]).await
    }

    /// Spawns a song server whose enrichment service is unreachable.
    pub async fn spawn_without_enrichment() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Failed to get local address");
        drop(listener);
        Self::spawn_with_enrichment_url(format!("http://{}", addr), Vec::new()).await
    }

    async fn spawn_with_enrichment_url(
        enrichment_url: String,
        mut shutdown_txs: Vec<tokio::sync::oneshot::Sender<()>>,
    ) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store: Arc<dyn SongStore> = Arc::new(
            SqliteSongStore::new(temp_db_dir.path().join("songs.db"))
                .expect("Failed to open song store"),
        );
        let enricher = Arc::new(
            EnrichmentClient::new(enrichment_url.clone(), ENRICHMENT_TIMEOUT_SECS)
                .expect("Failed to build enrichment client"),
        );

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port: 0,
        };
        let app = make_app(config, SongLibrary::new(store.clone(), enricher));
        let (base_url, shutdown_tx) = spawn_router(app).await;
        shutdown_txs.push(shutdown_tx);

        let server = Self {
            base_url,
            enrichment_url,
            store,
            _temp_db_dir: temp_db_dir,
            _shutdown_txs: shutdown_txs,
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for tx in self._shutdown_txs.drain(..) {
            let _ = tx.send(());
        }
    }
}
