//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `civdoc-server`
//! integration tests:
//!
//! - `TestApp::spawn_with_mocks`: a real server on a random port whose
//!   collaborators are in-process mocks from `civdoc-test-utils`.
//! - `TestApp::spawn_with_gemini`: a real server built from a config file,
//!   using the real PDF reader and a Gemini provider pointed at an
//!   `httpmock::MockServer`.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use civdoc::{ExtractionBridge, ExtractionSettings, ProviderConfig};
use civdoc_server::{
    config::{get_config, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use civdoc_test_utils::{MetadataReply, MockAiProvider, MockMetadataReader};
use httpmock::MockServer;
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc, time::Duration};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const GEMINI_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Test-friendly config: no credentials needed because every test injects
/// its own collaborators or an explicit provider URL.
pub fn test_config(strict_status_codes: bool) -> AppConfig {
    AppConfig {
        port: 0,
        max_body_bytes: 1024 * 1024,
        strict_status_codes,
        ai: ProviderConfig::default(),
    }
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: Option<MockServer>,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with mock collaborators.
    pub async fn spawn_with_mocks(
        reader: MockMetadataReader,
        provider: MockAiProvider,
        strict_status_codes: bool,
    ) -> Result<Self> {
        let bridge = ExtractionBridge::new(
            Box::new(provider),
            ExtractionSettings {
                timeout: Duration::from_secs(5),
                ..Default::default()
            },
        );
        let app_state = AppState::new(test_config(strict_status_codes), Arc::new(reader), bridge);
        TestApp::spawn_with_state(app_state).await
    }

    /// Spawns the server from a YAML config that points the Gemini provider
    /// at a fresh mock server. The real `lopdf` reader is used.
    pub async fn spawn_with_gemini() -> Result<Self> {
        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
ai:
  model_name: "gemini-test"
  api_url: "{}"
  api_key: "test-key"
  timeout_secs: 5
"#,
            mock_server.url(GEMINI_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config)?;

        let mut app = TestApp::spawn_with_state(app_state).await?;
        app.mock_server = Some(mock_server);
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState) -> Result<Self> {
        dotenvy::dotenv().ok();
        // `try_init` is used to prevent panic if the logger is already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server: None,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// POSTs a JSON body and returns the status code and parsed JSON response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<(u16, Value)> {
        let response = self
            .client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    /// POSTs a raw body with the given content type.
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: &'static str,
    ) -> Result<(u16, Value)> {
        let response = self
            .client
            .post(format!("{}{path}", self.address))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    pub async fn get_json(&self, path: &str) -> Result<(u16, Value)> {
        let response = self
            .client
            .get(format!("{}{path}", self.address))
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A reader that answers with an empty information dictionary.
pub fn missing_metadata_reader() -> MockMetadataReader {
    MockMetadataReader::new(MetadataReply::Missing)
}
