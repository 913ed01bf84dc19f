//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state is immutable: it holds the resolved
//! configuration and the two document collaborators, and nothing a request
//! could write to.

use crate::config::AppConfig;
use civdoc::{create_extraction_bridge, ExtractionBridge, MetadataReader};
use civdoc_pdf::LopdfMetadataReader;
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// Reads embedded PDF document information.
    pub metadata_reader: Arc<dyn MetadataReader>,
    /// Sends documents to the inference provider for field extraction.
    pub extraction_bridge: Arc<ExtractionBridge>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        metadata_reader: Arc<dyn MetadataReader>,
        extraction_bridge: ExtractionBridge,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata_reader,
            extraction_bridge: Arc::new(extraction_bridge),
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// Fails when the inference provider has no usable credentials.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let extraction_bridge = create_extraction_bridge(&config.ai)?;
    info!(
        timeout_secs = config.ai.timeout_secs,
        strict_status_codes = config.strict_status_codes,
        "Initialized extraction bridge."
    );

    Ok(AppState::new(
        config,
        Arc::new(LopdfMetadataReader::new()),
        extraction_bridge,
    ))
}
