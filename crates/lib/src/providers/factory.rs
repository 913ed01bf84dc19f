//! # AI Provider Factory
//!
//! Builds the inference provider and the extraction bridge from a
//! [`ProviderConfig`], so the server and the tests construct them the same way.

use crate::{
    errors::ExtractError,
    extraction::{ExtractionBridge, ExtractionSettings},
    providers::ai::{
        gemini::{generative_language_url, vertex_ai_url, GeminiAuth, GeminiProvider},
        GenerationConfig,
    },
    types::ProviderConfig,
};
use std::time::Duration;
use tracing::{info, warn};

/// Resolves the endpoint URL and credentials for a Gemini provider.
pub fn resolve_gemini_endpoint(
    config: &ProviderConfig,
) -> Result<(String, GeminiAuth), ExtractError> {
    match &config.project_id {
        Some(project_id) => {
            let api_url = config.api_url.clone().unwrap_or_else(|| {
                vertex_ai_url(project_id, &config.region, &config.model_name)
            });
            let auth = match (&config.access_token, &config.api_url) {
                (Some(token), _) => GeminiAuth::BearerToken(token.clone()),
                (None, Some(_)) => GeminiAuth::None,
                (None, None) => return Err(ExtractError::MissingAccessToken(project_id.clone())),
            };
            Ok((api_url, auth))
        }
        None => {
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| generative_language_url(&config.model_name));
            let auth = match (&config.api_key, &config.api_url) {
                (Some(key), _) => GeminiAuth::ApiKey(key.clone()),
                (None, Some(_)) => GeminiAuth::None,
                (None, None) => return Err(ExtractError::MissingApiKey),
            };
            Ok((api_url, auth))
        }
    }
}

/// Creates the Gemini-backed extraction bridge described by `config`.
pub fn create_extraction_bridge(config: &ProviderConfig) -> Result<ExtractionBridge, ExtractError> {
    let (api_url, auth) = resolve_gemini_endpoint(config)?;
    info!(
        model = %config.model_name,
        "Configuring Gemini provider with URL: {}",
        api_url
    );
    if matches!(auth, GeminiAuth::None) {
        warn!("No Gemini credentials configured; requests will be sent unauthenticated.");
    }
    if config.disable_safety_filters {
        warn!("Content safety filtering is disabled for extraction requests.");
    }

    let provider = GeminiProvider::new(api_url, auth)?;
    let settings = ExtractionSettings {
        generation: GenerationConfig {
            disable_safety_filters: config.disable_safety_filters,
            ..GenerationConfig::default()
        },
        timeout: Duration::from_secs(config.timeout_secs),
    };
    Ok(ExtractionBridge::new(Box::new(provider), settings))
}
