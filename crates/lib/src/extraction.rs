//! # AI Extraction Bridge
//!
//! Sends a decoded PDF to the configured [`AiProvider`] with the fixed
//! appointment-decree instructions and turns the model's text into JSON.
//! The returned JSON is passed through as-is: its shape is the model's
//! responsibility, and missing keys are only logged.

use crate::{
    document::decode_document,
    errors::ExtractError,
    prompts::extraction::{EXTRACTION_FIELDS, EXTRACTION_SYSTEM_PROMPT, EXTRACTION_USER_PROMPT},
    providers::ai::{AiProvider, GenerationConfig, GenerationRequest},
    types::{ExtractionOutcome, Failure, Outcome},
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const UNPARSABLE_RESPONSE_MESSAGE: &str = "Could not parse AI response";

/// Construction-time settings for the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSettings {
    pub generation: GenerationConfig,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Runs structured-field extraction against a hosted model.
#[derive(Clone, Debug)]
pub struct ExtractionBridge {
    provider: Box<dyn AiProvider>,
    settings: ExtractionSettings,
}

impl ExtractionBridge {
    pub fn new(provider: Box<dyn AiProvider>, settings: ExtractionSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Decodes `encoded_pdf`, asks the model for the extraction mapping and
    /// parses its reply. Every failure is recovered into `Outcome::Failed`.
    #[instrument(skip_all)]
    pub async fn extract(&self, encoded_pdf: &str) -> ExtractionOutcome {
        let pdf_data = match decode_document(encoded_pdf) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Base64 decoding error: {e}");
                return Outcome::Failed(Failure::decode(format!("Invalid base64 encoding: {e}")));
            }
        };

        info!(bytes = pdf_data.len(), "Requesting AI extraction.");
        let request = GenerationRequest {
            document: &pdf_data,
            mime_type: PDF_MIME_TYPE,
            prompt: EXTRACTION_USER_PROMPT,
            system_instruction: EXTRACTION_SYSTEM_PROMPT,
            config: &self.settings.generation,
        };

        let response = tokio::time::timeout(self.settings.timeout, self.provider.generate(request))
            .await
            .unwrap_or(Err(ExtractError::AiTimeout(self.settings.timeout.as_secs())));

        match response {
            Ok(Some(text)) => parse_model_json(&text),
            Ok(None) => {
                warn!("AI response contained no text.");
                Outcome::Failed(Failure::collaborator(UNPARSABLE_RESPONSE_MESSAGE))
            }
            Err(e) => {
                error!("Error processing AI extraction: {e}");
                Outcome::Failed(Failure::collaborator(format!(
                    "Error processing AI extraction: {e}"
                )))
            }
        }
    }
}

/// Removes a surrounding Markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_model_json(text: &str) -> ExtractionOutcome {
    let cleaned = strip_code_fence(text);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => {
            if let Value::Object(fields) = &value {
                let missing: Vec<&str> = EXTRACTION_FIELDS
                    .iter()
                    .copied()
                    .filter(|key| !fields.contains_key(*key))
                    .collect();
                if !missing.is_empty() {
                    warn!(?missing, "AI response is missing expected extraction fields.");
                }
            }
            debug!("Parsed AI extraction response.");
            Outcome::Succeeded(value)
        }
        Err(e) => {
            warn!("Failed to parse AI response as JSON: {e}. Raw response: '{cleaned}'");
            Outcome::Failed(Failure::collaborator(UNPARSABLE_RESPONSE_MESSAGE))
        }
    }
}
