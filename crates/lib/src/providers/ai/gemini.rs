use crate::{
    errors::ExtractError,
    providers::ai::{AiProvider, GenerationRequest},
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, instrument};

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    generation_config: GeminiGenerationConfig<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    response_modalities: &'a [String],
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
}

// --- Gemini Provider implementation ---

/// How requests to the Gemini endpoint are authenticated.
#[derive(Clone)]
pub enum GeminiAuth {
    /// Generative Language API key, sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth access token for Vertex AI, sent as a bearer token.
    BearerToken(String),
    /// No credentials; only useful against local proxies and mocks.
    None,
}

impl Debug for GeminiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiAuth::ApiKey(_) => f.write_str("ApiKey(..)"),
            GeminiAuth::BearerToken(_) => f.write_str("BearerToken(..)"),
            GeminiAuth::None => f.write_str("None"),
        }
    }
}

/// The `generateContent` URL on the Generative Language API.
pub fn generative_language_url(model_name: &str) -> String {
    format!("https://generativelanguage.googleapis.com/v1beta/models/{model_name}:generateContent")
}

/// The `generateContent` URL for a publisher model on Vertex AI.
pub fn vertex_ai_url(project_id: &str, region: &str, model_name: &str) -> String {
    format!(
        "https://{region}-aiplatform.googleapis.com/v1/projects/{project_id}/locations/{region}/publishers/google/models/{model_name}:generateContent"
    )
}

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    auth: GeminiAuth,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(api_url: String, auth: GeminiAuth) -> Result<Self, ExtractError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ExtractError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            auth,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    /// Sends the document and instructions to `generateContent`.
    #[instrument(skip_all, fields(api_url = %self.api_url))]
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Option<String>, ExtractError> {
        let config = request.config;
        let safety_settings = if config.disable_safety_filters {
            HARM_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect()
        } else {
            Vec::new()
        };

        let request_body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type,
                            data: general_purpose::STANDARD.encode(request.document),
                        },
                    },
                    Part::Text {
                        text: request.prompt,
                    },
                ],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: request.system_instruction,
                }],
            },
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
                response_modalities: &config.response_modalities,
            },
            safety_settings,
        };

        let mut builder = self.client.post(&self.api_url).json(&request_body);
        builder = match &self.auth {
            GeminiAuth::ApiKey(key) => builder.query(&[("key", key)]),
            GeminiAuth::BearerToken(token) => builder.bearer_auth(token),
            GeminiAuth::None => builder,
        };

        let response = builder.send().await.map_err(ExtractError::AiRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractError::AiApi(format!("{status}: {error_text}")));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(ExtractError::AiDeserialization)?;

        let text: String = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        debug!(chars = text.len(), "Received Gemini response.");
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}
