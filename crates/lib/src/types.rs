use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Configuration for the inference provider used by the extraction bridge.
///
/// With a `project_id` the provider targets Vertex AI and authenticates with
/// `access_token`; otherwise it targets the Generative Language API with
/// `api_key`. `api_url` replaces the derived endpoint in both cases.
#[derive(Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub disable_safety_filters: bool,
}

fn default_model_name() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            api_url: None,
            api_key: None,
            project_id: None,
            region: default_region(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            disable_safety_filters: false,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model_name", &self.model_name)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("disable_safety_filters", &self.disable_safety_filters)
            .finish()
    }
}

/// Why a component gave up on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The base64 payload could not be decoded.
    Decode,
    /// A collaborator (PDF reader or AI provider) failed or returned nothing usable.
    Collaborator,
}

/// A recovered, per-request failure. Serializes as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Decode,
            message: message.into(),
        }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Collaborator,
            message: message.into(),
        }
    }
}

/// The result of running one component against a document.
///
/// `Succeeded(value)` serializes as `value` itself and `Failed` as an
/// `{"error": ...}` object, which is the wire shape clients already expect.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Succeeded(T),
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Failed(Failure {
                kind: FailureKind::Decode,
                ..
            })
        )
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Succeeded(_) => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Succeeded(value) => value.serialize(serializer),
            Outcome::Failed(failure) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &failure.message)?;
                map.end()
            }
        }
    }
}

pub const NO_METADATA_MARKER: &str = "No metadata found";

/// Document information read from a PDF, with every value stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMetadata {
    Found(BTreeMap<String, String>),
    NotFound,
}

impl Serialize for DocumentMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            DocumentMetadata::Found(entries) => map.serialize_entry("metadata", entries)?,
            DocumentMetadata::NotFound => map.serialize_entry("metadata", NO_METADATA_MARKER)?,
        }
        map.end()
    }
}

pub type MetadataOutcome = Outcome<DocumentMetadata>;
pub type ExtractionOutcome = Outcome<serde_json::Value>;

/// The combined body returned by `/process-pdf`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub metadata: MetadataOutcome,
    pub extraction_result: ExtractionOutcome,
}
