use thiserror::Error;

/// Errors raised while talking to the document collaborators.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI request timed out after {0}s")]
    AiTimeout(u64),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Access token is missing for project '{0}'")]
    MissingAccessToken(String),
    #[error("{0}")]
    PdfRead(String),
}
