pub mod gemini;

use crate::errors::ExtractError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Sampling and output settings sent with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub response_modalities: Vec<String>,
    /// Sends every harm category with `BLOCK_NONE` when set.
    pub disable_safety_filters: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.95,
            max_output_tokens: 8192,
            response_modalities: vec!["TEXT".to_string()],
            disable_safety_filters: false,
        }
    }
}

/// A single-turn request: one attached document plus an instruction.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub document: &'a [u8],
    pub mime_type: &'a str,
    pub prompt: &'a str,
    pub system_instruction: &'a str,
    pub config: &'a GenerationConfig,
}

/// A trait for interacting with a hosted multimodal model.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Sends the request and returns the model's text, or `None` when the
    /// response carried no text at all.
    async fn generate(&self, request: GenerationRequest<'_>)
        -> Result<Option<String>, ExtractError>;
}

dyn_clone::clone_trait_object!(AiProvider);
