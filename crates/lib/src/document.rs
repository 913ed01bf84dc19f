//! # Request Envelope
//!
//! Validation of the `{"base64_pdf": "..."}` request body and decoding of the
//! embedded document. Validation never touches the payload beyond checking its
//! shape; decoding is left to each component that needs the raw bytes.

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use thiserror::Error;

/// The key that carries the base64-encoded PDF in every request body.
pub const BASE64_PDF_FIELD: &str = "base64_pdf";

/// The message returned to clients when the envelope is unusable.
pub const MISSING_PDF_MESSAGE: &str = "Missing 'base64_pdf' in request";

/// Returned when a request body does not hold a usable `base64_pdf` string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing 'base64_pdf' in request")]
pub struct MissingDocument;

/// A validated request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub base64_pdf: String,
}

impl DocumentRequest {
    /// Accepts only a non-empty JSON object whose `base64_pdf` entry is a string.
    pub fn from_value(body: &Value) -> Result<Self, MissingDocument> {
        let object = body.as_object().filter(|o| !o.is_empty()).ok_or(MissingDocument)?;
        let encoded = object
            .get(BASE64_PDF_FIELD)
            .and_then(Value::as_str)
            .ok_or(MissingDocument)?;
        Ok(Self {
            base64_pdf: encoded.to_string(),
        })
    }
}

/// Decodes a base64 document, ignoring the line breaks wrapped encoders insert.
pub fn decode_document(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        general_purpose::STANDARD.decode(compact)
    } else {
        general_purpose::STANDARD.decode(encoded)
    }
}
