//! # civdoc
//!
//! Reads civil-servant appointment decrees delivered as base64-encoded PDFs.
//! Two independent components share the same request envelope:
//!
//! - [`metadata::extract_metadata`] reads the embedded document information
//!   through a [`metadata::MetadataReader`].
//! - [`extraction::ExtractionBridge`] asks a hosted model, through an
//!   [`providers::ai::AiProvider`], for the structured extraction mapping.
//!
//! Both return an [`types::Outcome`]; neither raises on bad input.

pub mod document;
pub mod errors;
pub mod extraction;
pub mod metadata;
pub mod prompts;
pub mod providers;
pub mod types;

pub use document::{decode_document, DocumentRequest, MissingDocument, MISSING_PDF_MESSAGE};
pub use errors::ExtractError;
pub use extraction::{ExtractionBridge, ExtractionSettings};
pub use metadata::{extract_metadata, MetadataReader, MetadataValue, RawMetadata};
pub use providers::factory::create_extraction_bridge;
pub use types::{
    DocumentMetadata, ExtractionOutcome, Failure, FailureKind, MetadataOutcome, Outcome,
    ProcessedDocument, ProviderConfig,
};

/// Runs metadata reading and AI extraction on the same payload.
///
/// The two components are independent: the metadata read runs on the
/// blocking pool while the model call is in flight.
pub async fn process_document(
    reader: &(dyn MetadataReader + 'static),
    bridge: &ExtractionBridge,
    encoded_pdf: &str,
) -> ProcessedDocument {
    let (metadata, extraction_result) = tokio::join!(
        extract_metadata(reader, encoded_pdf),
        bridge.extract(encoded_pdf)
    );
    ProcessedDocument {
        metadata,
        extraction_result,
    }
}
