//! # Metadata Extraction
//!
//! Reads the document information dictionary of a base64-encoded PDF through a
//! pluggable [`MetadataReader`] and normalizes whatever it returns into a
//! string-valued mapping.

use crate::{
    document::decode_document,
    errors::ExtractError,
    types::{DocumentMetadata, Failure, MetadataOutcome, Outcome},
};
use dyn_clone::DynClone;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use tracing::{debug, error, instrument};

/// A raw value from a PDF information dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Name(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Array(Vec<MetadataValue>),
    Dictionary(BTreeMap<String, MetadataValue>),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(text) => f.write_str(text),
            MetadataValue::Name(name) => write!(f, "/{name}"),
            MetadataValue::Integer(value) => write!(f, "{value}"),
            MetadataValue::Real(value) => write!(f, "{value}"),
            MetadataValue::Boolean(true) => f.write_str("True"),
            MetadataValue::Boolean(false) => f.write_str("False"),
            MetadataValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            MetadataValue::Dictionary(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "/{key}: {value}")?;
                }
                f.write_str("}")
            }
            MetadataValue::Null => f.write_str("None"),
        }
    }
}

/// The raw entries of a PDF information dictionary, keyed by entry name.
pub type RawMetadata = BTreeMap<String, MetadataValue>;

/// A trait for reading embedded document properties from PDF bytes.
///
/// `Ok(None)` means the document parsed but carries no information dictionary.
pub trait MetadataReader: Send + Sync + Debug + DynClone {
    fn read_metadata(&self, pdf_data: &[u8]) -> Result<Option<RawMetadata>, ExtractError>;
}

dyn_clone::clone_trait_object!(MetadataReader);

/// Decodes `encoded_pdf` and returns its metadata with every value stringified.
///
/// The reader runs on Tokio's blocking pool, since parsing a large PDF is
/// CPU-bound. Decoding and reader failures are recovered into
/// `Outcome::Failed`; a panic inside the reader is resumed on the caller.
#[instrument(skip_all)]
pub async fn extract_metadata(
    reader: &(dyn MetadataReader + 'static),
    encoded_pdf: &str,
) -> MetadataOutcome {
    let pdf_data = match decode_document(encoded_pdf) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error processing PDF metadata: {e}");
            return Outcome::Failed(Failure::decode(format!("Error reading PDF metadata: {e}")));
        }
    };
    debug!(bytes = pdf_data.len(), "Decoded PDF for metadata extraction.");

    let reader = dyn_clone::clone_box(reader);
    let read_result =
        match tokio::task::spawn_blocking(move || reader.read_metadata(&pdf_data)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(ExtractError::PdfRead(format!("Metadata task failed: {e}"))),
        };

    match read_result {
        Ok(Some(raw)) => Outcome::Succeeded(DocumentMetadata::Found(
            raw.into_iter().map(|(k, v)| (k, v.to_string())).collect(),
        )),
        Ok(None) => Outcome::Succeeded(DocumentMetadata::NotFound),
        Err(e) => {
            error!("Error processing PDF metadata: {e}");
            Outcome::Failed(Failure::collaborator(format!(
                "Error reading PDF metadata: {e}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stringify_like_plain_text() {
        assert_eq!(MetadataValue::Text("Jane".into()).to_string(), "Jane");
        assert_eq!(MetadataValue::Name("True".into()).to_string(), "/True");
        assert_eq!(MetadataValue::Integer(3).to_string(), "3");
        assert_eq!(MetadataValue::Real(1.5).to_string(), "1.5");
        assert_eq!(MetadataValue::Boolean(false).to_string(), "False");
        assert_eq!(MetadataValue::Null.to_string(), "None");
        assert_eq!(
            MetadataValue::Array(vec![
                MetadataValue::Integer(1),
                MetadataValue::Text("two".into())
            ])
            .to_string(),
            "[1, two]"
        );
    }
}
