//! # civdoc-pdf: PDF Metadata Reader
//!
//! Implements the `MetadataReader` collaborator from `civdoc` on top of
//! `lopdf`. Only the trailer `/Info` dictionary is read; page content is
//! never parsed.

use civdoc::{
    errors::ExtractError,
    metadata::{MetadataReader, MetadataValue, RawMetadata},
};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, instrument};

const MAX_REFERENCE_DEPTH: usize = 8;
/// Upper bound on objects converted for one `/Info` dictionary.
pub const MAX_CONVERTED_OBJECTS: usize = 4096;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfMetadataError {
    #[error("Failed to parse PDF: {0}")]
    Load(#[from] lopdf::Error),
    #[error("Document /Info entry is not a dictionary")]
    InvalidInfo,
}

impl From<PdfMetadataError> for ExtractError {
    fn from(err: PdfMetadataError) -> Self {
        ExtractError::PdfRead(err.to_string())
    }
}

// --- Value Conversion ---

/// PDFDocEncoding characters for bytes 0x18..=0x1F.
const PDF_DOC_ACCENTS: [char; 8] = [
    '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}', '\u{02DC}',
];

/// PDFDocEncoding characters for bytes 0x80..=0x9F.
const PDF_DOC_HIGH: [char; 32] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}', '\u{FFFD}',
];

/// Maps one PDFDocEncoding byte to its character. Undefined codes become U+FFFD.
pub fn pdf_doc_char(byte: u8) -> char {
    match byte {
        0x18..=0x1F => PDF_DOC_ACCENTS[usize::from(byte - 0x18)],
        0x7F | 0xAD => char::REPLACEMENT_CHARACTER,
        0x80..=0x9F => PDF_DOC_HIGH[usize::from(byte - 0x80)],
        0xA0 => '\u{20AC}',
        _ => char::from(byte),
    }
}

/// Decodes a PDF text string: UTF-16BE or UTF-8 when a byte-order mark says
/// so, otherwise UTF-8 if valid and PDFDocEncoding as the last resort.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| pdf_doc_char(b)).collect(),
    }
}

/// The `n g R` form an unresolved indirect reference renders as.
fn unresolved(id: ObjectId) -> MetadataValue {
    MetadataValue::Text(format!("{} {} R", id.0, id.1))
}

/// Converts `lopdf` objects while resolving indirect references.
///
/// A reference already being expanded on the current path, one past the
/// depth limit, or any met after `MAX_CONVERTED_OBJECTS` conversions is left
/// unresolved.
struct Converter<'a> {
    doc: &'a Document,
    resolving: HashSet<ObjectId>,
    converted: usize,
}

impl<'a> Converter<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            resolving: HashSet::new(),
            converted: 0,
        }
    }

    fn convert(&mut self, object: &Object, depth: usize) -> MetadataValue {
        self.converted += 1;
        match object {
            Object::Null => MetadataValue::Null,
            Object::Boolean(value) => MetadataValue::Boolean(*value),
            Object::Integer(value) => MetadataValue::Integer(*value),
            Object::Real(value) => MetadataValue::Real(f64::from(*value)),
            Object::Name(name) => MetadataValue::Name(String::from_utf8_lossy(name).into_owned()),
            Object::String(bytes, _) => MetadataValue::Text(decode_text_string(bytes)),
            Object::Array(items) => MetadataValue::Array(
                items
                    .iter()
                    .map(|item| self.convert(item, depth + 1))
                    .collect(),
            ),
            Object::Dictionary(dict) => self.convert_dictionary(dict, depth),
            Object::Stream(stream) => self.convert_dictionary(&stream.dict, depth),
            Object::Reference(id) => self.resolve(*id, depth),
        }
    }

    fn convert_dictionary(&mut self, dict: &Dictionary, depth: usize) -> MetadataValue {
        MetadataValue::Dictionary(
            dict.iter()
                .map(|(key, value)| {
                    (
                        String::from_utf8_lossy(key).into_owned(),
                        self.convert(value, depth + 1),
                    )
                })
                .collect(),
        )
    }

    fn resolve(&mut self, id: ObjectId, depth: usize) -> MetadataValue {
        if depth >= MAX_REFERENCE_DEPTH
            || self.converted >= MAX_CONVERTED_OBJECTS
            || self.resolving.contains(&id)
        {
            return unresolved(id);
        }
        let doc = self.doc;
        let Ok(target) = doc.get_object(id) else {
            return MetadataValue::Null;
        };
        self.resolving.insert(id);
        let value = self.convert(target, depth + 1);
        self.resolving.remove(&id);
        value
    }
}

// --- Reader Implementation ---

/// Reads the document information dictionary with `lopdf`.
///
/// Entry names keep their leading slash (`/Author`, `/CreationDate`).
#[derive(Debug, Clone, Default)]
pub struct LopdfMetadataReader;

impl LopdfMetadataReader {
    pub fn new() -> Self {
        Self
    }

    fn read(&self, pdf_data: &[u8]) -> Result<Option<RawMetadata>, PdfMetadataError> {
        let doc = Document::load_mem(pdf_data)?;
        let Ok(info) = doc.trailer.get(b"Info") else {
            debug!("PDF trailer has no /Info entry.");
            return Ok(None);
        };
        let mut converter = Converter::new(&doc);
        let info = match info {
            Object::Reference(id) => {
                converter.resolving.insert(*id);
                doc.get_object(*id)?
            }
            direct => direct,
        };
        let dict = info.as_dict().map_err(|_| PdfMetadataError::InvalidInfo)?;

        let entries: BTreeMap<String, MetadataValue> = dict
            .iter()
            .map(|(key, value)| {
                (
                    format!("/{}", String::from_utf8_lossy(key)),
                    converter.convert(value, 0),
                )
            })
            .collect();
        debug!(entries = entries.len(), "Read PDF /Info dictionary.");
        // An empty dictionary reports the same as a missing one.
        Ok((!entries.is_empty()).then_some(entries))
    }
}

impl MetadataReader for LopdfMetadataReader {
    #[instrument(skip_all, fields(bytes = pdf_data.len()))]
    fn read_metadata(&self, pdf_data: &[u8]) -> Result<Option<RawMetadata>, ExtractError> {
        Ok(self.read(pdf_data)?)
    }
}
