use async_trait::async_trait;
use civdoc::{
    errors::ExtractError,
    metadata::{MetadataReader, RawMetadata},
    providers::ai::{AiProvider, GenerationConfig, GenerationRequest},
};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

/// What a `MockAiProvider` answers with.
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    Empty,
    Fail(String),
}

/// A request as seen by the mock provider.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub document: Vec<u8>,
    pub mime_type: String,
    pub prompt: String,
    pub system_instruction: String,
    pub config: GenerationConfig,
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    reply: Arc<Mutex<MockReply>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockAiProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers with the given text.
    pub fn replying(text: &str) -> Self {
        Self::new(MockReply::Text(text.to_string()))
    }

    /// Holds every reply back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, reply: MockReply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Option<String>, ExtractError> {
        self.calls.lock().unwrap().push(RecordedRequest {
            document: request.document.to_vec(),
            mime_type: request.mime_type.to_string(),
            prompt: request.prompt.to_string(),
            system_instruction: request.system_instruction.to_string(),
            config: request.config.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Fail(message) => Err(ExtractError::AiApi(message)),
        }
    }
}

// --- Mock Metadata Reader ---

/// What a `MockMetadataReader` answers with.
#[derive(Clone, Debug)]
pub enum MetadataReply {
    Found(RawMetadata),
    Missing,
    Fail(String),
    /// Panics inside the reader, standing in for an unexpected fault.
    Panic(String),
}

#[derive(Clone, Debug)]
pub struct MockMetadataReader {
    reply: MetadataReply,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockMetadataReader {
    pub fn new(reply: MetadataReply) -> Self {
        Self {
            reply,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Blocks the calling thread for `delay` on every read, like a slow parse.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The raw bytes of every document the reader was given.
    pub fn get_calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().clone()
    }
}

impl MetadataReader for MockMetadataReader {
    fn read_metadata(&self, pdf_data: &[u8]) -> Result<Option<RawMetadata>, ExtractError> {
        self.calls.lock().unwrap().push(pdf_data.to_vec());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match &self.reply {
            MetadataReply::Found(raw) => Ok(Some(raw.clone())),
            MetadataReply::Missing => Ok(None),
            MetadataReply::Fail(message) => Err(ExtractError::PdfRead(message.clone())),
            MetadataReply::Panic(message) => panic!("{message}"),
        }
    }
}

// --- Test-Specific Helpers ---
pub mod helpers {
    use anyhow::Result;
    use base64::{engine::general_purpose, Engine as _};
    use lopdf::{
        content::{Content, Operation},
        dictionary, Dictionary, Stream,
    };

    pub use lopdf::{Document, Object, ObjectId};

    /// Generates a single-page PDF showing `text`, with the given entries in
    /// its trailer `/Info` dictionary. An empty `info` omits the dictionary.
    pub fn generate_test_pdf(text: &str, info: &[(&str, Object)]) -> Result<Vec<u8>> {
        let info: Vec<(String, Object)> = info
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        generate_test_pdf_with(text, |_| info)
    }

    /// Like [`generate_test_pdf`], but `build_info` may add objects to the
    /// document first, so `/Info` entries can reference them.
    pub fn generate_test_pdf_with(
        text: &str,
        build_info: impl FnOnce(&mut Document) -> Vec<(String, Object)>,
    ) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info = build_info(&mut doc);
        if !info.is_empty() {
            let mut info_dict = Dictionary::new();
            for (key, value) in info {
                info_dict.set(key, value);
            }
            let info_id = doc.add_object(info_dict);
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Encodes bytes the way clients put them in the request envelope.
    pub fn encode_pdf(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }
}
