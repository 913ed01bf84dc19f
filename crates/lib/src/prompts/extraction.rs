//! # Appointment Decree Extraction Prompts

/// The user-turn instruction that accompanies the attached PDF.
pub const EXTRACTION_USER_PROMPT: &str = "Generate JSON output with only the parsed content.";

/// The keys the model is asked to return, in the order the instruction lists them.
pub const EXTRACTION_FIELDS: [&str; 12] = [
    "name",
    "nip",
    "place_of_birth",
    "date_of_birth",
    "education",
    "title",
    "work_duration",
    "work_unit",
    "gov_instance",
    "signer",
    "signer_employee_id",
    "copied",
];

/// The system instruction describing the target shape and the extraction policies.
///
/// Two behaviours are load-bearing: fields that cannot be read from the
/// document must come back as `null`, and `copied` reports whether the pages
/// look photocopied (grayscale).
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"I will give you PDF and Image files. The files are an official document that has the document number, the guidelines, and the details of a person to be hired as a civil servant. I need you to parse the civil person's information into JSON in the array format:
{"name": "", "nip": "", "place_of_birth": "", "date_of_birth": "", "education": "", "title": "", "work_duration": "", "work_unit": "", "gov_instance": "", "signer": "", "signer_employee_id": "", "copied": ""}

Detect if the document is photocopied by scanning all of the pages in the document, grayscale is a sign that the document is copied and return with yes or no.

Do NOT add any other attributes. Do not hallucinate, if you cannot parse the text from the document respond with null."#;
