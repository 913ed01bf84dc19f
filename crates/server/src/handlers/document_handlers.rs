//! # Document Route Handlers
//!
//! Handlers for `/metadata`, `/extract` and `/process-pdf`. Each validates the
//! request envelope, runs the relevant `civdoc` component(s) and returns the
//! serialized outcome. Recovered component failures are part of a normal
//! response; only envelope problems end the request with an error status.

use super::{AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use civdoc::{
    extract_metadata, process_document, DocumentRequest, ExtractionOutcome, MetadataOutcome,
    MissingDocument, ProcessedDocument,
};
use serde_json::Value;
use tracing::{info, warn};

/// Checks the body for a usable `base64_pdf` string.
///
/// Bodies the JSON extractor cannot read at all are treated like bodies
/// without the field, except for oversized ones.
fn validate_request(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<DocumentRequest, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        warn!("Unreadable request body: {}", rejection.body_text());
        AppError::Validation(MissingDocument)
    })?;
    Ok(DocumentRequest::from_value(&body)?)
}

/// 200 for every completed request, unless strict mode asks for 422 on
/// payloads that could not be decoded.
fn completion_status(app_state: &AppState, decode_failed: bool) -> StatusCode {
    if decode_failed && app_state.config.strict_status_codes {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    }
}

/// The handler for the `/metadata` endpoint.
pub async fn metadata_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MetadataOutcome>), AppError> {
    let request = validate_request(payload)?;
    info!(
        encoded_len = request.base64_pdf.len(),
        "Received metadata request."
    );

    let outcome =
        extract_metadata(app_state.metadata_reader.as_ref(), &request.base64_pdf).await;
    let status = completion_status(&app_state, outcome.is_decode_failure());
    Ok((status, Json(outcome)))
}

/// The handler for the `/extract` endpoint.
pub async fn extract_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ExtractionOutcome>), AppError> {
    let request = validate_request(payload)?;
    info!(
        encoded_len = request.base64_pdf.len(),
        "Received extraction request."
    );

    let outcome = app_state.extraction_bridge.extract(&request.base64_pdf).await;
    let status = completion_status(&app_state, outcome.is_decode_failure());
    Ok((status, Json(outcome)))
}

/// The handler for the `/process-pdf` endpoint, which runs both components.
pub async fn process_pdf_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcessedDocument>), AppError> {
    let request = validate_request(payload)?;
    info!(
        encoded_len = request.base64_pdf.len(),
        "Received process-pdf request."
    );

    let processed = process_document(
        app_state.metadata_reader.as_ref(),
        &app_state.extraction_bridge,
        &request.base64_pdf,
    )
    .await;
    let decode_failed =
        processed.metadata.is_decode_failure() && processed.extraction_result.is_decode_failure();
    let status = completion_status(&app_state, decode_failed);
    Ok((status, Json(processed)))
}
