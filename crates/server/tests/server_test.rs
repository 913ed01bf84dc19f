//! # Server Endpoint Tests
//!
//! Integration tests for the `civdoc-server` endpoints that do not depend on
//! document content: health checks, envelope validation and error statuses.

mod common;

use anyhow::Result;
use civdoc_test_utils::{MetadataReply, MockAiProvider, MockMetadataReader};
use common::{missing_metadata_reader, TestApp};
use serde_json::json;

const DOCUMENT_ENDPOINTS: [&str; 3] = ["/metadata", "/extract", "/process-pdf"];
const MISSING_PDF: &str = "Missing 'base64_pdf' in request";

#[tokio::test]
async fn test_health_check_endpoint() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;

    // Act
    let (status, body) = app.get_json("/health").await?;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "running"}));
    Ok(())
}

#[tokio::test]
async fn test_invalid_envelopes_are_rejected_before_any_work() -> Result<()> {
    // Arrange
    let reader = missing_metadata_reader();
    let provider = MockAiProvider::replying("{}");
    let app = TestApp::spawn_with_mocks(reader.clone(), provider.clone(), false).await?;

    let invalid_bodies = [
        json!({}),
        json!({"pdf": "JVBERi0="}),
        json!({"base64_pdf": 42}),
        json!({"base64_pdf": null}),
        json!(["base64_pdf"]),
        json!("JVBERi0="),
    ];

    for path in DOCUMENT_ENDPOINTS {
        for body in &invalid_bodies {
            // Act
            let (status, response) = app.post_json(path, body).await?;

            // Assert
            assert_eq!(status, 400, "{path} accepted {body}");
            assert_eq!(response, json!({"error": MISSING_PDF}));
        }
    }

    assert!(reader.get_calls().is_empty());
    assert!(provider.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreadable_bodies_are_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;

    for path in DOCUMENT_ENDPOINTS {
        // Act: syntactically invalid JSON (missing closing brace).
        let (status, body) = app
            .post_raw(path, "application/json", r#"{"base64_pdf": "JVBERi0=""#)
            .await?;
        // Assert
        assert_eq!(status, 400);
        assert_eq!(body["error"], MISSING_PDF);

        // Act: a valid envelope sent without a JSON content type.
        let (status, body) = app
            .post_raw(path, "text/plain", r#"{"base64_pdf": "JVBERi0="}"#)
            .await?;
        // Assert
        assert_eq!(status, 400);
        assert_eq!(body["error"], MISSING_PDF);
    }
    Ok(())
}

#[tokio::test]
async fn test_health_is_unaffected_by_failed_requests() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;

    // Act
    app.post_json("/process-pdf", &json!({})).await?;
    app.post_json("/extract", &json!({"base64_pdf": "%%%"}))
        .await?;
    let (status, body) = app.get_json("/health").await?;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body["status"], "running");
    Ok(())
}

#[tokio::test]
async fn test_undecodable_payload_status_follows_strict_mode() -> Result<()> {
    // Arrange
    let lenient = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;
    let strict = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        true,
    )
    .await?;
    let body = json!({"base64_pdf": "not*base64"});

    for path in DOCUMENT_ENDPOINTS {
        // Act
        let (lenient_status, lenient_body) = lenient.post_json(path, &body).await?;
        let (strict_status, strict_body) = strict.post_json(path, &body).await?;

        // Assert: same body, different status.
        assert_eq!(lenient_status, 200, "{path}");
        assert_eq!(strict_status, 422, "{path}");
        assert_eq!(lenient_body, strict_body);
    }

    let (_, metadata) = strict.post_json("/metadata", &body).await?;
    assert!(metadata["error"]
        .as_str()
        .unwrap()
        .starts_with("Error reading PDF metadata: "));
    let (_, extraction) = strict.post_json("/extract", &body).await?;
    assert!(extraction["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid base64 encoding: "));
    Ok(())
}

#[tokio::test]
async fn test_strict_mode_keeps_200_for_collaborator_failures() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        MockMetadataReader::new(MetadataReply::Fail("Failed to parse PDF: bad xref".into())),
        MockAiProvider::replying("{}"),
        true,
    )
    .await?;

    // Act
    let (status, body) = app
        .post_json("/metadata", &json!({"base64_pdf": "aGVsbG8="}))
        .await?;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"error": "Error reading PDF metadata: Failed to parse PDF: bad xref"})
    );
    Ok(())
}

#[tokio::test]
async fn test_unexpected_fault_returns_redacted_500() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        MockMetadataReader::new(MetadataReply::Panic("reader exploded at 0xdeadbeef".into())),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;

    // Act
    let (status, body) = app
        .post_json("/metadata", &json!({"base64_pdf": "aGVsbG8="}))
        .await?;

    // Assert
    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "An internal server error occurred."}));

    // The server keeps serving after the fault.
    let (status, _) = app.get_json("/health").await?;
    assert_eq!(status, 200);
    Ok(())
}

#[tokio::test]
async fn test_cors_headers_are_present() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_mocks(
        missing_metadata_reader(),
        MockAiProvider::replying("{}"),
        false,
    )
    .await?;

    // Act
    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("Origin", "http://example.com")
        .send()
        .await?;

    // Assert
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}
