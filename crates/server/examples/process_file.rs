//! Example: Processing a decree PDF from disk without the HTTP layer.
//!
//! This example runs the same pipeline as `POST /process-pdf`. It will:
//! 1. Load configuration from `config.yml` and environment variables.
//! 2. Read and base64-encode the PDF given on the command line.
//! 3. Print the combined metadata and extraction result as JSON.
//!
//! # Prerequisites
//!
//! - `AI_API_KEY` (or `GOOGLE_CLOUD_PROJECT` with `GOOGLE_OAUTH_ACCESS_TOKEN`)
//!   set in the environment or a `.env` file.
//!
//! # Usage
//!
//! From the workspace root:
//! `cargo run -p civdoc-server --example process_file -- path/to/decree.pdf`

use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use civdoc::process_document;
use civdoc_server::{config::get_config, state::build_app_state};
use std::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .context("Usage: process_file <path-to-pdf>")?;
    let bytes = fs::read(&path).with_context(|| format!("Failed to read '{path}'"))?;
    let encoded = general_purpose::STANDARD.encode(bytes);

    let config = get_config(None)?;
    let app_state = build_app_state(config)?;

    let processed = process_document(
        app_state.metadata_reader.as_ref(),
        &app_state.extraction_bridge,
        &encoded,
    )
    .await;
    println!("{}", serde_json::to_string_pretty(&processed)?);

    Ok(())
}
