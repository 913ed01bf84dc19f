//! # API Route Handlers
//!
//! This module organizes the Axum route handlers for the `civdoc-server`.
//! Handlers are split between the service endpoints (`general`) and the
//! document-processing endpoints (`document_handlers`).

// Sub-modules for different handler categories.
pub mod document_handlers;
pub mod general;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use document_handlers::*;
pub use general::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
