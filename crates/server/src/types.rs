use serde::{Deserialize, Serialize};

/// The body returned by `/health`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}
