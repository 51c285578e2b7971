//! Uniform response envelope returned by the platform's REST services.
//!
//! Auth, course and profile services all reply with the same shape:
//! `{ success, message, data, errorCode }`.  The core never inspects
//! anything beyond this recognized surface; [`ApiEnvelope::into_result`]
//! collapses it to an ordinary `Result`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Failure decoded from a service envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The service reported `success = false`.
    #[error("service rejected the request: {message} (code {code})")]
    Rejected { message: String, code: String },

    /// The service reported success but sent no payload.
    #[error("service response was missing its data payload")]
    MissingData,
}

// ---------------------------------------------------------------------------
// ApiEnvelope
// ---------------------------------------------------------------------------

/// The uniform `{success, message, data, errorCode}` wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Collapse the envelope into a `Result`, consuming it.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.message.unwrap_or_else(|| "unknown error".into()),
                code: self.error_code.unwrap_or_else(|| "UNKNOWN".into()),
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
