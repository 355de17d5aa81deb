//! The structured result every dispatched request resolves to.

use serde::{Deserialize, Serialize};

/// Terminal result of one request.
///
/// The control plane never lets an error cross its boundary unconverted:
/// every outcome, including rejections before dispatch, arrives as a
/// `Response` with `success` false and a human-readable `error`.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request was routed and executed successfully.
    pub success: bool,
    /// Executor result data; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable failure reason; present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Executor-reported confidence score in `[0, 1]`, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Response {
    /// Successful response carrying result data.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            confidence: None,
        }
    }

    /// Successful response with an executor-reported confidence score.
    pub fn ok_with_confidence(data: serde_json::Value, confidence: f64) -> Self {
        Self {
            confidence: Some(confidence),
            ..Self::ok(data)
        }
    }

    /// Failure response with a reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            confidence: None,
        }
    }
}
