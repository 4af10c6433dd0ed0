//! Response envelope shared by every remote operation.
//!
//! The masking service wraps every response in a uniform envelope:
//! a `success` flag, an optional typed `result`, and an error that
//! arrives in one of two shapes. Older endpoints report a bare integer
//! code with the human-readable text in a sibling `reason` field;
//! newer ones report a structured object carrying `errorMessage`.
//! Exactly one shape is used per failing response, and the caller
//! cannot know in advance which one applies.

use serde::Deserialize;

/// Uniform response wrapper for every remote call.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Absent is treated the same as `false`.
    #[serde(default)]
    pub success: bool,

    pub result: Option<T>,

    pub error: Option<ErrorShape>,

    /// Sibling message used by the integer-code error shape.
    pub reason: Option<String>,
}

/// The error field as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorShape {
    /// Bare integer code; the message lives in the envelope's `reason`.
    Code(i64),

    /// Structured object carrying its own message.
    Structured {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },

    /// Anything else the service might send.
    Other(serde_json::Value),
}

/// Normalized error, extracted once instead of special-cased at every
/// call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorInfo {
    IntCode { code: i64, reason: String },
    Structured { message: String },
    Unknown,
}

impl ErrorInfo {
    /// Best-effort human-readable message.
    pub fn message(&self) -> &str {
        match self {
            ErrorInfo::IntCode { reason, .. } => reason,
            ErrorInfo::Structured { message } => message,
            ErrorInfo::Unknown => "Unknown",
        }
    }
}

impl<T> Envelope<T> {
    /// Normalize the dual-shape error into an [`ErrorInfo`].
    ///
    /// An integer code without its sibling `reason`, or any shape we do
    /// not recognize, degrades to [`ErrorInfo::Unknown`].
    pub fn error_info(&self) -> ErrorInfo {
        match (&self.error, &self.reason) {
            (Some(ErrorShape::Code(code)), Some(reason)) => ErrorInfo::IntCode {
                code: *code,
                reason: reason.clone(),
            },
            (Some(ErrorShape::Structured { error_message }), _) => ErrorInfo::Structured {
                message: error_message.clone(),
            },
            _ => ErrorInfo::Unknown,
        }
    }

    /// The normalized error message for logging.
    pub fn error_message(&self) -> String {
        self.error_info().message().to_string()
    }
}
