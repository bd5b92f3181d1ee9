//! Detection results and their wire shape
//!
//! In Rust a result is a two-armed enum, so "both" or "neither" cannot be
//! represented. On the wire it is `{ success, value?, error? }`; conversion
//! from the wire form rejects inconsistent objects.

use crate::{DomainError, value_objects::ErrorCode};
use serde::{Deserialize, Serialize};

/// Outcome of one decode attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DetectionResultDto", try_from = "DetectionResultDto")]
pub enum DetectionResult {
    /// A symbol was decoded
    Detected(String),
    /// No value; the catalog code explains why
    Failed(ErrorCode),
}

impl DetectionResult {
    /// Successful result
    pub fn detected(value: impl Into<String>) -> Self {
        Self::Detected(value.into())
    }

    /// Failed result
    pub fn failed(code: ErrorCode) -> Self {
        Self::Failed(code)
    }

    /// True for the `Detected` arm
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Detected(_))
    }

    /// Decoded payload, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Detected(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Error code, if any
    pub fn error(&self) -> Option<ErrorCode> {
        match self {
            Self::Detected(_) => None,
            Self::Failed(code) => Some(*code),
        }
    }
}

impl From<Result<String, ErrorCode>> for DetectionResult {
    fn from(result: Result<String, ErrorCode>) -> Self {
        match result {
            Ok(value) => Self::Detected(value),
            Err(code) => Self::Failed(code),
        }
    }
}

/// Wire form of [`DetectionResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResultDto {
    /// Whether a value was decoded
    pub success: bool,
    /// Present iff `success`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Present iff `!success`; an `ERR_*` identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DetectionResult> for DetectionResultDto {
    fn from(result: DetectionResult) -> Self {
        match result {
            DetectionResult::Detected(value) => Self {
                success: true,
                value: Some(value),
                error: None,
            },
            DetectionResult::Failed(code) => Self {
                success: false,
                value: None,
                error: Some(code.identifier().to_string()),
            },
        }
    }
}

impl From<&DetectionResult> for DetectionResultDto {
    fn from(result: &DetectionResult) -> Self {
        result.clone().into()
    }
}

impl TryFrom<DetectionResultDto> for DetectionResult {
    type Error = DomainError;

    fn try_from(dto: DetectionResultDto) -> Result<Self, Self::Error> {
        match (dto.success, dto.value, dto.error) {
            (true, Some(value), None) => Ok(Self::Detected(value)),
            (false, None, Some(error)) => Ok(Self::Failed(error.parse()?)),
            (success, value, error) => Err(DomainError::InvalidDetection(format!(
                "success={success}, value present={}, error present={}",
                value.is_some(),
                error.is_some()
            ))),
        }
    }
}
