//! Error types for scan session operations

use wascan_domain::{DomainError, ErrorCode};

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Subsystem an initialization belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// One-shot image reader
    Reader,
    /// Continuous stream scanner
    Scanner,
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subsystem::Reader => f.write_str("reader"),
            Subsystem::Scanner => f.write_str("scanner"),
        }
    }
}

/// Failures returned directly from controller calls
///
/// Acquisition and decode failures never appear here; they are delivered as
/// failed detections through the detect listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Operation called before its initialization step
    #[error("{subsystem} is not initialized")]
    NotInitialized {
        /// Subsystem that must be initialized first
        subsystem: Subsystem,
    },

    /// Platform capability missing during initialization
    #[error("{subsystem} initialization failed: {code}")]
    InitFailed {
        /// Subsystem being initialized
        subsystem: Subsystem,
        /// Catalog code describing the missing capability
        code: ErrorCode,
    },

    /// Domain invariant rejected the operation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ScanError {
    /// Create a not-initialized error
    pub fn not_initialized(subsystem: Subsystem) -> Self {
        Self::NotInitialized { subsystem }
    }

    /// Create an initialization failure
    pub fn init_failed(subsystem: Subsystem, code: ErrorCode) -> Self {
        Self::InitFailed { subsystem, code }
    }

    /// Catalog code for this error, as surfaced to JavaScript
    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::NotInitialized { .. } => ErrorCode::NotInitialized,
            ScanError::InitFailed { code, .. } => *code,
            ScanError::Domain(_) => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            ScanError::not_initialized(Subsystem::Scanner).code(),
            ErrorCode::NotInitialized
        );
        assert_eq!(
            ScanError::init_failed(Subsystem::Reader, ErrorCode::DocumentNotFound).code(),
            ErrorCode::DocumentNotFound
        );
        assert_eq!(
            ScanError::from(DomainError::invalid_frame("x")).code(),
            ErrorCode::Internal
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ScanError::not_initialized(Subsystem::Reader).to_string(),
            "reader is not initialized"
        );
        assert_eq!(
            ScanError::init_failed(Subsystem::Scanner, ErrorCode::NoMedia).to_string(),
            "scanner initialization failed: ERR_NO_MEDIA"
        );
    }
}
