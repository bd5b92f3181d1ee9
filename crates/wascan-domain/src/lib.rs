//! wascan Domain Layer - Pure Scan Session Model
//!
//! This crate holds the runtime-independent vocabulary of the scanner:
//! session states and their transitions, the events a scan session emits,
//! detection results with their JavaScript wire shape, and the fixed catalog
//! of error codes.
//!
//! It has no knowledge of browsers, cameras or decoders and compiles for both
//! native and `wasm32` targets.
//!
//! ## Architecture
//!
//! - **Value Objects**: identifiers, error codes, detection results, symbologies
//! - **Entities**: luma frames handed to symbol decoders
//! - **Events**: session state machine and scan lifecycle events

#![warn(missing_docs)]

pub mod entities;
pub mod events;
pub mod value_objects;

pub use entities::LumaFrame;
pub use events::{EventKind, ScanEvent, ScanMode, SessionCommand, SessionSnapshot, SessionState};
pub use value_objects::{
    ActivationId, DetectionResult, DetectionResultDto, ErrorCode, SessionId, Symbology,
};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Invalid state transition attempted
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Frame dimensions do not match its pixel buffer
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Detection result with both or neither of value/error populated
    #[error("Invalid detection result: {0}")]
    InvalidDetection(String),

    /// Unknown error code identifier
    #[error("Unknown error code: {0}")]
    UnknownErrorCode(String),

    /// Unknown symbology name
    #[error("Unknown symbology: {0}")]
    UnknownSymbology(String),
}

impl DomainError {
    /// Create an invalid state transition error
    pub fn invalid_transition(
        from: impl std::fmt::Display,
        command: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidStateTransition(format!("{from} -/-> {command}"))
    }

    /// Create an invalid frame error
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame(message.into())
    }
}
