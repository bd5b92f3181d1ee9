//! Session state machine and scan lifecycle events

use crate::{
    DomainError, DomainResult,
    value_objects::{ActivationId, DetectionResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one subsystem track of a scan session
///
/// The reader track only ever holds `Uninitialized` or `ReaderReady`; the
/// scanner track moves between `Uninitialized`, `ScannerReady` and `Scanning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No resources allocated yet
    #[default]
    Uninitialized,
    /// One-shot image decoding is available
    ReaderReady,
    /// Continuous scanning can be started
    ScannerReady,
    /// A continuous scan is active
    Scanning,
}

/// Inputs that drive [`SessionState`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCommand {
    /// Reader initialization completed
    InitReader,
    /// Scanner initialization completed
    InitScanner,
    /// Continuous scan started
    Start,
    /// Continuous scan stopped, by request or by a terminal condition
    Stop,
}

impl SessionState {
    /// Apply a command, returning the next state
    ///
    /// Re-initializing an initialized track is allowed and keeps its state.
    pub fn apply(self, command: SessionCommand) -> DomainResult<Self> {
        use SessionCommand::*;
        use SessionState::*;

        match (self, command) {
            (Uninitialized | ReaderReady, InitReader) => Ok(ReaderReady),
            (Uninitialized | ScannerReady, InitScanner) => Ok(ScannerReady),
            (Scanning, InitScanner) => Ok(Scanning),
            (ScannerReady, Start) => Ok(Scanning),
            (Scanning, Stop) => Ok(ScannerReady),
            (state, command) => Err(DomainError::invalid_transition(state, command)),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::ReaderReady => "reader_ready",
            SessionState::ScannerReady => "scanner_ready",
            SessionState::Scanning => "scanning",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionCommand::InitReader => "init_reader",
            SessionCommand::InitScanner => "init_scanner",
            SessionCommand::Start => "start",
            SessionCommand::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Both state tracks of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// One-shot reader track
    pub reader: SessionState,
    /// Continuous scanner track
    pub scanner: SessionState,
}

impl SessionSnapshot {
    /// Reader track has been initialized
    pub fn is_reader_ready(&self) -> bool {
        self.reader == SessionState::ReaderReady
    }

    /// Scanner track has been initialized (scanning or not)
    pub fn is_scanner_ready(&self) -> bool {
        matches!(
            self.scanner,
            SessionState::ScannerReady | SessionState::Scanning
        )
    }

    /// A continuous scan is active
    pub fn is_scanning(&self) -> bool {
        self.scanner == SessionState::Scanning
    }
}

/// Which scan mode an activation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// One-shot read of a chosen image
    Image,
    /// Continuous camera stream
    Stream,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Image => f.write_str("image"),
            ScanMode::Stream => f.write_str("stream"),
        }
    }
}

/// Listener slot an event is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `onStart`
    Start,
    /// `onStop`
    Stop,
    /// `onDetect`
    Detect,
}

/// Lifecycle and detection events emitted by a scan session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ScanEvent {
    /// An activation began
    Started {
        /// Activation that started
        activation_id: ActivationId,
        /// Image or stream
        mode: ScanMode,
        /// When it started
        timestamp: DateTime<Utc>,
    },

    /// A decode attempt completed
    Detected {
        /// Activation the attempt belongs to
        activation_id: ActivationId,
        /// Decoded value or error code
        result: DetectionResult,
        /// When the attempt completed
        timestamp: DateTime<Utc>,
    },

    /// An activation ended
    Stopped {
        /// Activation that ended
        activation_id: ActivationId,
        /// Image or stream
        mode: ScanMode,
        /// When it ended
        timestamp: DateTime<Utc>,
    },
}

impl ScanEvent {
    /// Start event stamped now
    pub fn started(activation_id: ActivationId, mode: ScanMode) -> Self {
        Self::Started {
            activation_id,
            mode,
            timestamp: Utc::now(),
        }
    }

    /// Detect event stamped now
    pub fn detected(activation_id: ActivationId, result: DetectionResult) -> Self {
        Self::Detected {
            activation_id,
            result,
            timestamp: Utc::now(),
        }
    }

    /// Stop event stamped now
    pub fn stopped(activation_id: ActivationId, mode: ScanMode) -> Self {
        Self::Stopped {
            activation_id,
            mode,
            timestamp: Utc::now(),
        }
    }

    /// Listener slot this event goes to
    pub fn kind(&self) -> EventKind {
        match self {
            ScanEvent::Started { .. } => EventKind::Start,
            ScanEvent::Detected { .. } => EventKind::Detect,
            ScanEvent::Stopped { .. } => EventKind::Stop,
        }
    }

    /// Activation the event belongs to
    pub fn activation_id(&self) -> ActivationId {
        match self {
            ScanEvent::Started { activation_id, .. }
            | ScanEvent::Detected { activation_id, .. }
            | ScanEvent::Stopped { activation_id, .. } => *activation_id,
        }
    }

    /// When the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ScanEvent::Started { timestamp, .. }
            | ScanEvent::Detected { timestamp, .. }
            | ScanEvent::Stopped { timestamp, .. } => *timestamp,
        }
    }

    /// Event type name matching the serde tag
    pub fn event_type(&self) -> &'static str {
        match self {
            ScanEvent::Started { .. } => "started",
            ScanEvent::Detected { .. } => "detected",
            ScanEvent::Stopped { .. } => "stopped",
        }
    }

    /// Detection result carried by a detect event
    pub fn detection(&self) -> Option<&DetectionResult> {
        match self {
            ScanEvent::Detected { result, .. } => Some(result),
            _ => None,
        }
    }
}
