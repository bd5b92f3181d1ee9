//! # wascan Core
//!
//! Scan session controller for the wascan barcode reader. It owns the
//! lifecycle state machine, the listener registry and the background decode
//! loops, and talks to its host only through the traits in [`ports`].
//!
//! Everything here runs on one thread. Browser builds drive the controller
//! from the JavaScript event loop; native builds from a Tokio `LocalSet`.

#![warn(rust_2018_idioms)]

pub mod config;
#[cfg(feature = "rxing")]
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod ports;
#[cfg(not(target_arch = "wasm32"))]
pub mod runtime;
pub mod scan;

pub use config::ScanConfig;
#[cfg(feature = "rxing")]
pub use decoder::RxingDecoder;
pub use dispatch::{HandlerError, HandlerResult, ListenerRegistry};
pub use error::{Result, ScanError, Subsystem};
pub use ports::{
    CameraSource, FrameStream, ImageFile, ImageSource, SymbolDecoder, TaskSpawner, Unavailable,
};
#[cfg(not(target_arch = "wasm32"))]
pub use runtime::TokioLocalSpawner;
pub use scan::{ScanPorts, ScanSessionController};

// Re-export the domain model so hosts depend on one crate
pub use wascan_domain::{
    ActivationId, DetectionResult, DetectionResultDto, ErrorCode, EventKind, LumaFrame, ScanEvent,
    ScanMode, SessionId, SessionSnapshot, SessionState, Symbology,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
