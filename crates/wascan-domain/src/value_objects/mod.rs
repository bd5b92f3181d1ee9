//! Domain Value Objects
//!
//! Immutable objects defined only by their attributes.

mod detection;
mod error_code;
mod id;
mod symbology;

pub use detection::{DetectionResult, DetectionResultDto};
pub use error_code::ErrorCode;
pub use id::{ActivationId, ActivationMarker, Id, IdMarker, SessionId, SessionMarker};
pub use symbology::Symbology;
