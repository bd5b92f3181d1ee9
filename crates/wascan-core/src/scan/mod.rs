//! Scan session orchestration

pub mod controller;
pub mod reader;
pub mod stream;

pub use controller::{ScanPorts, ScanSessionController};
pub use reader::{decode_image, load_luma};
pub use stream::StreamPolicy;
