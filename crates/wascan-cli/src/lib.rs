//! # wascan CLI
//!
//! Runs the scan session controller against image files on disk. Each file
//! goes through the same read path a browser upload does: MIME check, image
//! decode, size check, then symbol decode.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod read;
pub mod source;

pub use error::{CliError, CliResult};
pub use read::{FileReport, load_config, read_files};
pub use source::{QueuedFileSource, guess_mime};
