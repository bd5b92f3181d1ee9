//! Ports - what the controller needs from its host
//!
//! The controller runs on a single-threaded cooperative loop, so every port
//! returns non-`Send` futures ([`LocalBoxFuture`]) and is shared through `Rc`.
//! Browser adapters live in `wascan-wasm`; tests supply fakes.

use futures::future::LocalBoxFuture;
use wascan_domain::{ErrorCode, LumaFrame};

/// Image chosen by the user for a one-shot read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Wrap a chosen file
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// File name as reported by the host
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type as reported by the host
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type is `image/*`
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Presents a file-selection dialog
pub trait ImageSource {
    /// Allocate whatever the dialog needs. Called by `init_reader`.
    fn prepare(&self) -> Result<(), ErrorCode>;

    /// Ask the user for one image. `Ok(None)` means nothing was chosen.
    fn pick_image(&self) -> LocalBoxFuture<'_, Result<Option<ImageFile>, ErrorCode>>;
}

/// Binds a live camera feed to a named display surface
pub trait CameraSource {
    /// Check the media capability is present. Called by `init_scanner`.
    fn prepare(&self) -> Result<(), ErrorCode>;

    /// Attach the camera to `target` and start producing frames
    fn open<'a>(
        &'a self,
        target: &'a str,
    ) -> LocalBoxFuture<'a, Result<Box<dyn FrameStream>, ErrorCode>>;
}

/// Live sequence of frames from an opened camera
pub trait FrameStream {
    /// Next sampled frame, paced by the host refresh rate.
    ///
    /// `None` means the stream ended; `Some(Err(_))` is a device failure.
    /// Both terminate the activation.
    fn next_frame(&mut self) -> LocalBoxFuture<'_, Option<Result<LumaFrame, ErrorCode>>>;

    /// Release the camera and detach from the surface. Must be idempotent.
    fn close(&mut self);
}

/// Turns a luma frame into decoded text
pub trait SymbolDecoder {
    /// Decode the first symbol found, or `ErrorCode::NotDetected`
    fn decode(&self, frame: &LumaFrame) -> Result<String, ErrorCode>;
}

/// Runs background tasks on the host event loop
pub trait TaskSpawner {
    /// Spawn a task that runs to completion on the current thread
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Host without file or camera access
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl ImageSource for Unavailable {
    fn prepare(&self) -> Result<(), ErrorCode> {
        Err(ErrorCode::NoFileAccess)
    }

    fn pick_image(&self) -> LocalBoxFuture<'_, Result<Option<ImageFile>, ErrorCode>> {
        Box::pin(async { Err(ErrorCode::NoFileAccess) })
    }
}

impl CameraSource for Unavailable {
    fn prepare(&self) -> Result<(), ErrorCode> {
        Err(ErrorCode::NoMedia)
    }

    fn open<'a>(
        &'a self,
        _target: &'a str,
    ) -> LocalBoxFuture<'a, Result<Box<dyn FrameStream>, ErrorCode>> {
        Box::pin(async { Err(ErrorCode::NoMedia) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_mime() {
        assert!(ImageFile::new("a.png", "image/png", vec![]).is_image());
        assert!(!ImageFile::new("a.txt", "text/plain", vec![]).is_image());
        assert!(!ImageFile::new("blob", "", vec![]).is_image());
    }

    #[test]
    fn test_unavailable_prepare_fails() {
        assert_eq!(ImageSource::prepare(&Unavailable), Err(ErrorCode::NoFileAccess));
        assert_eq!(CameraSource::prepare(&Unavailable), Err(ErrorCode::NoMedia));
    }
}
