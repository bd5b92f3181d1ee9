//! Image source backed by files on disk

use futures::future::LocalBoxFuture;
use std::{cell::RefCell, collections::VecDeque, path::PathBuf};
use wascan_core::{ErrorCode, ImageFile, ImageSource};

/// Serves queued paths, one per `pick_image`.
///
/// An empty queue answers like a dismissed dialog.
#[derive(Debug, Default)]
pub struct QueuedFileSource {
    queue: RefCell<VecDeque<PathBuf>>,
}

impl QueuedFileSource {
    /// Source that serves `paths` in order
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: RefCell::new(paths.into_iter().collect()),
        }
    }

    /// Paths not yet picked
    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl ImageSource for QueuedFileSource {
    fn prepare(&self) -> Result<(), ErrorCode> {
        Ok(())
    }

    fn pick_image(&self) -> LocalBoxFuture<'_, Result<Option<ImageFile>, ErrorCode>> {
        let next = self.queue.borrow_mut().pop_front();
        Box::pin(async move {
            let Some(path) = next else {
                return Ok(None);
            };
            let bytes = tokio::fs::read(&path).await.map_err(|error| {
                tracing::warn!(path = %path.display(), %error, "cannot read file");
                ErrorCode::NoFileAccess
            })?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mime = guess_mime(&path);
            Ok(Some(ImageFile::new(name, mime, bytes)))
        })
    }
}

/// MIME type from the file extension, the way a browser labels uploads
pub fn guess_mime(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tif" | "tiff") => "image/tiff",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
