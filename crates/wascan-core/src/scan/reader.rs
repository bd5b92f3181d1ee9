//! One-shot image decode pipeline

use crate::{
    config::ScanConfig,
    ports::{ImageFile, SymbolDecoder},
};
use wascan_domain::{ErrorCode, LumaFrame};

/// Decode the symbol in a chosen image file
///
/// Checks run in order: MIME type, image format, minimum size, then the
/// decoder itself. Each stage maps to one catalog code.
pub fn decode_image(
    file: &ImageFile,
    decoder: &dyn SymbolDecoder,
    config: &ScanConfig,
) -> Result<String, ErrorCode> {
    if !file.is_image() {
        tracing::debug!(name = file.name(), mime = file.mime(), "rejecting non-image file");
        return Err(ErrorCode::InvalidMime);
    }

    let frame = load_luma(file.bytes())?;
    if frame.is_smaller_than(config.min_image_dimension()) {
        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            "image below minimum dimension"
        );
        return Err(ErrorCode::NotDetected);
    }

    decoder.decode(&frame)
}

/// Decode raw image bytes into a luma frame
pub fn load_luma(bytes: &[u8]) -> Result<LumaFrame, ErrorCode> {
    let image = image::load_from_memory(bytes).map_err(|error| {
        tracing::debug!(%error, "image could not be decoded");
        ErrorCode::UnsupportedFormat
    })?;

    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    LumaFrame::new(width, height, gray.into_raw(), 0).map_err(|error| {
        tracing::error!(%error, "decoded image has inconsistent dimensions");
        ErrorCode::Internal
    })
}
