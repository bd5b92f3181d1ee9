//! Grayscale frame handed to symbol decoders

use crate::{DomainError, DomainResult};

/// 8-bit luma image, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    captured_at_ms: u64,
}

impl LumaFrame {
    /// Create a frame from luma bytes
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFrame` if `pixels.len() != width * height`.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        captured_at_ms: u64,
    ) -> DomainResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DomainError::invalid_frame(format!(
                "{width}x{height} needs {expected} pixels, got {}",
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
            captured_at_ms,
        })
    }

    /// Convert RGBA canvas data to luma with BT.601 weights
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFrame` if `rgba` is not `width * height * 4` bytes.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        captured_at_ms: u64,
    ) -> DomainResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(DomainError::invalid_frame(format!(
                "{width}x{height} RGBA needs {expected} bytes, got {}",
                rgba.len()
            )));
        }

        let pixels = rgba
            .chunks_exact(4)
            .map(|px| {
                let y = 299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2]);
                (y / 1000) as u8
            })
            .collect();

        Self::new(width, height, pixels, captured_at_ms)
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the frame, returning its luma bytes
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Host timestamp of the capture in milliseconds
    pub fn captured_at_ms(&self) -> u64 {
        self.captured_at_ms
    }

    /// True if either side is shorter than `min`
    pub fn is_smaller_than(&self, min: u32) -> bool {
        self.width < min || self.height < min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(LumaFrame::new(2, 2, vec![0; 4], 0).is_ok());
        assert!(matches!(
            LumaFrame::new(2, 2, vec![0; 3], 0),
            Err(DomainError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_from_rgba_weights() {
        let rgba = [255, 255, 255, 255, 0, 0, 0, 255, 255, 0, 0, 255];
        let frame = LumaFrame::from_rgba(3, 1, &rgba, 42).unwrap();

        assert_eq!(frame.pixels()[0], 255);
        assert_eq!(frame.pixels()[1], 0);
        assert_eq!(frame.pixels()[2], 76); // 0.299 * 255
        assert_eq!(frame.captured_at_ms(), 42);
    }

    #[test]
    fn test_from_rgba_rejects_short_buffer() {
        assert!(LumaFrame::from_rgba(2, 2, &[0; 15], 0).is_err());
    }

    #[test]
    fn test_is_smaller_than() {
        let frame = LumaFrame::new(20, 5, vec![0; 100], 0).unwrap();
        assert!(frame.is_smaller_than(10));
        assert!(!frame.is_smaller_than(5));
    }
}
