//! Scan session configuration
//!
//! # Defaults
//!
//! - Decode at most once every 100 ms of stream time
//! - Report a stream detection after 3 consecutive identical reads
//! - Reject images smaller than 10 px on either side
//! - Stay silent on stream frames without a symbol
//! - Look for UPC-A only

use serde::{Deserialize, Serialize};
use wascan_domain::Symbology;

/// Minimum stream time between two decode attempts
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

/// Identical consecutive reads required before a stream detection is reported
pub const DEFAULT_REQUIRED_CONSECUTIVE_DETECTIONS: u32 = 3;

/// Images below this size on either side are not decoded
pub const DEFAULT_MIN_IMAGE_DIMENSION: u32 = 10;

/// Tunables for a scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    frame_interval_ms: u64,
    required_consecutive_detections: u32,
    min_image_dimension: u32,
    report_misses: bool,
    symbologies: Vec<Symbology>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            required_consecutive_detections: DEFAULT_REQUIRED_CONSECUTIVE_DETECTIONS,
            min_image_dimension: DEFAULT_MIN_IMAGE_DIMENSION,
            report_misses: false,
            symbologies: vec![Symbology::default()],
        }
    }
}

impl ScanConfig {
    /// Configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum stream time between decode attempts. Zero decodes every frame.
    pub fn set_frame_interval_ms(mut self, interval_ms: u64) -> Self {
        self.frame_interval_ms = interval_ms;
        self
    }

    /// Set how many identical consecutive reads confirm a stream detection.
    ///
    /// Values below 1 are ignored.
    pub fn set_required_consecutive_detections(mut self, count: u32) -> Self {
        if count > 0 {
            self.required_consecutive_detections = count;
        }
        self
    }

    /// Set the smallest image side that will be decoded.
    pub fn set_min_image_dimension(mut self, dimension: u32) -> Self {
        self.min_image_dimension = dimension;
        self
    }

    /// Report a `NotDetected` failure for every sampled stream frame without a symbol.
    pub fn set_report_misses(mut self, report: bool) -> Self {
        self.report_misses = report;
        self
    }

    /// Set the symbologies to look for. An empty list is ignored.
    pub fn set_symbologies(mut self, symbologies: Vec<Symbology>) -> Self {
        if !symbologies.is_empty() {
            self.symbologies = symbologies;
        }
        self
    }

    /// Minimum stream time between decode attempts
    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// Identical consecutive reads required per stream detection
    pub fn required_consecutive_detections(&self) -> u32 {
        self.required_consecutive_detections.max(1)
    }

    /// Smallest decodable image side
    pub fn min_image_dimension(&self) -> u32 {
        self.min_image_dimension
    }

    /// Whether stream misses are reported
    pub fn report_misses(&self) -> bool {
        self.report_misses
    }

    /// Symbologies to look for
    pub fn symbologies(&self) -> &[Symbology] {
        &self.symbologies
    }
}
