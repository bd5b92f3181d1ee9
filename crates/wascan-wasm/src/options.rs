//! Scan options exposed to JavaScript.
//!
//! # Defaults
//!
//! - Decode at most once every 100 ms of stream time
//! - Report a stream detection after 3 identical reads in a row
//! - Images smaller than 10 px on either side are not decoded
//! - Frames without a symbol are not reported
//! - UPC-A only
//!
//! # Example
//!
//! ```javascript
//! import { ScanOptions, ScanSession } from 'wascan-wasm';
//!
//! const options = new ScanOptions()
//!     .setRequiredConsecutiveDetections(2)
//!     .setSymbologies(['upc_a', 'ean_13']);
//! const session = new ScanSession(options);
//! ```

use crate::utils;
use wascan_core::{ErrorCode, ScanConfig, Symbology};
use wasm_bindgen::prelude::*;

/// Scan session options.
///
/// All setters consume and return the options so calls can be chained.
/// Invalid values are ignored and the previous value is kept.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    config: ScanConfig,
}

#[wasm_bindgen]
impl ScanOptions {
    /// Create options with default values.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum stream time between two decode attempts.
    ///
    /// # Arguments
    ///
    /// * `interval_ms` - Milliseconds; `0` decodes every animation frame
    #[wasm_bindgen(js_name = setFrameIntervalMs)]
    pub fn set_frame_interval_ms(mut self, interval_ms: u32) -> Self {
        self.config = self.config.set_frame_interval_ms(u64::from(interval_ms));
        self
    }

    /// Set how many identical reads in a row confirm a stream detection.
    ///
    /// # Arguments
    ///
    /// * `count` - Required reads (must be > 0)
    #[wasm_bindgen(js_name = setRequiredConsecutiveDetections)]
    pub fn set_required_consecutive_detections(mut self, count: u32) -> Self {
        self.config = self.config.set_required_consecutive_detections(count);
        self
    }

    /// Set the smallest image side, in pixels, that is passed to the decoder.
    #[wasm_bindgen(js_name = setMinImageDimension)]
    pub fn set_min_image_dimension(mut self, dimension: u32) -> Self {
        self.config = self.config.set_min_image_dimension(dimension);
        self
    }

    /// Report `ERR_NOT_DETECTED` for every sampled stream frame without a symbol.
    #[wasm_bindgen(js_name = setReportMisses)]
    pub fn set_report_misses(mut self, report: bool) -> Self {
        self.config = self.config.set_report_misses(report);
        self
    }

    /// Set the symbologies to look for, tried in order.
    ///
    /// # Arguments
    ///
    /// * `names` - Any of `upc_a`, `ean_13`, `code_128`
    ///
    /// # Errors
    ///
    /// Throws `ERR_INTERNAL` if a name is not recognized.
    #[wasm_bindgen(js_name = setSymbologies)]
    pub fn set_symbologies(self, names: Vec<String>) -> Result<ScanOptions, JsValue> {
        self.with_symbologies(&names).map_err(utils::code_to_js)
    }

    /// Minimum stream time between decode attempts, in milliseconds.
    #[wasm_bindgen(getter, js_name = frameIntervalMs)]
    pub fn frame_interval_ms(&self) -> f64 {
        self.config.frame_interval_ms() as f64
    }

    /// Identical reads required per stream detection.
    #[wasm_bindgen(getter, js_name = requiredConsecutiveDetections)]
    pub fn required_consecutive_detections(&self) -> u32 {
        self.config.required_consecutive_detections()
    }

    /// Smallest decoded image side.
    #[wasm_bindgen(getter, js_name = minImageDimension)]
    pub fn min_image_dimension(&self) -> u32 {
        self.config.min_image_dimension()
    }

    /// Whether stream misses are reported.
    #[wasm_bindgen(getter, js_name = reportMisses)]
    pub fn report_misses(&self) -> bool {
        self.config.report_misses()
    }

    /// Symbology names, in the order they are tried.
    #[wasm_bindgen(getter)]
    pub fn symbologies(&self) -> Vec<String> {
        self.config
            .symbologies()
            .iter()
            .map(|symbology| symbology.as_str().to_string())
            .collect()
    }
}

impl ScanOptions {
    /// Parse and apply symbology names
    pub fn with_symbologies(mut self, names: &[String]) -> Result<Self, ErrorCode> {
        let symbologies = names
            .iter()
            .map(|name| name.parse::<Symbology>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| {
                tracing::warn!(%error, "rejecting symbology list");
                ErrorCode::Internal
            })?;
        self.config = self.config.set_symbologies(symbologies);
        Ok(self)
    }

    /// Underlying configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Consume into the underlying configuration
    pub fn into_config(self) -> ScanConfig {
        self.config
    }
}

impl From<ScanConfig> for ScanOptions {
    fn from(config: ScanConfig) -> Self {
        Self { config }
    }
}
