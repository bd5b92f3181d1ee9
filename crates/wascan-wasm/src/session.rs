//! Scan sessions exposed to JavaScript.
//!
//! # Example
//!
//! ```javascript
//! import { ScanSession } from 'wascan-wasm';
//!
//! const session = new ScanSession();
//! session.onStart(() => console.log('scanning'));
//! session.onDetect((result) => {
//!     if (result.success) {
//!         console.log('code', result.value);
//!         session.stopStreamScan();
//!     } else {
//!         console.warn('failed', result.error);
//!     }
//! });
//! session.onStop(() => console.log('stopped'));
//!
//! session.initScanner();
//! session.startStreamScan('video');
//! ```

use crate::{
    camera::WebCameraSource, options::ScanOptions, picker::WebImageSource, spawner::LocalSpawner,
    utils,
};
use js_sys::Function;
use serde::Serialize;
use std::rc::Rc;
use tsify::Tsify;
use wascan_core::{
    DetectionResult, HandlerError, HandlerResult, RxingDecoder, ScanConfig, ScanPorts,
    ScanSessionController,
};
use wasm_bindgen::prelude::*;

/// Detection delivered to `onDetect`.
///
/// Exactly one of `value` and `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct DetectionPayload {
    /// Whether a symbol was decoded
    pub success: bool,
    /// Decoded text
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub value: Option<String>,
    /// Catalog identifier, e.g. `ERR_NOT_DETECTED`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[tsify(optional)]
    pub error: Option<String>,
}

impl From<&DetectionResult> for DetectionPayload {
    fn from(result: &DetectionResult) -> Self {
        Self {
            success: result.is_success(),
            value: result.value().map(str::to_string),
            error: result.error().map(|code| code.identifier().to_string()),
        }
    }
}

impl DetectionPayload {
    /// Convert to a plain JavaScript object
    pub fn to_js(&self) -> Result<JsValue, serde_wasm_bindgen::Error> {
        serde_wasm_bindgen::to_value(self)
    }
}

/// Build a controller wired to the browser adapters
pub(crate) fn browser_controller(config: ScanConfig) -> ScanSessionController {
    let decoder = RxingDecoder::new(config.symbologies().to_vec());
    let ports = ScanPorts::new(
        Rc::new(WebImageSource::new()),
        Rc::new(WebCameraSource),
        Rc::new(decoder),
        Rc::new(LocalSpawner),
    );
    ScanSessionController::new(config, ports)
}

/// Invoke a JavaScript listener, turning a throw into a [`HandlerError`]
fn call_listener(callback: &Function, argument: &JsValue) -> HandlerResult {
    callback
        .call1(&JsValue::NULL, argument)
        .map(drop)
        .map_err(|error| HandlerError::new(utils::describe_js_error(&error)))
}

pub(crate) fn register_on_start(controller: &ScanSessionController, callback: Function) {
    controller.on_start(move || call_listener(&callback, &JsValue::NULL));
}

pub(crate) fn register_on_stop(controller: &ScanSessionController, callback: Function) {
    controller.on_stop(move || call_listener(&callback, &JsValue::NULL));
}

pub(crate) fn register_on_detect(controller: &ScanSessionController, callback: Function) {
    controller.on_detect(move |result| {
        let payload = DetectionPayload::from(result)
            .to_js()
            .map_err(|error| HandlerError::new(error.to_string()))?;
        call_listener(&callback, &payload)
    });
}

/// Independent scan session with its own listeners and state.
///
/// Operations return immediately; outcomes arrive through the listeners.
/// Errors thrown by the methods are catalog identifier strings.
#[wasm_bindgen]
pub struct ScanSession {
    controller: ScanSessionController,
}

#[wasm_bindgen]
impl ScanSession {
    /// Create a session, optionally with custom options.
    ///
    /// # Example
    ///
    /// ```javascript
    /// const session = new ScanSession(new ScanOptions().setReportMisses(true));
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<ScanOptions>) -> Self {
        let config = options.map(ScanOptions::into_config).unwrap_or_default();
        Self {
            controller: browser_controller(config),
        }
    }

    /// Prepare the hidden file input used by `readFromImage`.
    ///
    /// # Errors
    ///
    /// Throws `ERR_NO_WINDOW`, `ERR_NO_DOCUMENT` or `ERR_NO_FILE_ACCESS`.
    #[wasm_bindgen(js_name = initReader)]
    pub fn init_reader(&self) -> Result<(), JsValue> {
        self.controller
            .init_reader()
            .map_err(utils::scan_error_to_js)
    }

    /// Check that camera access is available.
    ///
    /// # Errors
    ///
    /// Throws `ERR_NO_WINDOW`, `ERR_NO_DOCUMENT` or `ERR_NO_MEDIA`.
    #[wasm_bindgen(js_name = initScanner)]
    pub fn init_scanner(&self) -> Result<(), JsValue> {
        self.controller
            .init_scanner()
            .map_err(utils::scan_error_to_js)
    }

    /// Open the file dialog and decode the chosen image.
    ///
    /// Emits start, one detect and stop. Calling again while the dialog is
    /// pending abandons that read with `ERR_NO_FILE_SELECTED`.
    ///
    /// # Errors
    ///
    /// Throws `ERR_NOT_INITIALIZED` before `initReader`.
    #[wasm_bindgen(js_name = readFromImage)]
    pub fn read_from_image(&self) -> Result<(), JsValue> {
        self.controller
            .read_from_image()
            .map_err(utils::scan_error_to_js)
    }

    /// Attach the camera to the `<video>` with id `videoElementId` and scan.
    ///
    /// A missing element or denied permission arrives as a failed detection
    /// followed by stop. Does nothing while already scanning.
    ///
    /// # Errors
    ///
    /// Throws `ERR_NOT_INITIALIZED` before `initScanner`.
    #[wasm_bindgen(js_name = startStreamScan)]
    pub fn start_stream_scan(&self, video_element_id: &str) -> Result<(), JsValue> {
        self.controller
            .start_stream_scan(video_element_id)
            .map_err(utils::scan_error_to_js)
    }

    /// Stop scanning and release the camera. No detection follows.
    #[wasm_bindgen(js_name = stopStreamScan)]
    pub fn stop_stream_scan(&self) {
        self.controller.stop_stream_scan();
    }

    /// Register the start listener, replacing the previous one.
    #[wasm_bindgen(js_name = onStart)]
    pub fn on_start(&self, callback: Function) {
        register_on_start(&self.controller, callback);
    }

    /// Register the stop listener, replacing the previous one.
    #[wasm_bindgen(js_name = onStop)]
    pub fn on_stop(&self, callback: Function) {
        register_on_stop(&self.controller, callback);
    }

    /// Register the detect listener, replacing the previous one.
    ///
    /// The callback receives `{ success, value?, error? }`.
    #[wasm_bindgen(js_name = onDetect)]
    pub fn on_detect(&self, callback: Function) {
        register_on_detect(&self.controller, callback);
    }

    /// Whether a stream scan is running.
    #[wasm_bindgen(getter, js_name = isScanning)]
    pub fn is_scanning(&self) -> bool {
        self.controller.is_scanning()
    }

    /// Whether an image read is pending.
    #[wasm_bindgen(getter, js_name = isReading)]
    pub fn is_reading(&self) -> bool {
        self.controller.is_reading()
    }
}
