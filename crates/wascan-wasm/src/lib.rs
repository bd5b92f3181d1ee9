//! wascan WebAssembly Bindings
//!
//! Barcode scanning in the browser, from a user-chosen image or from a live
//! camera stream attached to a `<video>` element.
//!
//! # Overview
//!
//! Every operation returns immediately. Outcomes arrive through three
//! listeners: `on_start`, `on_detect` and `on_stop`. A detection carries either
//! the decoded text or a catalog identifier such as `ERR_NOT_DETECTED`; the
//! full catalog is available from [`error_codes`].
//!
//! The free functions drive one default session per page. Create a
//! [`ScanSession`] for independent sessions with their own options.
//!
//! # Example
//!
//! ```javascript
//! import init, { init_reader, on_detect, read_from_image } from 'wascan-wasm';
//!
//! await init();
//! init_reader();
//! on_detect((result) => console.log(result));
//! document.querySelector('#pick').addEventListener('click', () => read_from_image());
//! ```

use std::rc::Rc;

use js_sys::Function;
use wascan_core::{ErrorCode, ScanConfig, ScanSessionController};
use wasm_bindgen::prelude::*;

mod camera;
mod options;
mod picker;
mod session;
mod spawner;
mod utils;

pub use camera::{WebCameraSource, WebFrameStream};
pub use options::ScanOptions;
pub use picker::{FILE_INPUT_ID, WebImageSource};
pub use session::{DetectionPayload, ScanSession};
pub use spawner::LocalSpawner;

thread_local! {
    static DEFAULT_SESSION: Rc<ScanSessionController> =
        Rc::new(session::browser_controller(ScanConfig::default()));
}

fn default_session() -> Rc<ScanSessionController> {
    DEFAULT_SESSION.with(Rc::clone)
}

/// Initialize WASM module.
///
/// Installs the panic hook and routes logs to the browser console. Called
/// automatically when the module is loaded.
#[wasm_bindgen(start)]
pub fn main_js() {
    utils::set_panic_hook();
    utils::init_logging();
    tracing::debug!(version = wascan_core::VERSION, "wascan loaded");
}

/// Get the version of the wascan WASM bindings.
///
/// # Example
///
/// ```javascript
/// import { version } from 'wascan-wasm';
/// console.log(`wascan ${version()}`);
/// ```
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Prepare image reading for the default session.
///
/// # Errors
///
/// Throws `ERR_NO_WINDOW`, `ERR_NO_DOCUMENT` or `ERR_NO_FILE_ACCESS`.
#[wasm_bindgen]
pub fn init_reader() -> Result<(), JsValue> {
    default_session()
        .init_reader()
        .map_err(utils::scan_error_to_js)
}

/// Prepare camera scanning for the default session.
///
/// # Errors
///
/// Throws `ERR_NO_WINDOW`, `ERR_NO_DOCUMENT` or `ERR_NO_MEDIA`.
#[wasm_bindgen]
pub fn init_scanner() -> Result<(), JsValue> {
    default_session()
        .init_scanner()
        .map_err(utils::scan_error_to_js)
}

/// Open the file dialog and decode the chosen image.
///
/// # Errors
///
/// Throws `ERR_NOT_INITIALIZED` before [`init_reader`].
#[wasm_bindgen]
pub fn read_from_image() -> Result<(), JsValue> {
    default_session()
        .read_from_image()
        .map_err(utils::scan_error_to_js)
}

/// Scan the camera feed shown in the `<video>` with id `video_element_id`.
///
/// # Errors
///
/// Throws `ERR_NOT_INITIALIZED` before [`init_scanner`].
#[wasm_bindgen]
pub fn start_stream_scan(video_element_id: &str) -> Result<(), JsValue> {
    default_session()
        .start_stream_scan(video_element_id)
        .map_err(utils::scan_error_to_js)
}

/// Stop the default session's stream scan and release the camera.
#[wasm_bindgen]
pub fn stop_stream_scan() {
    default_session().stop_stream_scan();
}

/// Register the default session's start listener.
#[wasm_bindgen]
pub fn on_start(callback: Function) {
    session::register_on_start(&default_session(), callback);
}

/// Register the default session's stop listener.
#[wasm_bindgen]
pub fn on_stop(callback: Function) {
    session::register_on_stop(&default_session(), callback);
}

/// Register the default session's detect listener.
#[wasm_bindgen]
pub fn on_detect(callback: Function) {
    session::register_on_detect(&default_session(), callback);
}

/// Error catalog as `{ VariantName: "ERR_IDENTIFIER" }`.
///
/// # Example
///
/// ```javascript
/// import { error_codes } from 'wascan-wasm';
/// if (result.error === error_codes().NoPermission) { askAgain(); }
/// ```
#[wasm_bindgen]
pub fn error_codes() -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    serde::Serialize::serialize(&ErrorCode::catalog(), &serializer)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
