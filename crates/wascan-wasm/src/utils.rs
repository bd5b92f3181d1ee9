//! Utility functions for the browser environment.
//!
//! Panic hook and logging setup, plus the conversions between catalog codes
//! and JavaScript values shared by the adapters and bindings.

use wascan_core::{ErrorCode, ScanError};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, Window};

/// Set panic hook for better error messages in browser.
///
/// Called automatically during module initialization.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `tracing` output to the browser console.
///
/// Debug builds log at `DEBUG`, release builds at `INFO`.
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(level)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

/// Global `window`, or `ERR_NO_WINDOW`
pub fn window() -> Result<Window, ErrorCode> {
    web_sys::window().ok_or(ErrorCode::WindowNotFound)
}

/// Global `document`, or the first missing piece
pub fn document() -> Result<Document, ErrorCode> {
    window()?.document().ok_or(ErrorCode::DocumentNotFound)
}

/// Catalog identifier as a thrown JavaScript value
pub fn code_to_js(code: ErrorCode) -> JsValue {
    JsValue::from_str(code.identifier())
}

/// Controller error as a thrown JavaScript value
pub fn scan_error_to_js(error: ScanError) -> JsValue {
    tracing::debug!(%error, "operation rejected");
    code_to_js(error.code())
}

/// Best-effort text for a JavaScript exception
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}
