//! Native tests for the option builder and detection payloads
//!
//! Anything touching `JsValue` runs under wasm-bindgen-test in `web.rs`.

use wascan_core::{DetectionResult, ErrorCode, ScanConfig, Symbology};
use wascan_wasm::{DetectionPayload, ScanOptions};

#[test]
fn test_scan_options_default() {
    let options = ScanOptions::default();
    assert_eq!(options.frame_interval_ms(), 100.0);
    assert_eq!(options.required_consecutive_detections(), 3);
    assert_eq!(options.min_image_dimension(), 10);
    assert!(!options.report_misses());
    assert_eq!(options.symbologies(), vec!["upc_a"]);
}

#[test]
fn test_scan_options_into_config() {
    let config = ScanOptions::new()
        .set_frame_interval_ms(250)
        .set_report_misses(true)
        .into_config();

    assert_eq!(config.frame_interval_ms(), 250);
    assert!(config.report_misses());
}

#[test]
fn test_scan_options_from_config() {
    let config = ScanConfig::default().set_symbologies(vec![Symbology::Code128]);
    let options = ScanOptions::from(config.clone());
    assert_eq!(options.config(), &config);
    assert_eq!(options.symbologies(), vec!["code_128"]);
}

#[test]
fn test_scan_options_symbologies_keep_order() {
    let options = ScanOptions::new()
        .with_symbologies(&["code_128".to_string(), "upc_a".to_string()])
        .unwrap();
    assert_eq!(
        options.config().symbologies(),
        &[Symbology::Code128, Symbology::UpcA]
    );
}

#[test]
fn test_scan_options_bad_symbology_keeps_nothing() {
    let error = ScanOptions::new()
        .with_symbologies(&["upc_a".to_string(), "aztec".to_string()])
        .unwrap_err();
    assert_eq!(error, ErrorCode::Internal);
}

#[test]
fn test_payload_shape() {
    let ok = DetectionPayload::from(&DetectionResult::detected("4006381333931"));
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "success": true, "value": "4006381333931" })
    );

    let failed = DetectionPayload::from(&DetectionResult::failed(ErrorCode::NotDetected));
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "error": "ERR_NOT_DETECTED" })
    );
}
