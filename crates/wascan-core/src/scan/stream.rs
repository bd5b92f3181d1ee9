//! Per-activation stream sampling and coalescing

use crate::config::ScanConfig;
use wascan_domain::{DetectionResult, ErrorCode};

/// Decides which frames get decoded and which outcomes get reported
///
/// Sampling is driven by frame timestamps: at most one decode per
/// `frame_interval_ms`. A successful read is reported once it has been seen
/// `required_consecutive_detections` times in a row; the count then restarts.
/// A different value restarts the count at one. Misses leave it untouched.
#[derive(Debug, Clone)]
pub struct StreamPolicy {
    interval_ms: u64,
    required: u32,
    report_misses: bool,
    last_sample_ms: Option<u64>,
    candidate: Option<String>,
    streak: u32,
}

impl StreamPolicy {
    /// Fresh policy for one activation
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            interval_ms: config.frame_interval_ms(),
            required: config.required_consecutive_detections(),
            report_misses: config.report_misses(),
            last_sample_ms: None,
            candidate: None,
            streak: 0,
        }
    }

    /// Whether a frame captured at `captured_at_ms` should be decoded
    pub fn should_sample(&mut self, captured_at_ms: u64) -> bool {
        let due = match self.last_sample_ms {
            None => true,
            // Clock went backwards, resync
            Some(last) if captured_at_ms < last => true,
            Some(last) => captured_at_ms - last >= self.interval_ms,
        };
        if due {
            self.last_sample_ms = Some(captured_at_ms);
        }
        due
    }

    /// Feed one decode outcome, returning the detection to report, if any
    pub fn observe(&mut self, outcome: Result<String, ErrorCode>) -> Option<DetectionResult> {
        match outcome {
            Ok(value) => {
                if self.candidate.as_deref() == Some(value.as_str()) {
                    self.streak += 1;
                } else {
                    self.candidate = Some(value.clone());
                    self.streak = 1;
                }

                if self.streak >= self.required {
                    self.streak = 0;
                    Some(DetectionResult::detected(value))
                } else {
                    None
                }
            }
            Err(ErrorCode::NotDetected) if !self.report_misses => None,
            Err(code) => Some(DetectionResult::failed(code)),
        }
    }
}
