//! One-shot image read tests
//!
//! Every read emits exactly one start, one detect and one stop, whatever
//! happens between the dialog and the decoder.

mod common;

use common::{
    ChannelCamera, FakeImageSource, FixedDecoder, Harness, Record, png_bytes, run_local, settle,
};
use std::rc::Rc;
use wascan_core::{DetectionResult, ErrorCode, ImageFile, ScanConfig};

fn reader_with(decoder: FixedDecoder) -> Harness {
    let harness = Harness::with_parts(
        ScanConfig::new(),
        FakeImageSource::new(),
        ChannelCamera::new("video"),
        Rc::new(decoder),
    );
    harness.controller.init_reader().unwrap();
    harness
}

fn bracketed(result: DetectionResult) -> Vec<Record> {
    vec![Record::Start, Record::Detect(result), Record::Stop]
}

#[tokio::test]
async fn test_no_file_selected() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("unused".into())));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.records(),
            bracketed(DetectionResult::failed(ErrorCode::NoFileSelected))
        );
        assert!(!harness.controller.is_reading());
    })
    .await;
}

#[tokio::test]
async fn test_dialog_failure_is_reported() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("unused".into())));
        harness.images.answer(Err(ErrorCode::NoFileAccess));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.records(),
            bracketed(DetectionResult::failed(ErrorCode::NoFileAccess))
        );
    })
    .await;
}

#[tokio::test]
async fn test_non_image_file_is_rejected() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("unused".into())));
        harness.images.answer(Ok(Some(ImageFile::new(
            "notes.txt",
            "text/plain",
            b"hello".to_vec(),
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.detections(),
            vec![DetectionResult::failed(ErrorCode::InvalidMime)]
        );
    })
    .await;
}

#[tokio::test]
async fn test_undecodable_image_is_rejected() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("unused".into())));
        harness.images.answer(Ok(Some(ImageFile::new(
            "photo.heic",
            "image/heic",
            vec![0, 1, 2, 3],
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.detections(),
            vec![DetectionResult::failed(ErrorCode::UnsupportedFormat)]
        );
    })
    .await;
}

#[tokio::test]
async fn test_tiny_image_is_not_detected() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("unused".into())));
        harness.images.answer(Ok(Some(ImageFile::new(
            "tiny.png",
            "image/png",
            png_bytes(9, 9),
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.detections(),
            vec![DetectionResult::failed(ErrorCode::NotDetected)]
        );
    })
    .await;
}

#[tokio::test]
async fn test_decoded_value_is_reported() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("036000291452".into())));
        harness.images.answer(Ok(Some(ImageFile::new(
            "code.png",
            "image/png",
            png_bytes(40, 20),
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.records(),
            bracketed(DetectionResult::detected("036000291452"))
        );
    })
    .await;
}

#[tokio::test]
async fn test_decoder_miss_is_reported() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Err(ErrorCode::NotDetected)));
        harness.images.answer(Ok(Some(ImageFile::new(
            "blank.png",
            "image/png",
            png_bytes(40, 40),
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.detections(),
            vec![DetectionResult::failed(ErrorCode::NotDetected)]
        );
    })
    .await;
}

#[tokio::test]
async fn test_second_read_supersedes_pending_read() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("42".into())));
        let release = harness.images.hold();
        harness.images.answer(Ok(Some(ImageFile::new(
            "code.png",
            "image/png",
            png_bytes(20, 20),
        ))));

        harness.controller.read_from_image().unwrap();
        settle().await;
        assert!(harness.controller.is_reading());
        assert_eq!(harness.recorder.records(), vec![Record::Start]);

        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(harness.images.picks(), 2);
        assert!(release.is_canceled());
        assert!(!harness.controller.is_reading());

        let mut expected = bracketed(DetectionResult::failed(ErrorCode::NoFileSelected));
        expected.extend(bracketed(DetectionResult::detected("42")));
        assert_eq!(harness.recorder.records(), expected);
    })
    .await;
}

#[tokio::test]
async fn test_dialog_that_never_settles_does_not_lock_reader() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("42".into())));
        // Keep the sender alive so the first dialog stays open
        let _never = harness.images.hold();

        harness.controller.read_from_image().unwrap();
        settle().await;
        harness.controller.init_reader().unwrap();
        harness.images.answer(Ok(None));
        harness.controller.read_from_image().unwrap();
        settle().await;

        assert_eq!(harness.images.picks(), 2);
        assert!(!harness.controller.is_reading());
        assert_eq!(
            harness.recorder.detections(),
            vec![
                DetectionResult::failed(ErrorCode::NoFileSelected),
                DetectionResult::failed(ErrorCode::NoFileSelected),
            ]
        );
        assert_eq!(harness.recorder.count(&Record::Start), 2);
        assert_eq!(harness.recorder.count(&Record::Stop), 2);
    })
    .await;
}

#[tokio::test]
async fn test_stale_read_reports_nothing_after_supersede() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("42".into())));
        let _first = harness.images.hold();
        harness.controller.read_from_image().unwrap();
        settle().await;

        let second = harness.images.hold();
        harness.controller.read_from_image().unwrap();
        settle().await;
        harness.recorder.clear();

        harness.images.answer(Ok(Some(ImageFile::new(
            "code.png",
            "image/png",
            png_bytes(20, 20),
        ))));
        second.send(()).unwrap();
        settle().await;

        assert_eq!(
            harness.recorder.records(),
            vec![Record::Detect(DetectionResult::detected("42")), Record::Stop]
        );
    })
    .await;
}

#[tokio::test]
async fn test_consecutive_reads_each_bracketed() {
    run_local(async {
        let harness = reader_with(FixedDecoder(Ok("42".into())));

        harness.controller.read_from_image().unwrap();
        settle().await;
        harness.controller.read_from_image().unwrap();
        settle().await;

        let records = harness.recorder.records();
        assert_eq!(records.len(), 6);
        assert_eq!(harness.recorder.count(&Record::Start), 2);
        assert_eq!(harness.recorder.count(&Record::Stop), 2);
        assert_eq!(harness.images.picks(), 2);
    })
    .await;
}
