//! Reading image files through a scan session

use crate::{
    error::{CliError, CliResult},
    source::QueuedFileSource,
};
use serde::Serialize;
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};
use tokio::sync::mpsc;
use wascan_core::{
    DetectionResult, DetectionResultDto, RxingDecoder, ScanConfig, ScanPorts,
    ScanSessionController, TokioLocalSpawner, Unavailable,
};

/// One output line: the file and its detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path as given on the command line
    pub file: PathBuf,
    /// Detection in its wire shape
    #[serde(flatten)]
    pub result: DetectionResultDto,
}

impl FileReport {
    fn new(file: PathBuf, result: DetectionResult) -> Self {
        Self {
            file,
            result: result.into(),
        }
    }
}

/// Load a scan config from a JSON file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> CliResult<ScanConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read each file in turn and collect one report per file.
///
/// Must run inside a Tokio `LocalSet`.
pub async fn read_files(config: ScanConfig, paths: Vec<PathBuf>) -> CliResult<Vec<FileReport>> {
    let decoder = RxingDecoder::new(config.symbologies().to_vec());
    let ports = ScanPorts::new(
        Rc::new(QueuedFileSource::new(paths.iter().cloned())),
        Rc::new(Unavailable),
        Rc::new(decoder),
        Rc::new(TokioLocalSpawner),
    );
    let controller = ScanSessionController::new(config, ports);

    let detections = Rc::new(RefCell::new(Vec::with_capacity(paths.len())));
    let sink = Rc::clone(&detections);
    controller.on_detect(move |result| {
        sink.borrow_mut().push(result.clone());
        Ok(())
    });

    let (stopped_tx, mut stopped_rx) = mpsc::unbounded_channel();
    controller.on_stop(move || {
        // Receiver outlives every read; a closed channel only means we bailed early
        let _ = stopped_tx.send(());
        Ok(())
    });

    controller.init_reader()?;

    let total = paths.len();
    let mut reports = Vec::with_capacity(total);
    for path in paths {
        controller.read_from_image()?;
        if stopped_rx.recv().await.is_none() {
            return Err(CliError::Incomplete {
                read: reports.len(),
                total,
            });
        }

        let Some(result) = detections.borrow_mut().pop() else {
            return Err(CliError::Incomplete {
                read: reports.len(),
                total,
            });
        };
        tracing::debug!(file = %path.display(), success = result.is_success(), "file read");
        reports.push(FileReport::new(path, result));
    }

    Ok(reports)
}
