//! Shared fakes for controller integration tests

#![allow(dead_code)]

use futures::{channel::oneshot, future::LocalBoxFuture};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    io::Cursor,
    rc::Rc,
};
use tokio::sync::mpsc;
use wascan_core::{
    CameraSource, DetectionResult, ErrorCode, FrameStream, ImageFile, ImageSource, LumaFrame,
    ScanConfig, ScanPorts, ScanSessionController, SymbolDecoder, TokioLocalSpawner,
};

/// Run `future` inside a fresh `LocalSet`
pub async fn run_local<F: std::future::Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}

/// Let spawned tasks and the dispatcher drain
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

/// Encoded grayscale PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::new_luma8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Frame whose pixels spell `text`, read back by [`TextDecoder`]
pub fn text_frame(text: &str, captured_at_ms: u64) -> LumaFrame {
    LumaFrame::new(text.len() as u32, 1, text.as_bytes().to_vec(), captured_at_ms).unwrap()
}

/// Frame with nothing to decode
pub fn blank_frame(captured_at_ms: u64) -> LumaFrame {
    LumaFrame::new(1, 1, vec![0], captured_at_ms).unwrap()
}

/// Reads frame pixels back as UTF-8; all-zero frames are misses
#[derive(Debug, Default)]
pub struct TextDecoder;

impl SymbolDecoder for TextDecoder {
    fn decode(&self, frame: &LumaFrame) -> Result<String, ErrorCode> {
        if frame.pixels().iter().all(|px| *px == 0) {
            return Err(ErrorCode::NotDetected);
        }
        String::from_utf8(frame.pixels().to_vec()).map_err(|_| ErrorCode::Internal)
    }
}

/// Always returns the same outcome
#[derive(Debug)]
pub struct FixedDecoder(pub Result<String, ErrorCode>);

impl SymbolDecoder for FixedDecoder {
    fn decode(&self, _frame: &LumaFrame) -> Result<String, ErrorCode> {
        self.0.clone()
    }
}

/// File picker returning queued answers
#[derive(Default)]
pub struct FakeImageSource {
    prepare: Cell<Option<ErrorCode>>,
    answers: RefCell<VecDeque<Result<Option<ImageFile>, ErrorCode>>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    picks: Cell<usize>,
}

impl FakeImageSource {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// `prepare` fails with `code`
    pub fn failing(code: ErrorCode) -> Rc<Self> {
        let source = Self::default();
        source.prepare.set(Some(code));
        Rc::new(source)
    }

    /// Queue the next answer
    pub fn answer(&self, answer: Result<Option<ImageFile>, ErrorCode>) {
        self.answers.borrow_mut().push_back(answer);
    }

    /// Hold the next pick open until the returned sender fires
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    /// Number of dialogs shown
    pub fn picks(&self) -> usize {
        self.picks.get()
    }
}

impl ImageSource for FakeImageSource {
    fn prepare(&self) -> Result<(), ErrorCode> {
        match self.prepare.get() {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn pick_image(&self) -> LocalBoxFuture<'_, Result<Option<ImageFile>, ErrorCode>> {
        self.picks.set(self.picks.get() + 1);
        let gate = self.gate.borrow_mut().take();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.answers.borrow_mut().pop_front().unwrap_or(Ok(None))
        })
    }
}

/// Sender side of a fake camera feed
pub type FrameFeed = mpsc::UnboundedSender<Result<LumaFrame, ErrorCode>>;

/// Camera attached to a single surface and fed from the test
pub struct ChannelCamera {
    surface: String,
    prepare: Cell<Option<ErrorCode>>,
    open_error: Cell<Option<ErrorCode>>,
    feeds: RefCell<VecDeque<mpsc::UnboundedReceiver<Result<LumaFrame, ErrorCode>>>>,
    opened: Cell<usize>,
    closed: Rc<Cell<usize>>,
}

impl ChannelCamera {
    pub fn new(surface: &str) -> Rc<Self> {
        Rc::new(Self {
            surface: surface.to_owned(),
            prepare: Cell::new(None),
            open_error: Cell::new(None),
            feeds: RefCell::new(VecDeque::new()),
            opened: Cell::new(0),
            closed: Rc::new(Cell::new(0)),
        })
    }

    /// `prepare` fails with `code`
    pub fn fail_prepare(&self, code: ErrorCode) {
        self.prepare.set(Some(code));
    }

    /// `open` fails with `code`
    pub fn fail_open(&self, code: ErrorCode) {
        self.open_error.set(Some(code));
    }

    /// Feed for the next opened stream
    pub fn feed(&self) -> FrameFeed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.feeds.borrow_mut().push_back(rx);
        tx
    }

    /// Streams opened so far
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// Streams closed so far
    pub fn closed(&self) -> usize {
        self.closed.get()
    }
}

impl CameraSource for ChannelCamera {
    fn prepare(&self) -> Result<(), ErrorCode> {
        match self.prepare.get() {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn open<'a>(
        &'a self,
        target: &'a str,
    ) -> LocalBoxFuture<'a, Result<Box<dyn FrameStream>, ErrorCode>> {
        Box::pin(async move {
            if target != self.surface {
                return Err(ErrorCode::InvalidVideoElementId);
            }
            if let Some(code) = self.open_error.get() {
                return Err(code);
            }
            let rx = self.feeds.borrow_mut().pop_front().ok_or(ErrorCode::NoMedia)?;
            self.opened.set(self.opened.get() + 1);
            Ok(Box::new(ChannelFrameStream {
                rx,
                closed: Rc::clone(&self.closed),
                is_closed: false,
            }) as Box<dyn FrameStream>)
        })
    }
}

struct ChannelFrameStream {
    rx: mpsc::UnboundedReceiver<Result<LumaFrame, ErrorCode>>,
    closed: Rc<Cell<usize>>,
    is_closed: bool,
}

impl FrameStream for ChannelFrameStream {
    fn next_frame(&mut self) -> LocalBoxFuture<'_, Option<Result<LumaFrame, ErrorCode>>> {
        Box::pin(self.rx.recv())
    }

    fn close(&mut self) {
        if !self.is_closed {
            self.is_closed = true;
            self.rx.close();
            self.closed.set(self.closed.get() + 1);
        }
    }
}

/// Listener invocation as seen by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Start,
    Detect(DetectionResult),
    Stop,
}

/// Registers all three listeners and records every call
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Record>>>,
}

impl Recorder {
    pub fn attach(controller: &ScanSessionController) -> Self {
        let recorder = Self::default();

        let log = Rc::clone(&recorder.log);
        controller.on_start(move || {
            log.borrow_mut().push(Record::Start);
            Ok(())
        });
        let log = Rc::clone(&recorder.log);
        controller.on_detect(move |result| {
            log.borrow_mut().push(Record::Detect(result.clone()));
            Ok(())
        });
        let log = Rc::clone(&recorder.log);
        controller.on_stop(move || {
            log.borrow_mut().push(Record::Stop);
            Ok(())
        });

        recorder
    }

    pub fn records(&self) -> Vec<Record> {
        self.log.borrow().clone()
    }

    pub fn detections(&self) -> Vec<DetectionResult> {
        self.log
            .borrow()
            .iter()
            .filter_map(|record| match record {
                Record::Detect(result) => Some(result.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Record) -> usize {
        self.log.borrow().iter().filter(|record| *record == wanted).count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Controller wired to fakes
pub struct Harness {
    pub controller: ScanSessionController,
    pub images: Rc<FakeImageSource>,
    pub camera: Rc<ChannelCamera>,
    pub recorder: Recorder,
}

impl Harness {
    /// Must be called inside a `LocalSet`
    pub fn new(config: ScanConfig) -> Self {
        Self::with_parts(
            config,
            FakeImageSource::new(),
            ChannelCamera::new("video"),
            Rc::new(TextDecoder),
        )
    }

    pub fn with_parts(
        config: ScanConfig,
        images: Rc<FakeImageSource>,
        camera: Rc<ChannelCamera>,
        decoder: Rc<dyn SymbolDecoder>,
    ) -> Self {
        let ports = ScanPorts::new(
            images.clone(),
            camera.clone(),
            decoder,
            Rc::new(TokioLocalSpawner),
        );
        let controller = ScanSessionController::new(config, ports);
        let recorder = Recorder::attach(&controller);
        Self {
            controller,
            images,
            camera,
            recorder,
        }
    }
}

/// Config that decodes every frame and reports the first read
pub fn eager_config() -> ScanConfig {
    ScanConfig::new()
        .set_frame_interval_ms(0)
        .set_required_consecutive_detections(1)
}
