//! Scan session controller

use super::{reader::decode_image, stream::StreamPolicy};
use crate::{
    config::ScanConfig,
    dispatch::{self, EventPublisher, HandlerResult, ListenerRegistry},
    error::{Result, ScanError, Subsystem},
    ports::{CameraSource, FrameStream, ImageSource, SymbolDecoder, TaskSpawner},
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};
use tokio::sync::watch;
use tracing::{debug, error, info};
use wascan_domain::{
    ActivationId, DetectionResult, ErrorCode, ScanEvent, ScanMode, SessionCommand, SessionId,
    SessionSnapshot,
};

/// Host capabilities the controller drives
#[derive(Clone)]
pub struct ScanPorts {
    /// File-selection dialog for one-shot reads
    pub images: Rc<dyn ImageSource>,
    /// Camera feed for stream scans
    pub camera: Rc<dyn CameraSource>,
    /// Symbol decoder shared by both modes
    pub decoder: Rc<dyn SymbolDecoder>,
    /// Background task runner
    pub spawner: Rc<dyn TaskSpawner>,
}

impl ScanPorts {
    /// Bundle the four ports
    pub fn new(
        images: Rc<dyn ImageSource>,
        camera: Rc<dyn CameraSource>,
        decoder: Rc<dyn SymbolDecoder>,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            images,
            camera,
            decoder,
            spawner,
        }
    }
}

struct ActiveStream {
    id: ActivationId,
    cancel: watch::Sender<bool>,
}

struct PendingRead {
    id: ActivationId,
    cancel: watch::Sender<bool>,
}

struct Inner {
    id: SessionId,
    config: ScanConfig,
    ports: ScanPorts,
    registry: Rc<ListenerRegistry>,
    publisher: EventPublisher,
    snapshot: Cell<SessionSnapshot>,
    active: RefCell<Option<ActiveStream>>,
    reading: RefCell<Option<PendingRead>>,
}

impl Inner {
    fn publish(&self, event: ScanEvent) {
        self.publisher.publish(event);
    }

    fn is_current(&self, activation: ActivationId) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|active| active.id == activation)
    }

    /// Take the active stream, or only `activation` if given
    fn take_active(&self, activation: Option<ActivationId>) -> Option<ActiveStream> {
        let mut slot = self.active.borrow_mut();
        let matches = match (slot.as_ref(), activation) {
            (Some(active), Some(expected)) => active.id == expected,
            _ => true,
        };
        if matches { slot.take() } else { None }
    }

    /// Take the pending read, or only `activation` if given
    fn take_read(&self, activation: Option<ActivationId>) -> Option<PendingRead> {
        let mut slot = self.reading.borrow_mut();
        let matches = match (slot.as_ref(), activation) {
            (Some(pending), Some(expected)) => pending.id == expected,
            _ => true,
        };
        if matches { slot.take() } else { None }
    }

    /// Report the outcome of `read` and close its activation
    fn finish_read(&self, read: PendingRead, outcome: std::result::Result<String, ErrorCode>) {
        let _ = read.cancel.send(true);
        if let Err(code) = &outcome {
            debug!(session = %self.id, activation = %read.id, %code, "image read failed");
        }
        self.publish(ScanEvent::detected(read.id, DetectionResult::from(outcome)));
        self.publish(ScanEvent::stopped(read.id, ScanMode::Image));
    }

    /// Stop requested by the host. Detections not yet delivered are discarded.
    fn cancel_stream(&self) -> bool {
        let Some(active) = self.take_active(None) else {
            return false;
        };
        self.publisher.close(active.id);
        self.finish_stream(active);
        true
    }

    /// Terminal condition inside the loop of `activation`, with an optional failure to report
    fn end_stream(&self, activation: ActivationId, failure: Option<ErrorCode>) {
        let Some(active) = self.take_active(Some(activation)) else {
            return;
        };
        if let Some(code) = failure {
            self.publish(ScanEvent::detected(activation, DetectionResult::failed(code)));
        }
        self.finish_stream(active);
    }

    fn finish_stream(&self, active: ActiveStream) {
        let _ = active.cancel.send(true);

        let mut snapshot = self.snapshot.get();
        match snapshot.scanner.apply(SessionCommand::Stop) {
            Ok(next) => {
                snapshot.scanner = next;
                self.snapshot.set(snapshot);
            }
            Err(error) => error!(session = %self.id, %error, "scanner state out of sync"),
        }

        debug!(session = %self.id, activation = %active.id, "stream scan stopped");
        self.publish(ScanEvent::stopped(active.id, ScanMode::Stream));
    }
}

/// Owns one scan session: lifecycle state, listeners and background work
///
/// All methods return immediately. Image reads and stream scans run as tasks
/// on the supplied [`TaskSpawner`], and their outcomes arrive through the
/// registered listeners in order: one start, then detections, then one stop.
pub struct ScanSessionController {
    inner: Rc<Inner>,
}

impl ScanSessionController {
    /// Create a controller and start its event dispatcher
    pub fn new(config: ScanConfig, ports: ScanPorts) -> Self {
        let registry = Rc::new(ListenerRegistry::new());
        let (publisher, dispatcher) = dispatch::channel(Rc::clone(&registry));
        ports.spawner.spawn(Box::pin(dispatcher.run()));

        let inner = Rc::new(Inner {
            id: SessionId::new(),
            config,
            ports,
            registry,
            publisher,
            snapshot: Cell::new(SessionSnapshot::default()),
            active: RefCell::new(None),
            reading: RefCell::new(None),
        });
        debug!(session = %inner.id, "scan session created");
        Self { inner }
    }

    /// Session identifier, used in log output
    pub fn session_id(&self) -> SessionId {
        self.inner.id
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.inner.config
    }

    /// Current lifecycle state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot.get()
    }

    /// Whether a stream scan is running
    pub fn is_scanning(&self) -> bool {
        self.snapshot().is_scanning()
    }

    /// Whether a one-shot read is waiting on the user or the decoder
    pub fn is_reading(&self) -> bool {
        self.inner.reading.borrow().is_some()
    }

    /// Listener slots
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.inner.registry
    }

    /// Register the start listener, replacing any previous one
    pub fn on_start<F>(&self, listener: F)
    where
        F: Fn() -> HandlerResult + 'static,
    {
        self.inner.registry.on_start(listener);
    }

    /// Register the stop listener, replacing any previous one
    pub fn on_stop<F>(&self, listener: F)
    where
        F: Fn() -> HandlerResult + 'static,
    {
        self.inner.registry.on_stop(listener);
    }

    /// Register the detect listener, replacing any previous one
    pub fn on_detect<F>(&self, listener: F)
    where
        F: Fn(&DetectionResult) -> HandlerResult + 'static,
    {
        self.inner.registry.on_detect(listener);
    }

    /// Prepare the file-selection dialog. Idempotent.
    pub fn init_reader(&self) -> Result<()> {
        self.inner
            .ports
            .images
            .prepare()
            .map_err(|code| ScanError::init_failed(Subsystem::Reader, code))?;

        let mut snapshot = self.snapshot();
        snapshot.reader = snapshot.reader.apply(SessionCommand::InitReader)?;
        self.inner.snapshot.set(snapshot);
        info!(session = %self.inner.id, "reader initialized");
        Ok(())
    }

    /// Check camera access is available. Idempotent.
    pub fn init_scanner(&self) -> Result<()> {
        self.inner
            .ports
            .camera
            .prepare()
            .map_err(|code| ScanError::init_failed(Subsystem::Scanner, code))?;

        let mut snapshot = self.snapshot();
        snapshot.scanner = snapshot.scanner.apply(SessionCommand::InitScanner)?;
        self.inner.snapshot.set(snapshot);
        info!(session = %self.inner.id, "scanner initialized");
        Ok(())
    }

    /// Ask the user for an image and decode it in the background
    ///
    /// Emits start, exactly one detect and stop, all in image mode. A call
    /// while a read is still waiting on the dialog abandons that read, which
    /// reports `NoFileSelected`, and opens a new dialog.
    pub fn read_from_image(&self) -> Result<()> {
        if !self.snapshot().is_reader_ready() {
            return Err(ScanError::not_initialized(Subsystem::Reader));
        }
        if let Some(stale) = self.inner.take_read(None) {
            debug!(
                session = %self.inner.id,
                activation = %stale.id,
                "superseding pending image read"
            );
            self.inner.finish_read(stale, Err(ErrorCode::NoFileSelected));
        }

        let activation = ActivationId::new();
        let (cancel, cancelled) = watch::channel(false);
        *self.inner.reading.borrow_mut() = Some(PendingRead {
            id: activation,
            cancel,
        });

        self.inner.publish(ScanEvent::started(activation, ScanMode::Image));
        self.inner.ports.spawner.spawn(Box::pin(run_image_read(
            Rc::clone(&self.inner),
            activation,
            cancelled,
        )));
        Ok(())
    }

    /// Attach the camera to `target` and decode frames until stopped
    ///
    /// Emits start immediately. Acquisition failures arrive as one failed
    /// detection followed by stop. A call while already scanning does nothing.
    pub fn start_stream_scan(&self, target: &str) -> Result<()> {
        let mut snapshot = self.snapshot();
        if !snapshot.is_scanner_ready() {
            return Err(ScanError::not_initialized(Subsystem::Scanner));
        }
        if snapshot.is_scanning() {
            debug!(session = %self.inner.id, "stream scan already running");
            return Ok(());
        }

        snapshot.scanner = snapshot.scanner.apply(SessionCommand::Start)?;
        self.inner.snapshot.set(snapshot);

        let activation = ActivationId::new();
        let (cancel, cancelled) = watch::channel(false);
        *self.inner.active.borrow_mut() = Some(ActiveStream {
            id: activation,
            cancel,
        });

        info!(session = %self.inner.id, %activation, surface = target, "stream scan started");
        self.inner.publish(ScanEvent::started(activation, ScanMode::Stream));
        self.inner.ports.spawner.spawn(Box::pin(run_stream(
            Rc::clone(&self.inner),
            activation,
            target.to_owned(),
            cancelled,
        )));
        Ok(())
    }

    /// Stop the running stream scan and release the camera
    ///
    /// No detection is delivered after this returns. Does nothing when idle.
    pub fn stop_stream_scan(&self) {
        if !self.inner.cancel_stream() {
            debug!(session = %self.inner.id, "no stream scan to stop");
        }
    }
}

impl Drop for ScanSessionController {
    fn drop(&mut self) {
        self.inner.cancel_stream();
        if let Some(read) = self.inner.take_read(None) {
            let _ = read.cancel.send(true);
        }
    }
}

impl fmt::Debug for ScanSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSessionController")
            .field("id", &self.inner.id)
            .field("snapshot", &self.inner.snapshot.get())
            .field("reading", &self.is_reading())
            .field("config", &self.inner.config)
            .field("listeners", &self.inner.registry)
            .finish()
    }
}

async fn run_image_read(
    inner: Rc<Inner>,
    activation: ActivationId,
    mut cancelled: watch::Receiver<bool>,
) {
    let picked = tokio::select! {
        biased;
        _ = cancelled.changed() => return,
        picked = inner.ports.images.pick_image() => picked,
    };

    let outcome = match picked {
        Ok(Some(file)) => {
            debug!(
                %activation,
                name = file.name(),
                size = file.bytes().len(),
                "image chosen"
            );
            decode_image(&file, inner.ports.decoder.as_ref(), &inner.config)
        }
        Ok(None) => Err(ErrorCode::NoFileSelected),
        Err(code) => Err(code),
    };

    if let Some(read) = inner.take_read(Some(activation)) {
        inner.finish_read(read, outcome);
    }
}

async fn run_stream(
    inner: Rc<Inner>,
    activation: ActivationId,
    target: String,
    mut cancelled: watch::Receiver<bool>,
) {
    if !inner.is_current(activation) {
        return;
    }

    let mut frames = match inner.ports.camera.open(&target).await {
        Ok(frames) => frames,
        Err(code) => {
            debug!(%activation, %code, surface = %target, "camera acquisition failed");
            inner.end_stream(activation, Some(code));
            return;
        }
    };

    if inner.is_current(activation) {
        scan_frames(&inner, activation, &mut frames, &mut cancelled).await;
    }
    frames.close();
}

async fn scan_frames(
    inner: &Inner,
    activation: ActivationId,
    frames: &mut Box<dyn FrameStream>,
    cancelled: &mut watch::Receiver<bool>,
) {
    let mut policy = StreamPolicy::new(&inner.config);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancelled.changed() => return,
            next = frames.next_frame() => next,
        };

        let frame = match next {
            Some(Ok(frame)) => frame,
            Some(Err(code)) => {
                debug!(%activation, %code, "frame stream failed");
                inner.end_stream(activation, Some(code));
                return;
            }
            None => {
                debug!(%activation, "frame stream ended");
                inner.end_stream(activation, None);
                return;
            }
        };

        if !policy.should_sample(frame.captured_at_ms()) {
            continue;
        }

        if let Some(result) = policy.observe(inner.ports.decoder.decode(&frame)) {
            if !inner.is_current(activation) {
                return;
            }
            inner.publish(ScanEvent::detected(activation, result));
        }
    }
}
