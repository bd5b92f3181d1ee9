//! Listener registry - one handler slot per event kind

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};
use wascan_domain::{DetectionResult, EventKind, ScanEvent};

/// Failure reported by a listener; logged, never propagated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener failed: {0}")]
pub struct HandlerError(String);

impl HandlerError {
    /// Wrap a listener failure message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result of one listener invocation
pub type HandlerResult = Result<(), HandlerError>;

/// Registered listener
pub type Handler = Rc<dyn Fn(&ScanEvent) -> HandlerResult>;

/// Maps each [`EventKind`] to at most one handler
///
/// Registering replaces the previous handler for that kind. Dispatch clones
/// the handler out of the slot before calling it, so a handler may re-register
/// (or register another kind) from inside its own invocation.
#[derive(Default)]
pub struct ListenerRegistry {
    slots: RefCell<HashMap<EventKind, Handler>>,
}

impl ListenerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, returning true if one was replaced
    pub fn set(&self, kind: EventKind, handler: Handler) -> bool {
        self.slots.borrow_mut().insert(kind, handler).is_some()
    }

    /// Clear the slot for `kind`, returning true if it held a handler
    pub fn remove(&self, kind: EventKind) -> bool {
        self.slots.borrow_mut().remove(&kind).is_some()
    }

    /// Current handler for `kind`
    pub fn handler(&self, kind: EventKind) -> Option<Handler> {
        self.slots.borrow().get(&kind).cloned()
    }

    /// Whether `kind` has a handler
    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.slots.borrow().contains_key(&kind)
    }

    /// Register the start listener
    pub fn on_start<F>(&self, listener: F) -> bool
    where
        F: Fn() -> HandlerResult + 'static,
    {
        self.set(EventKind::Start, Rc::new(move |_: &ScanEvent| listener()))
    }

    /// Register the stop listener
    pub fn on_stop<F>(&self, listener: F) -> bool
    where
        F: Fn() -> HandlerResult + 'static,
    {
        self.set(EventKind::Stop, Rc::new(move |_: &ScanEvent| listener()))
    }

    /// Register the detect listener
    pub fn on_detect<F>(&self, listener: F) -> bool
    where
        F: Fn(&DetectionResult) -> HandlerResult + 'static,
    {
        self.set(
            EventKind::Detect,
            Rc::new(move |event: &ScanEvent| match event.detection() {
                Some(result) => listener(result),
                None => Ok(()),
            }),
        )
    }

    /// Invoke the handler for `event`'s kind. `None` if the slot is empty.
    pub fn dispatch(&self, event: &ScanEvent) -> Option<HandlerResult> {
        let handler = self.handler(event.kind())?;
        Some(handler(event))
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.slots.borrow().keys().copied().collect();
        kinds.sort_by_key(|kind| *kind as u8);
        f.debug_struct("ListenerRegistry")
            .field("registered", &kinds)
            .finish()
    }
}
