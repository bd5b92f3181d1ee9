//! Event delivery
//!
//! Every lifecycle and detection event passes through a single FIFO channel
//! and is delivered by one dispatcher task, so listeners observe events in
//! publication order and never re-entrantly.

pub mod registry;

pub use registry::{Handler, HandlerError, HandlerResult, ListenerRegistry};

use std::{cell::RefCell, collections::HashSet, rc::Rc};
use tokio::sync::mpsc;
use wascan_domain::{ActivationId, ScanEvent};

/// Activations whose stop has been requested but not yet delivered
///
/// Shared between publisher and dispatcher: a detection that was queued
/// before its activation closed is dropped at delivery time. An entry lives
/// until the activation's stop event is delivered, which is always the last
/// event published for it.
#[derive(Debug, Clone, Default)]
struct ClosedActivations(Rc<RefCell<HashSet<ActivationId>>>);

impl ClosedActivations {
    fn insert(&self, activation: ActivationId) {
        self.0.borrow_mut().insert(activation);
    }

    fn remove(&self, activation: ActivationId) {
        self.0.borrow_mut().remove(&activation);
    }

    fn contains(&self, activation: ActivationId) -> bool {
        self.0.borrow().contains(&activation)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Sending half of the event channel
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<ScanEvent>,
    closed: ClosedActivations,
}

impl EventPublisher {
    /// Queue an event for delivery. Dropped silently once the dispatcher is gone.
    pub fn publish(&self, event: ScanEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("event dispatcher closed, dropping event");
        }
    }

    /// Suppress every detection of `activation` not yet delivered
    pub fn close(&self, activation: ActivationId) {
        self.closed.insert(activation);
    }
}

/// Receiving half; delivers queued events to the registry
#[derive(Debug)]
pub struct EventDispatcher {
    rx: mpsc::UnboundedReceiver<ScanEvent>,
    registry: Rc<ListenerRegistry>,
    closed: ClosedActivations,
}

impl EventDispatcher {
    /// Deliver events until every publisher is dropped
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.deliver(&event);
        }
        tracing::debug!("event dispatcher finished");
    }

    fn deliver(&self, event: &ScanEvent) {
        let activation = event.activation_id();

        match event {
            ScanEvent::Detected { .. } if self.closed.contains(activation) => {
                tracing::debug!(%activation, "dropping detection after stop");
                return;
            }
            ScanEvent::Stopped { .. } => self.closed.remove(activation),
            _ => {}
        }

        if let Some(Err(error)) = self.registry.dispatch(event) {
            tracing::warn!(
                event = event.event_type(),
                %activation,
                %error,
                "listener returned an error"
            );
        }
    }
}

/// Create a connected publisher/dispatcher pair over `registry`
pub fn channel(registry: Rc<ListenerRegistry>) -> (EventPublisher, EventDispatcher) {
    let (tx, rx) = mpsc::unbounded_channel();
    let closed = ClosedActivations::default();
    (
        EventPublisher {
            tx,
            closed: closed.clone(),
        },
        EventDispatcher {
            rx,
            registry,
            closed,
        },
    )
}
