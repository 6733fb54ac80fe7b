//! Bridges asynchronous key events into ordered classification calls

use crate::engine::tracker::{Classification, MeasurementTracker};
use std::sync::mpsc;

/// A raw key-down event, identified the way the input layer names keys
/// (the letter itself for letter keys, `" "` for space).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The single sending handle for key events.
///
/// Dropping it releases the listener registration; the dispatcher observes
/// the disconnect.
#[derive(Debug)]
pub struct InputSource {
    tx: mpsc::Sender<KeyInput>,
}

impl InputSource {
    /// Queue a key event. Events are delivered in send order.
    pub fn send(&self, key: impl Into<String>) {
        // A send can only fail after the dispatcher is gone, at which point
        // there is nobody left to classify for.
        let _ = self.tx.send(KeyInput::new(key));
    }
}

/// Owns the lifecycle of the key-event listener and feeds the tracker.
///
/// Exactly one [`InputSource`] exists per dispatcher: `acquire_source` hands
/// it out once and returns `None` afterwards, so a re-initialized UI cannot
/// register a second listener. Queued events are processed strictly in
/// arrival order, each `classify` call completing before the next event is
/// looked at; no event is dropped, including ones the tracker ignores.
#[derive(Debug)]
pub struct InputDispatcher {
    rx: mpsc::Receiver<KeyInput>,
    source: Option<InputSource>,
    released: bool,
}

impl InputDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            source: Some(InputSource { tx }),
            released: false,
        }
    }

    /// Take the single sending handle. `None` once taken.
    pub fn acquire_source(&mut self) -> Option<InputSource> {
        self.source.take()
    }

    /// Whether the listener side has been dropped. The disconnect is
    /// observed during [`pump`](Self::pump), once the queue has drained.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Drain all queued events into the tracker, in arrival order.
    ///
    /// Returns one [`Classification`] per event. Marks the dispatcher
    /// released when the sender has disconnected and the queue is empty.
    pub fn pump(&mut self, tracker: &mut MeasurementTracker) -> Vec<Classification> {
        let mut outcomes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => outcomes.push(tracker.classify(&event.key)),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.released = true;
                    break;
                }
            }
        }
        outcomes
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
