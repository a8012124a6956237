// Event Sink Service
// Outbound notifications to whatever UI hosts the shell. Controllers
// mutate their state synchronously and then emit; listeners that render
// icons or panels read the new state in the same tick.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: Value);
}

pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &str, _payload: Value) {}
}

/// Buffers emitted events in memory. Used by tests and by hosts that
/// drain events once per frame instead of reacting per emit.
#[derive(Default)]
pub struct BufferedEventSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl BufferedEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything emitted since the last call.
    pub fn take(&self) -> Vec<(String, Value)> {
        match self.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => Vec::new(),
        }
    }
}

impl EventSink for BufferedEventSink {
    fn emit(&self, event: &str, payload: Value) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push((event.to_string(), payload));
        }
    }
}

pub fn emit_event<T: Serialize>(sink: &dyn EventSink, event: &str, payload: &T) {
    if let Ok(value) = serde_json::to_value(payload) {
        sink.emit(event, value);
    }
}
