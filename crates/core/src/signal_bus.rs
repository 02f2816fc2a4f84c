//! Signal bus — trait for notifying observers of plan lifecycle changes.
//!
//! The lifecycle controller accepts an `Arc<dyn SignalSink>` and emits a
//! signal on every state change, so a UI or service layer can subscribe
//! without the engine knowing anything about its consumers.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::types::TaperStrategy;

/// A notification emitted by the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TaperSignal {
    PlanCreated { strategy: TaperStrategy },
    PlanEdited,
    PlanPaused,
    PlanResumed,
    PlanCancelled,
    PlanCompleted,
    PlanAdjusted { reason: String },
    SuggestionsUpdated { count: usize },
}

/// Trait for receiving taper signals. Implementations route signals to a
/// UI event loop, a message queue, or anything else that wants them.
pub trait SignalSink: Send + Sync {
    fn emit(&self, signal: TaperSignal);
}

/// No-op sink for embeddings that don't need notifications.
pub struct NoOpSink;

impl SignalSink for NoOpSink {
    fn emit(&self, _signal: TaperSignal) {}
}

/// In-memory sink that captures signals for testing.
#[derive(Default)]
pub struct CaptureSink {
    signals: Mutex<Vec<TaperSignal>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            signals: Mutex::new(Vec::new()),
        }
    }

    pub fn signals(&self) -> Vec<TaperSignal> {
        self.signals.lock().expect("signal bus mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.signals.lock().expect("signal bus mutex poisoned").len()
    }

    pub fn clear(&self) {
        self.signals.lock().expect("signal bus mutex poisoned").clear();
    }
}

impl SignalSink for CaptureSink {
    fn emit(&self, signal: TaperSignal) {
        self.signals
            .lock()
            .expect("signal bus mutex poisoned")
            .push(signal);
    }
}

/// Convenience: create a no-op sink for embeddings that don't need one.
pub fn noop_sink() -> Arc<dyn SignalSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink() {
        let sink = capture_sink();
        assert_eq!(sink.count(), 0);

        sink.emit(TaperSignal::PlanCreated {
            strategy: TaperStrategy::Linear,
        });
        sink.emit(TaperSignal::SuggestionsUpdated { count: 2 });

        assert_eq!(sink.count(), 2);
        let signals = sink.signals();
        assert_eq!(signals[1], TaperSignal::SuggestionsUpdated { count: 2 });

        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_noop_sink() {
        let sink = noop_sink();
        // Should not panic
        sink.emit(TaperSignal::PlanCancelled);
    }
}
