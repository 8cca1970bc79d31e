//! Diagnostics dispatcher
//!
//! Every tracing event is forwarded here by [`crate::logging::DiagnosticLayer`].
//! Components that need to watch the diagnostic stream register an observer
//! and keep the returned [`Subscription`]; dropping it unregisters the
//! observer. Observers never see a record before it reaches the other layers
//! and cannot suppress it.

mod sniffer;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::Level;

pub use sniffer::ErrorSniffer;

/// A single diagnostic message
#[derive(Clone, Debug)]
pub struct DiagnosticRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl DiagnosticRecord {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            target: target.into(),
            message: message.into(),
        }
    }
}

pub trait DiagnosticObserver: Send + Sync {
    fn observe(&self, record: &DiagnosticRecord);
}

type ObserverList = Vec<(u64, Arc<dyn DiagnosticObserver>)>;

#[derive(Default)]
struct Registry {
    observers: RwLock<ObserverList>,
    next_id: AtomicU64,
}

/// Shared handle to the observer registry
#[derive(Clone, Default)]
pub struct Diagnostics {
    registry: Arc<Registry>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn DiagnosticObserver>) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.observers.write().push((id, observer));
        tracing::trace!(id, "Diagnostic observer registered");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver a record to every registered observer
    pub fn dispatch(&self, record: &DiagnosticRecord) {
        // Observers run without the lock held so they may log themselves.
        let observers: Vec<Arc<dyn DiagnosticObserver>> = {
            let guard = self.registry.observers.read();
            if guard.is_empty() {
                return;
            }
            guard.iter().map(|(_, observer)| Arc::clone(observer)).collect()
        };
        for observer in observers {
            observer.observe(record);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.registry.observers.read().len()
    }
}

/// Keeps an observer registered until dropped
#[must_use = "the observer is removed when the subscription is dropped"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.observers.write().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
    }

    impl DiagnosticObserver for Recorder {
        fn observe(&self, record: &DiagnosticRecord) {
            self.messages.lock().push(record.message.clone());
        }
    }

    fn record(message: &str) -> DiagnosticRecord {
        DiagnosticRecord::new(Level::ERROR, "test", message)
    }

    #[test]
    fn observers_compose_and_unsubscribe_on_drop() {
        let diagnostics = Diagnostics::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let first_sub = diagnostics.subscribe(first.clone());
        let second_sub = diagnostics.subscribe(second.clone());
        assert_eq!(diagnostics.observer_count(), 2);

        diagnostics.dispatch(&record("one"));
        drop(first_sub);
        diagnostics.dispatch(&record("two"));

        assert_eq!(*first.messages.lock(), vec!["one"]);
        assert_eq!(*second.messages.lock(), vec!["one", "two"]);

        drop(second_sub);
        assert_eq!(diagnostics.observer_count(), 0);
    }

    #[test]
    fn subscription_outliving_dispatcher_is_harmless() {
        let diagnostics = Diagnostics::new();
        let sub = diagnostics.subscribe(Arc::new(Recorder::default()));
        drop(diagnostics);
        drop(sub);
    }

    struct Reentrant {
        diagnostics: Diagnostics,
        seen: Mutex<usize>,
    }

    impl DiagnosticObserver for Reentrant {
        fn observe(&self, record: &DiagnosticRecord) {
            *self.seen.lock() += 1;
            if record.message == "outer" {
                self.diagnostics.dispatch(&DiagnosticRecord::new(Level::INFO, "test", "inner"));
            }
        }
    }

    #[test]
    fn observers_may_dispatch_while_observing() {
        let diagnostics = Diagnostics::new();
        let observer = Arc::new(Reentrant {
            diagnostics: diagnostics.clone(),
            seen: Mutex::new(0),
        });
        let _sub = diagnostics.subscribe(observer.clone());
        diagnostics.dispatch(&record("outer"));
        assert_eq!(*observer.seen.lock(), 2);
    }
}
