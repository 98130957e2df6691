use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use parking_lot::Mutex;
use pocketcube::Subscribers;

/// Event sent to renderers when the view changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    /// Some transform in the scene changed.
    StateChanged {
        /// Revision number after the change.
        revision: u64,
    },
}

/// Source of "state changed" notifications, with a revision counter that
/// renderers can poll instead of subscribing.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    revision: AtomicU64,
    subscribers: Mutex<Subscribers<ViewEvent>>,
}
impl ChangeNotifier {
    /// Constructs a notifier at revision 0 with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a channel that receives every subsequent notification.
    pub fn subscribe(&self) -> mpsc::Receiver<ViewEvent> {
        self.subscribers.lock().subscribe()
    }

    /// Returns the current revision number.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Increments the revision and notifies subscribers. Returns the new
    /// revision.
    pub fn notify(&self) -> u64 {
        let mut subscribers = self.subscribers.lock();
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        subscribers.send(ViewEvent::StateChanged { revision });
        revision
    }
}
