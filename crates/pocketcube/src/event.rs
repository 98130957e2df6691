use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Location, Orientation, Part, Twist};

/// Event emitted by a [`crate::PocketCube`] when its state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum CubeEvent {
    /// A twist was applied.
    Twisted(TwistEvent),
    /// The whole state was replaced, such as by a reset.
    Changed,
}

/// Twist that was applied to the cube, along with the resulting placement of
/// every part that moved.
#[derive(Debug, Clone, PartialEq)]
pub struct TwistEvent {
    /// Twist that was applied.
    pub twist: Twist,
    /// Placement of each affected part after the twist, sorted by location.
    ///
    /// This is captured together with the twist, so it is accurate even if
    /// the cube has been twisted again by the time the event is received.
    pub affected: SmallVec<[PartPlacement; 9]>,
}

/// Part occupying a location, and how it is twisted there.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartPlacement {
    /// Location of the part.
    pub location: Location,
    /// Part at the location.
    pub part: Part,
    /// Orientation of the part within the location.
    pub orientation: Orientation,
}

/// List of channels to send events to.
#[derive(Debug)]
pub struct Subscribers<T> {
    senders: Vec<mpsc::Sender<T>>,
}
impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Subscribers<T> {
    /// Constructs an empty list of subscribers.
    pub fn new() -> Self {
        Self { senders: vec![] }
    }

    /// Adds a subscriber and returns the receiving end of its channel.
    pub fn subscribe(&mut self) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Returns the number of connected subscribers, as of the last send.
    pub fn len(&self) -> usize {
        self.senders.len()
    }
    /// Returns whether there are no subscribers, as of the last send.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
impl<T: Clone> Subscribers<T> {
    /// Sends an event to every subscriber, dropping any whose receiver has
    /// disconnected.
    pub fn send(&mut self, event: T) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
