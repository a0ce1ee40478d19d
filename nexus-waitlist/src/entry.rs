//! Waiting participants and the arena nodes that link them.

use crate::Slot;

/// One waiting participant.
///
/// Entries are created by [`Waitlist::enqueue`](crate::Waitlist::enqueue)
/// and handed back by value when removed. The arrival counter is assigned
/// once at insertion and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<P> {
    id: String,
    priority: P,
    arrival: u64,
}

impl<P> Entry<P> {
    #[inline]
    pub(crate) fn new(id: String, priority: P, arrival: u64) -> Self {
        Self {
            id,
            priority,
            arrival,
        }
    }

    /// Returns the participant's identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the participant's priority. Lower is more urgent.
    #[inline]
    pub fn priority(&self) -> &P {
        &self.priority
    }

    /// Returns the arrival sequence number assigned at enqueue time.
    #[inline]
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    /// Consumes the entry, returning its identifier and priority.
    #[inline]
    pub fn into_parts(self) -> (String, P) {
        (self.id, self.priority)
    }
}

/// An entry plus its position links in the arena.
///
/// Users only ever see `&Entry<P>`; the links are an implementation detail
/// of the waitlist.
#[derive(Debug)]
pub(crate) struct Node<P> {
    pub(crate) entry: Entry<P>,
    pub(crate) prev: Slot,
    pub(crate) next: Slot,
}

impl<P> Node<P> {
    /// Creates a new unlinked node.
    #[inline]
    pub(crate) fn new(entry: Entry<P>) -> Self {
        Self {
            entry,
            prev: Slot::NONE,
            next: Slot::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_unlinked() {
        let node = Node::new(Entry::new("U1".into(), 3u32, 0));
        assert!(node.prev.is_none());
        assert!(node.next.is_none());
        assert_eq!(node.entry.id(), "U1");
        assert_eq!(*node.entry.priority(), 3);
        assert_eq!(node.entry.arrival(), 0);
    }

    #[test]
    fn into_parts() {
        let entry = Entry::new("U7".into(), 2u8, 41);
        assert_eq!(entry.into_parts(), ("U7".to_string(), 2));
    }
}
