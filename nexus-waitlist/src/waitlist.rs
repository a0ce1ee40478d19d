//! Priority-aware FIFO waitlist.
//!
//! Entries live in a `slab::Slab` arena and are chained front to back with
//! `Slot` links. An `id -> slot` map sits beside the chain so presence
//! checks and removal by id do not scan.
//!
//! # Ordering
//!
//! Enqueue always appends at the tail. Priority order is only established
//! by [`Waitlist::sort_by_priority`] (or automatically after every enqueue
//! under [`ReorderPolicy::OnEnqueue`]). The sort is stable: entries with
//! equal priority keep the order they had just before the call.
//!
//! # Example
//!
//! ```
//! use nexus_waitlist::Waitlist;
//!
//! let mut waitlist: Waitlist<u32> = Waitlist::new();
//!
//! waitlist.enqueue("U1", 3).unwrap();
//! waitlist.enqueue("U2", 2).unwrap();
//! waitlist.enqueue("U3", 2).unwrap();
//! assert_eq!(waitlist.query_position("U1"), Some(1));
//!
//! waitlist.sort_by_priority();
//! let order: Vec<_> = waitlist.ids().collect();
//! assert_eq!(order, ["U2", "U3", "U1"]);
//!
//! // Remove from anywhere
//! let removed = waitlist.remove("U3").unwrap();
//! assert_eq!(removed.id(), "U3");
//! assert_eq!(waitlist.query_position("U1"), Some(2));
//! ```

use std::collections::HashMap;

use slab::Slab;

use crate::entry::Node;
use crate::sort::merge_sort;
use crate::{Entry, ReorderPolicy, Slot, WaitlistConfig, WaitlistError};

/// An ordered waitlist of uniquely identified entries.
///
/// The waitlist has a single owner and every mutation takes `&mut self`.
/// Hosts that share it across threads wrap the whole value in a mutex.
///
/// # Type Parameters
///
/// - `P`: Priority type. Lower values are more urgent.
pub struct Waitlist<P = u32> {
    nodes: Slab<Node<P>>,
    index: HashMap<String, Slot>,
    head: Slot,
    tail: Slot,
    len: usize,
    next_arrival: u64,
    config: WaitlistConfig,
}

impl<P> Default for Waitlist<P> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Base impl - read, remove and relink operations
// =============================================================================

impl<P> Waitlist<P> {
    /// Creates an empty waitlist with the default configuration.
    pub fn new() -> Self {
        Self::with_config(WaitlistConfig::default())
    }

    /// Creates an empty waitlist with the given configuration.
    pub fn with_config(config: WaitlistConfig) -> Self {
        Self {
            nodes: Slab::with_capacity(config.capacity),
            index: HashMap::with_capacity(config.capacity),
            head: Slot::NONE,
            tail: Slot::NONE,
            len: 0,
            next_arrival: 0,
            config,
        }
    }

    /// Returns the active configuration.
    #[inline]
    pub fn config(&self) -> &WaitlistConfig {
        &self.config
    }

    /// Discards every entry and restarts the arrival counter.
    ///
    /// Safe to call on a waitlist in any state. The configuration is kept.
    pub fn initialize(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.head = Slot::NONE;
        self.tail = Slot::NONE;
        self.len = 0;
        self.next_arrival = 0;
    }

    /// Removes all entries. Same as [`initialize`](Self::initialize).
    #[inline]
    pub fn clear(&mut self) {
        self.initialize();
    }

    /// Returns the number of waiting entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nobody is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if an entry with `id` is waiting.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the entry with `id`, if waiting.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&Entry<P>> {
        let slot = *self.index.get(id)?;
        Some(&self.nodes[slot.index()].entry)
    }

    /// Returns the head entry.
    #[inline]
    pub fn front(&self) -> Option<&Entry<P>> {
        self.entry_at(self.head)
    }

    /// Returns the tail entry.
    #[inline]
    pub fn back(&self) -> Option<&Entry<P>> {
        self.entry_at(self.tail)
    }

    /// Returns the entry right after `id`.
    ///
    /// Returns `None` if `id` is the tail or is not waiting.
    pub fn next_of(&self, id: &str) -> Option<&Entry<P>> {
        let slot = *self.index.get(id)?;
        self.entry_at(self.nodes[slot.index()].next)
    }

    /// Returns the entry right before `id`.
    ///
    /// Returns `None` if `id` is the head or is not waiting.
    pub fn prev_of(&self, id: &str) -> Option<&Entry<P>> {
        let slot = *self.index.get(id)?;
        self.entry_at(self.nodes[slot.index()].prev)
    }

    /// Returns the 1-based position of `id` counted from the head.
    ///
    /// Returns `None` if `id` is not waiting, including when the waitlist
    /// is empty.
    pub fn query_position(&self, id: &str) -> Option<usize> {
        let target = *self.index.get(id)?;

        let mut position = 1;
        let mut curr = self.head;
        while curr.is_some() {
            if curr == target {
                return Some(position);
            }
            curr = self.nodes[curr.index()].next;
            position += 1;
        }

        None
    }

    /// Removes the entry with `id` and returns it.
    ///
    /// Neighbours are relinked; every other entry keeps its relative order
    /// and arrival number.
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::NotFound`] if `id` is not waiting. The
    /// waitlist is unchanged in that case.
    pub fn remove(&mut self, id: &str) -> Result<Entry<P>, WaitlistError> {
        let Some(slot) = self.index.remove(id) else {
            return Err(WaitlistError::NotFound(id.to_string()));
        };
        self.unlink(slot);
        Ok(self.nodes.remove(slot.index()).entry)
    }

    /// Removes and returns the head entry.
    ///
    /// This is how an entry is promoted once a space is granted.
    pub fn pop_front(&mut self) -> Option<Entry<P>> {
        if self.head.is_none() {
            return None;
        }

        let slot = self.head;
        self.unlink(slot);
        let entry = self.nodes.remove(slot.index()).entry;
        self.index.remove(entry.id());
        Some(entry)
    }

    /// Returns an iterator over entries, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, P> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Returns an iterator over ids, head to tail.
    #[inline]
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.iter().map(Entry::id)
    }

    #[inline]
    fn entry_at(&self, slot: Slot) -> Option<&Entry<P>> {
        slot.get().map(|key| &self.nodes[key].entry)
    }

    /// Appends an allocated, unlinked node at the tail.
    fn link_back(&mut self, slot: Slot) {
        let node = &mut self.nodes[slot.index()];
        node.prev = self.tail;
        node.next = Slot::NONE;

        if self.tail.is_some() {
            self.nodes[self.tail.index()].next = slot;
        } else {
            self.head = slot;
        }

        self.tail = slot;
        self.len += 1;
    }

    /// Splices a linked node out of the chain without freeing it.
    fn unlink(&mut self, slot: Slot) {
        let node = &self.nodes[slot.index()];
        let prev = node.prev;
        let next = node.next;

        if prev.is_some() {
            self.nodes[prev.index()].next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            self.nodes[next.index()].prev = prev;
        } else {
            self.tail = prev;
        }

        let node = &mut self.nodes[slot.index()];
        node.prev = Slot::NONE;
        node.next = Slot::NONE;

        self.len -= 1;
    }
}

// =============================================================================
// Ordered impl - operations that compare priorities
// =============================================================================

impl<P: Ord> Waitlist<P> {
    /// Appends a new entry at the tail.
    ///
    /// The entry receives the next arrival number. Under
    /// [`ReorderPolicy::OnEnqueue`] the waitlist is re-sorted afterwards;
    /// otherwise the order is left alone.
    ///
    /// # Errors
    ///
    /// - [`WaitlistError::EmptyId`] if `id` is empty.
    /// - [`WaitlistError::DuplicateId`] if `id` is already waiting.
    ///
    /// The waitlist is unchanged on error.
    pub fn enqueue(&mut self, id: impl Into<String>, priority: P) -> Result<(), WaitlistError> {
        let id = id.into();
        if id.is_empty() {
            return Err(WaitlistError::EmptyId);
        }
        if self.index.contains_key(&id) {
            return Err(WaitlistError::DuplicateId(id));
        }

        let arrival = self.next_arrival;
        self.next_arrival += 1;

        let key = self
            .nodes
            .insert(Node::new(Entry::new(id.clone(), priority, arrival)));
        let slot = Slot::from(key);
        self.index.insert(id, slot);
        self.link_back(slot);

        if self.config.reorder == ReorderPolicy::OnEnqueue {
            self.sort_by_priority();
        }
        Ok(())
    }

    /// Reorders entries by ascending priority with a stable merge sort.
    ///
    /// Entries with equal priority keep the relative order they had before
    /// this call. Size, ids and arrival numbers are untouched. A no-op for
    /// fewer than two entries.
    pub fn sort_by_priority(&mut self) {
        if self.len <= 1 {
            return;
        }

        let (head, tail) = merge_sort(&mut self.nodes, self.head);
        self.head = head;
        self.tail = tail;
    }
}

impl<P: core::fmt::Debug> core::fmt::Debug for Waitlist<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, P> IntoIterator for &'a Waitlist<P> {
    type Item = &'a Entry<P>;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Iterator over waitlist entries, head to tail.
pub struct Iter<'a, P> {
    nodes: &'a Slab<Node<P>>,
    front: Slot,
    back: Slot,
    remaining: usize,
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = &'a Entry<P>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let node = &nodes[self.front.index()];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P> DoubleEndedIterator for Iter<'_, P> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes;
        let node = &nodes[self.back.index()];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.entry)
    }
}

impl<P> ExactSizeIterator for Iter<'_, P> {}


#[cfg(test)]
mod bench_waitlist {
    use super::*;
    use hdrhistogram::Histogram;

    #[inline]
    fn rdtscp() -> u64 {
        #[cfg(target_arch = "x86_64")]
        unsafe {
            core::arch::x86_64::__rdtscp(&mut 0)
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            std::time::Instant::now().elapsed().as_nanos() as u64
        }
    }

    fn print_histogram(name: &str, hist: &Histogram<u64>) {
        println!(
            "{:24} p50: {:5} cycles | p99: {:5} cycles | p999: {:6} cycles | min: {:4} | max: {:6}",
            name,
            hist.value_at_quantile(0.50),
            hist.value_at_quantile(0.99),
            hist.value_at_quantile(0.999),
            hist.min(),
            hist.max(),
        );
    }

    const WARMUP: usize = 10_000;
    const ITERATIONS: usize = 100_000;
    const RESIDENT: usize = 256;

    fn resident() -> (Waitlist<u32>, Vec<String>) {
        let config = WaitlistConfig::default().with_capacity(RESIDENT + 1);
        let mut waitlist = Waitlist::with_config(config);
        for i in 0..RESIDENT {
            waitlist.enqueue(format!("resident-{i}"), (i % 3) as u32).unwrap();
        }
        let ids = (0..ITERATIONS + WARMUP).map(|i| format!("user-{i}")).collect();
        (waitlist, ids)
    }

    /// Residents in arrival order with mixed priorities, not yet sorted.
    fn unsorted() -> Waitlist<u32> {
        let config = WaitlistConfig::default().with_capacity(RESIDENT);
        let mut waitlist = Waitlist::with_config(config);
        for i in 0..RESIDENT {
            waitlist.enqueue(format!("resident-{i}"), ((i * 7) % 5) as u32).unwrap();
        }
        waitlist
    }

    const VICTIM: &str = "victim";

    /// Sorted residents split into a priority 0 half and a priority 2 half,
    /// with the priority 1 victim between them.
    fn banded() -> Waitlist<u32> {
        let config = WaitlistConfig::default().with_capacity(RESIDENT + 1);
        let mut waitlist = Waitlist::with_config(config);
        for i in 0..RESIDENT {
            let priority = if i < RESIDENT / 2 { 0 } else { 2 };
            waitlist.enqueue(format!("resident-{i}"), priority).unwrap();
        }
        waitlist.enqueue(VICTIM, 1).unwrap();
        waitlist.sort_by_priority();
        waitlist
    }

    /// Puts the victim back between the bands. Not timed.
    fn requeue_victim(waitlist: &mut Waitlist<u32>) {
        let _ = waitlist.enqueue(VICTIM, 1);
        waitlist.sort_by_priority();
    }

    #[test]
    fn victim_is_interior_on_every_round() {
        let mut waitlist = banded();
        for _ in 0..3 {
            assert_eq!(waitlist.query_position(VICTIM), Some(RESIDENT / 2 + 1));
            assert!(waitlist.prev_of(VICTIM).is_some());
            assert!(waitlist.next_of(VICTIM).is_some());
            waitlist.remove(VICTIM).unwrap();
            assert_eq!(waitlist.len(), RESIDENT);
            requeue_victim(&mut waitlist);
        }
    }

    #[test]
    fn unsorted_needs_reordering() {
        let waitlist = unsorted();
        let priorities: Vec<u32> = waitlist.iter().map(|e| *e.priority()).collect();
        assert!(priorities.windows(2).any(|w| w[0] > w[1]));
    }

    #[test]
    #[ignore]
    fn bench_enqueue_remove_tail() {
        let (mut waitlist, ids) = resident();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for id in &ids[..WARMUP] {
            let _ = waitlist.enqueue(id.as_str(), 1);
            let _ = waitlist.remove(id);
        }

        for id in &ids[WARMUP..] {
            let start = rdtscp();
            let _ = waitlist.enqueue(id.as_str(), 1);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            let _ = waitlist.remove(id);
        }

        print_histogram("enqueue", &hist);
    }

    #[test]
    #[ignore]
    fn bench_remove_interior() {
        let mut waitlist = banded();
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for _ in 0..WARMUP / 10 {
            let _ = waitlist.remove(VICTIM);
            requeue_victim(&mut waitlist);
        }

        for _ in 0..ITERATIONS / 10 {
            let start = rdtscp();
            let _ = waitlist.remove(VICTIM);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
            requeue_victim(&mut waitlist);
        }

        print_histogram("remove", &hist);
    }

    #[test]
    #[ignore]
    fn bench_query_position() {
        let (waitlist, _) = resident();
        let mut hist = Histogram::<u64>::new(3).unwrap();
        let tail_id = format!("resident-{}", RESIDENT - 1);

        for _ in 0..WARMUP {
            let _ = waitlist.query_position(&tail_id);
        }

        for _ in 0..ITERATIONS {
            let start = rdtscp();
            let _ = waitlist.query_position(&tail_id);
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
        }

        print_histogram("query_position (tail)", &hist);
    }

    #[test]
    #[ignore]
    fn bench_sort_by_priority() {
        let mut hist = Histogram::<u64>::new(3).unwrap();

        for _ in 0..ITERATIONS / 100 {
            let mut waitlist = unsorted();
            let start = rdtscp();
            waitlist.sort_by_priority();
            let elapsed = rdtscp() - start;
            hist.record(elapsed).unwrap();
        }

        print_histogram("sort_by_priority (256)", &hist);
    }
}
