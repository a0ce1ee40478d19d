//! Stable merge sort over arena-linked nodes.
//!
//! Bottom-up list merge sort: runs of width 1, 2, 4, ... are merged in
//! place by relinking `next`/`prev`. Nothing is allocated and no entry
//! moves within the arena, so slots held by the id index stay valid.
//!
//! Stability comes from the merge step: on equal priorities the node from
//! the left run is always taken first.

use slab::Slab;

use crate::Slot;
use crate::entry::Node;

/// Sorts the chain starting at `head` by ascending priority.
///
/// Returns the new `(head, tail)`. An empty chain returns `(NONE, NONE)`.
pub(crate) fn merge_sort<P: Ord>(nodes: &mut Slab<Node<P>>, head: Slot) -> (Slot, Slot) {
    if head.is_none() {
        return (Slot::NONE, Slot::NONE);
    }

    let mut list = head;
    let mut width = 1usize;

    loop {
        let mut left = list;
        list = Slot::NONE;
        let mut tail = Slot::NONE;
        let mut merges = 0usize;

        while left.is_some() {
            merges += 1;

            // Step `width` nodes to find the start of the right run
            let mut right = left;
            let mut left_len = 0usize;
            for _ in 0..width {
                left_len += 1;
                right = nodes[right.index()].next;
                if right.is_none() {
                    break;
                }
            }
            let mut right_len = width;

            while left_len > 0 || (right_len > 0 && right.is_some()) {
                let take;
                if left_len == 0 {
                    take = right;
                    right = nodes[right.index()].next;
                    right_len -= 1;
                } else if right_len == 0 || right.is_none() {
                    take = left;
                    left = nodes[left.index()].next;
                    left_len -= 1;
                } else if nodes[right.index()].entry.priority() < nodes[left.index()].entry.priority()
                {
                    take = right;
                    right = nodes[right.index()].next;
                    right_len -= 1;
                } else {
                    take = left;
                    left = nodes[left.index()].next;
                    left_len -= 1;
                }

                if tail.is_some() {
                    nodes[tail.index()].next = take;
                } else {
                    list = take;
                }
                nodes[take.index()].prev = tail;
                tail = take;
            }

            left = right;
        }

        nodes[tail.index()].next = Slot::NONE;

        if merges <= 1 {
            return (list, tail);
        }
        width *= 2;
    }
}
