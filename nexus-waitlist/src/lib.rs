//! Priority-aware FIFO waitlist for parking-space admission.
//!
//! A [`Waitlist`] holds users until a space frees up. Arrival order is kept
//! until the caller asks for a priority reorder; the reorder is a stable
//! merge sort, so users of equal priority never overtake each other.
//!
//! # Design
//!
//! ```text
//! Slab<Node<P>>        - owns entries, stable slot per entry
//! HashMap<id, Slot>    - O(1) presence check and removal by id
//! head/tail + links    - arrival / priority order, O(1) splice
//! ```
//!
//! Entries never move inside the arena. Sorting and removal only rewrite
//! `prev`/`next` links, so the id index stays valid across every operation.
//!
//! # Quick Start
//!
//! ```
//! use nexus_waitlist::{Waitlist, WaitlistError};
//!
//! let mut waitlist: Waitlist<u32> = Waitlist::new();
//!
//! waitlist.enqueue("U1", 3).unwrap();
//! waitlist.enqueue("U2", 2).unwrap();
//! assert_eq!(
//!     waitlist.enqueue("U1", 1),
//!     Err(WaitlistError::DuplicateId("U1".into()))
//! );
//!
//! waitlist.sort_by_priority();
//! assert_eq!(waitlist.front().unwrap().id(), "U2");
//! assert_eq!(waitlist.back().unwrap().id(), "U1");
//!
//! // Promote the head once a space is granted
//! let next = waitlist.pop_front().unwrap();
//! assert_eq!(next.id(), "U2");
//! ```
//!
//! # Operations
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `enqueue` | O(1) | Rejects duplicates and empty ids |
//! | `remove` | O(1) | Head, tail or interior |
//! | `pop_front` | O(1) | Promotion |
//! | `query_position` | O(n) | 1-based, walks from the head |
//! | `sort_by_priority` | O(n log n) | Stable, no allocation |
//!
//! # Reorder Policy
//!
//! By default only an explicit [`Waitlist::sort_by_priority`] changes the
//! order. [`ReorderPolicy::OnEnqueue`] sorts after every successful enqueue
//! instead.
//!
//! # Admission
//!
//! The [`admission`] module wires a waitlist of [`UserClass`] priorities to
//! host-provided authentication, classification and space allocation.

#![warn(missing_docs)]

pub mod admission;
mod class;
mod config;
mod entry;
mod error;
mod slot;
mod sort;
pub mod waitlist;

pub use class::UserClass;
pub use config::{ReorderPolicy, WaitlistConfig};
pub use entry::Entry;
pub use error::WaitlistError;
pub(crate) use slot::Slot;
pub use waitlist::{Iter, Waitlist};
