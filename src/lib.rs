//! Order-statistic left-leaning red-black tree map for Rust.
//!
//! This crate provides [`OSRBTreeMap`], an ordered map with an API shaped like the standard
//! library's `BTreeMap`, backed by a left-leaning red-black tree whose nodes cache their
//! subtree sizes. On top of O(log n) insertion, lookup and removal it answers
//! order-statistic queries in O(log n):
//!
//! - [`get_by_rank`](OSRBTreeMap::get_by_rank) / [`select`](OSRBTreeMap::select) - the entry
//!   at a given sorted position
//! - [`rank`](OSRBTreeMap::rank) - how many keys sort before a key
//! - [`floor`](OSRBTreeMap::floor) / [`ceiling`](OSRBTreeMap::ceiling) - the nearest keys
//!   at or below / at or above a probe
//! - [`len_between`](OSRBTreeMap::len_between) - how many keys fall in `[lo, hi]`
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first element
//!
//! # Example
//!
//! ```
//! use osrb_tree::{OSRBTreeMap, Rank};
//!
//! let mut scores = OSRBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard map operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order-statistic operations (O(log n))
//! // Get the median (rank 1 = second element in sorted order)
//! let (name, score) = scores.get_by_rank(1).unwrap();
//! assert_eq!(*name, "Bob"); // Keys are sorted alphabetically
//!
//! // Find the rank of a key
//! assert_eq!(scores.rank_of(&"Carol"), Some(2)); // Carol is third alphabetically
//!
//! // Count the keys in a closed interval
//! assert_eq!(scores.len_between(&"Alice", &"Bob"), 2);
//!
//! // Index by rank
//! assert_eq!(scores[Rank(0)], 100); // Alice's score (first alphabetically)
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) rank operations** - Order-statistic queries via subtree size augmentation
//! - **Arena storage** - Nodes live in one contiguous arena and link to each other by index
//! - **Self-checking** - [`validate`](OSRBTreeMap::validate) reports any broken tree invariant
//!
//! # Logging
//!
//! Structural events are reported through the [`log`](https://docs.rs/log) facade at
//! `trace` level, and failed validations at `debug` level. Nothing is printed unless the
//! application installs a logger.

#![no_std]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod invariant;
mod order_statistic;
mod raw;

pub mod osrbtree_map;

pub use invariant::InvariantViolation;
pub use order_statistic::Rank;
pub use osrbtree_map::OSRBTreeMap;
