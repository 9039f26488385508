//! A scapegoat tree map for Rust.
//!
//! This crate provides [`SGTreeMap`], an ordered map backed by a [scapegoat tree]: a binary
//! search tree that stores nothing but keys, values and links in its nodes, and restores
//! balance by occasionally rebuilding a whole subtree into a perfectly balanced one.
//!
//! - Lookups are O(log n) worst case.
//! - Insertions and removals are O(log n) amortized.
//! - The balance factor [`Alpha`] trades lookup depth against rebuild frequency per map.
//! - Ordering comes from a per-map [`Comparator`], so no global state is involved.
//!
//! # Example
//!
//! ```
//! use sgtree::{Alpha, SGTreeMap};
//!
//! let mut scores = SGTreeMap::with_alpha(Alpha::new(0.6).unwrap());
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // The familiar ordered-map operations.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.first_key_value(), Some((&"Alice", &100)));
//!
//! // Positions name entries and let you walk the in-order sequence.
//! let mut position = scores.find(&"Bob");
//! position = scores.next_position(position);
//! assert_eq!(scores.get_at(position), Some((&"Carol", &92)));
//!
//! // Equality is structural: a clone has the same shape as its source.
//! assert_eq!(scores.clone(), scores);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes and values live in slot vectors addressed by compact handles
//! - **Stable positions** - Rebuilds relink nodes in place, so a [`Position`] stays valid until
//!   its own entry is removed
//!
//! [scapegoat tree]: https://en.wikipedia.org/wiki/Scapegoat_tree

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: `IterMut` needs unsafe code to hand out disjoint `&mut V` from one arena.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod alpha;
mod comparator;
mod raw;

pub mod sgtree_map;

pub use alpha::{Alpha, AlphaError};
pub use comparator::{Comparator, OrdComparator};
pub use sgtree_map::{NodeId, Position, SGTreeMap};
