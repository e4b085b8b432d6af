//! # `cacheskip`
//!
//! An ordered, unique-key map implemented as a skip list whose nodes each
//! occupy exactly one cache line.
//!
//! - Expected O(log n) [`find`](SkipList::find), [`insert`](SkipList::insert)
//!   and [`erase`](SkipList::erase); elements always iterate in sorted order.
//! - The sort [`Direction`] is picked at construction, so two lists can keep
//!   mirror views of one key domain (ascending asks, descending bids).
//! - Every node is one aligned block of [`CACHE_LINE_SIZE`] bytes holding the
//!   key, the value and `N` level links. The layout is checked at compile
//!   time; [`levels_for`] gives the largest `N` for a key/value pair.
//!
//! ## Example
//!
//! ```rust
//! use cacheskip::{levels_for, Direction, SkipList};
//!
//! const LEVELS: usize = levels_for::<i64, u64>();
//!
//! let mut bids: SkipList<i64, u64, LEVELS> = SkipList::new(Direction::Reversed);
//! bids.insert(10_050, 3);
//! bids.insert(10_100, 1);
//! bids.insert(10_000, 8);
//!
//! let prices: Vec<i64> = bids.iter().map(|(p, _)| *p).collect();
//! assert_eq!(prices, vec![10_100, 10_050, 10_000]);
//! assert_eq!(bids.len(), bids.count());
//! ```
//!
//! ## Threading
//!
//! Single mutator. Every mutation takes `&mut self`; shared references only
//! read. There is no internal locking.
//!
//! ## Features
//!
//! - `tracing`: emit structural events through the `tracing` crate.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::inline_always)]

pub mod alloc;
pub mod config;
pub mod dump;
pub mod error;
pub mod height;
pub mod iter;
pub mod list;
pub mod node;

mod prefetch;
mod tracing_helpers;

pub use alloc::{AlignedAllocator, CountingAllocator, NodeAllocator};
pub use config::{Direction, DuplicatePolicy, SkipListConfig};
pub use dump::Dump;
pub use error::{InsertError, InvariantViolation, ParseDirectionError};
pub use height::HeightDistribution;
pub use iter::{IntoIter, Iter};
pub use list::SkipList;
pub use node::{CACHE_LINE_SIZE, levels_for};
