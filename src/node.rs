//! Filepath: src/node.rs
//!
//! Cache-line sized skip-list node.
//!
//! A node holds one key, one value and `N` level links. `N` is picked by
//! the user at the type level and is checked at compile time so that a
//! node occupies exactly one cache line (see [`levels_for`]).

use std::mem as StdMem;
use std::ptr::NonNull;

/// Cache line size assumed by the node layout.
pub const CACHE_LINE_SIZE: usize = 64;

/// A level link: either empty or a non-owning reference to another node.
pub(crate) type Link<K, V, const N: usize> = Option<NonNull<Node<K, V, N>>>;

/// Number of level links that fit next to a `K` and a `V` in one cache line.
///
/// Computed as `(CACHE_LINE_SIZE - size_of::<K>() - size_of::<V>()) / size_of::<link>()`,
/// rounded down. Usable in const generic position with concrete types:
///
/// ```rust
/// use cacheskip::{levels_for, SkipList, Direction};
///
/// let list: SkipList<i32, u64, { levels_for::<i32, u64>() }> = SkipList::new(Direction::Natural);
/// assert!(list.is_empty());
/// ```
#[must_use]
pub const fn levels_for<K, V>() -> usize {
    let payload: usize = StdMem::size_of::<K>() + StdMem::size_of::<V>();
    if payload >= CACHE_LINE_SIZE {
        return 0;
    }

    (CACHE_LINE_SIZE - payload) / StdMem::size_of::<*const u8>()
}

/// One skip-list element.
///
/// `links[0]` is the level-0 successor and owns nothing; ownership of every
/// node lies with the list, which walks level 0 to free them.
///
/// # Invariants
/// - `links[l]` is `Some` only if this node is on level `l` and is not the
///   last node there.
/// - A link never points back at its own node.
#[repr(C, align(64))]
pub(crate) struct Node<K, V, const N: usize> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) links: [Link<K, V, N>; N],
}

impl<K, V, const N: usize> Node<K, V, N> {
    /// Evaluated once per instantiation; a failure is a build error.
    pub(crate) const LAYOUT_CHECK: () = {
        assert!(N > 0, "a node needs at least one level link");

        assert!(
            StdMem::size_of::<Self>() == CACHE_LINE_SIZE,
            "node does not fit exactly one cache line; lower N or shrink K/V"
        );

        assert!(StdMem::align_of::<Self>() == CACHE_LINE_SIZE);
    };

    #[inline]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            links: [None; N],
        }
    }

    /// Level-0 successor.
    #[inline(always)]
    pub(crate) const fn next(&self) -> Link<K, V, N> {
        self.links[0]
    }

    /// Number of level-0 hops from this node to `target`.
    ///
    /// An empty target counts the hops to the end of the chain.
    pub(crate) fn distance_to(&self, target: Link<K, V, N>) -> usize {
        let mut hops: usize = 0;
        let mut cursor: Link<K, V, N> = Some(NonNull::from(self));

        while let Some(ptr) = cursor {
            if Some(ptr) == target {
                break;
            }

            // SAFETY: nodes reachable through level 0 are live while the
            // owning list is borrowed.
            cursor = unsafe { ptr.as_ref() }.next();
            hops += 1;
        }

        hops
    }
}
