//! Human-readable structure dump.
//!
//! One entry per node: address, key, value, and for every level the number
//! of level-0 hops its link skips (hops to the end of the list for an empty
//! link).
//!
//! ```text
//! [natural, size=3, head=0x...:
//!  [0x...: 1 -> 10 [1, 1, 1]]
//!  [0x...: 2 -> 20 [1, 2, 2]]
//!  [0x...: 3 -> 30 [1, 1, 1]]]
//! ```

use std::fmt as StdFmt;
use std::ptr::NonNull;

use crate::alloc::NodeAllocator;
use crate::list::SkipList;
use crate::node::{Link, Node};

/// Display adapter returned by [`SkipList::dump`].
pub struct Dump<'a, K, V, const N: usize, A: NodeAllocator> {
    list: &'a SkipList<K, V, N, A>,
    separator: &'a str,
    limit: usize,
}

impl<'a, K, V, const N: usize, A: NodeAllocator> Dump<'a, K, V, N, A> {
    pub(crate) const fn new(list: &'a SkipList<K, V, N, A>) -> Self {
        Self {
            list,
            separator: ", ",
            limit: usize::MAX,
        }
    }

    /// Text printed before every node (default `", "`).
    #[must_use]
    pub const fn separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    /// Print at most `limit` nodes, then `...`.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl<K, V, const N: usize, A> StdFmt::Display for Dump<'_, K, V, N, A>
where
    K: StdFmt::Debug,
    V: StdFmt::Debug,
    A: NodeAllocator,
{
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        let head: Link<K, V, N> = self.list.head_link();

        write!(
            f,
            "[{}, size={}, head={:p}:",
            self.list.direction(),
            self.list.len(),
            head.map_or(std::ptr::null(), |p| p.as_ptr().cast_const()),
        )?;

        let mut cursor: Link<K, V, N> = head;
        let mut printed: usize = 0;

        while let Some(ptr) = cursor {
            if printed >= self.limit {
                write!(f, "{}...", self.separator)?;
                break;
            }

            // SAFETY: the list is borrowed for the dump's lifetime.
            let node: &Node<K, V, N> = unsafe { ptr.as_ref() };
            write!(f, "{}", self.separator)?;
            write_node(f, ptr, node)?;

            cursor = node.next();
            printed += 1;
        }

        write!(f, "]")
    }
}

fn write_node<K, V, const N: usize>(
    f: &mut StdFmt::Formatter<'_>,
    ptr: NonNull<Node<K, V, N>>,
    node: &Node<K, V, N>,
) -> StdFmt::Result
where
    K: StdFmt::Debug,
    V: StdFmt::Debug,
{
    write!(f, "[{:p}: {:?} -> {:?}", ptr.as_ptr(), node.key, node.value)?;

    let mut sep: &str = " [";
    for link in &node.links {
        write!(f, "{sep}{}", node.distance_to(*link))?;
        sep = ", ";
    }

    write!(f, "]]")
}
