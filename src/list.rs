//! Filepath: src/list.rs
//!
//! [`SkipList`] - an ordered unique-key map over cache-line nodes.
//!
//! # Structure
//!
//! The head is a real element: the one with the extremal key for the
//! configured [`Direction`]. It is on every level. Level 0 chains every
//! element in order; level `l > 0` is an ordered sub-chain of level `l - 1`.
//!
//! ```text
//! level 2:  [1] ------------------------> [9]
//! level 1:  [1] --------> [4] ----------> [9]
//! level 0:  [1] -> [2] -> [4] -> [7] ---> [9]
//! ```
//!
//! Once two or more elements are present every head link is populated, so a
//! search can always start at the top level. Erase keeps that true by
//! promoting the head's next-lower successor when a level would otherwise
//! empty out.

use std::alloc::{self as StdAlloc, Layout};
use std::collections::HashMap;
use std::fmt as StdFmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::alloc::{AlignedAllocator, NodeAllocator};
use crate::config::{Direction, SkipListConfig};
use crate::dump::Dump;
use crate::error::{InsertError, InvariantViolation};
use crate::height::{HeightDistribution, HeightSampler};
use crate::iter::Iter;
use crate::node::{Link, Node};
use crate::prefetch::prefetch_read;
use crate::tracing_helpers::{debug_log, trace_log, warn_log};

/// Predecessor of the search key on each level. Every entry starts at the head.
type Path<K, V, const N: usize> = [NonNull<Node<K, V, N>>; N];

/// An ordered map whose nodes each fill one cache line.
///
/// # Type Parameters
///
/// * `K` - key type, totally ordered
/// * `V` - value type
/// * `N` - level links per node; the node must fit one cache line, which is
///   checked at compile time. [`levels_for`](crate::levels_for) gives the
///   largest `N` for a `K`/`V` pair.
/// * `A` - node allocator, [`AlignedAllocator`] by default
///
/// # Example
///
/// ```rust
/// use cacheskip::{Direction, SkipList};
///
/// let mut asks: SkipList<i32, u64, 6> = SkipList::new(Direction::Natural);
/// let mut bids: SkipList<i32, u64, 6> = SkipList::new(Direction::Reversed);
///
/// for (price, qty) in [(101, 5), (99, 7), (100, 2)] {
///     assert!(asks.insert(price, qty));
///     assert!(bids.insert(price, qty));
/// }
///
/// assert_eq!(asks.first(), Some((&99, &7)));
/// assert_eq!(bids.first(), Some((&101, &5)));
/// assert_eq!(asks.erase(&100), Some(2));
/// assert!(!asks.contains(&100));
/// ```
pub struct SkipList<K, V, const N: usize, A: NodeAllocator = AlignedAllocator> {
    /// Extremal element, or `None` when empty.
    head: Link<K, V, N>,

    /// Maintained element count.
    len: usize,

    config: SkipListConfig,

    heights: HeightSampler,

    alloc: A,

    /// The list owns its nodes.
    _owns: PhantomData<Box<Node<K, V, N>>>,
}

// SAFETY: nodes are owned exclusively by one list and never shared between
// lists, so moving the list moves ownership of every `K` and `V`.
unsafe impl<K: Send, V: Send, const N: usize, A: NodeAllocator + Send> Send
    for SkipList<K, V, N, A>
{
}

// SAFETY: `&SkipList` only permits reads; every link mutation needs `&mut`.
unsafe impl<K: Sync, V: Sync, const N: usize, A: NodeAllocator + Sync> Sync
    for SkipList<K, V, N, A>
{
}

// ============================================================================
//  Construction
// ============================================================================

impl<K: Ord, V, const N: usize> SkipList<K, V, N> {
    /// Create an empty list with default options and the given direction.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self::with_config(SkipListConfig::new(direction))
    }

    /// Create an empty list with explicit options.
    #[must_use]
    pub fn with_config(config: SkipListConfig) -> Self {
        Self::with_allocator(config, AlignedAllocator)
    }
}

impl<K: Ord, V, const N: usize> Default for SkipList<K, V, N> {
    fn default() -> Self {
        Self::new(Direction::Natural)
    }
}

impl<K: Ord, V, const N: usize, A: NodeAllocator> SkipList<K, V, N, A> {
    /// Create an empty list that allocates nodes through `alloc`.
    #[must_use]
    pub fn with_allocator(config: SkipListConfig, alloc: A) -> Self {
        // Fails the build if a node is not exactly one cache line.
        let () = Node::<K, V, N>::LAYOUT_CHECK;

        Self {
            head: None,
            len: 0,
            config,
            heights: HeightSampler::new(config.height, config.seed),
            alloc,
            _owns: PhantomData,
        }
    }
}

// ============================================================================
//  Accessors (no ordering required)
// ============================================================================

impl<K, V, const N: usize, A: NodeAllocator> SkipList<K, V, N, A> {
    const NODE_LAYOUT: Layout = Layout::new::<Node<K, V, N>>();

    /// Number of elements. O(1).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Same as [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.len
    }

    /// `true` if the list holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Same as [`is_empty`](Self::is_empty).
    #[inline]
    #[must_use]
    pub const fn empty(&self) -> bool {
        self.is_empty()
    }

    /// Number of elements recounted by walking level 0. O(n).
    ///
    /// Always equal to [`len`](Self::len); exists to validate it.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().fold(0, |n, _| n + 1)
    }

    /// Options the list was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SkipListConfig {
        &self.config
    }

    /// Sort direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.config.direction
    }

    /// Active height distribution.
    #[inline]
    #[must_use]
    pub const fn height_distribution(&self) -> HeightDistribution {
        self.heights.distribution()
    }

    /// The node allocator.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Maximum node height (`N`).
    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> usize {
        N
    }

    #[inline(always)]
    pub(crate) const fn head_link(&self) -> Link<K, V, N> {
        self.head
    }

    /// First element in sort order.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        let head: NonNull<Node<K, V, N>> = self.head?;

        // SAFETY: the head is live while `self` is borrowed.
        let node: &Node<K, V, N> = unsafe { head.as_ref() };
        Some((&node.key, &node.value))
    }

    /// Last element in sort order. Expected O(log n).
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut cursor: NonNull<Node<K, V, N>> = self.head?;

        for level in (0..N).rev() {
            // SAFETY: every node reachable from the head is live.
            while let Some(next) = unsafe { cursor.as_ref() }.links[level] {
                cursor = next;
            }
        }

        // SAFETY: as above.
        let node: &Node<K, V, N> = unsafe { cursor.as_ref() };
        Some((&node.key, &node.value))
    }

    /// Iterate over `(key, value)` pairs in sort order.
    ///
    /// The borrow keeps the list immutable until the iterator is dropped.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, N> {
        Iter::new(self.head, self.len)
    }

    /// Copy every element into a vector, in sort order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Number of nodes reachable on `level`, head included.
    ///
    /// Returns 0 for an empty list or a level at or above `N`.
    #[must_use]
    pub fn level_len(&self, level: usize) -> usize {
        if level >= N {
            return 0;
        }

        let mut count: usize = 0;
        let mut cursor: Link<K, V, N> = self.head;
        while let Some(ptr) = cursor {
            count += 1;

            // SAFETY: every node reachable from the head is live.
            cursor = unsafe { ptr.as_ref() }.links[level];
        }

        count
    }

    /// Human-readable rendering of every node and its link distances.
    #[must_use]
    pub fn dump(&self) -> Dump<'_, K, V, N, A> {
        Dump::new(self)
    }

    /// Remove every element, freeing each node exactly once.
    pub fn clear(&mut self) {
        debug_log!(len = self.len, "clearing skip list");

        let mut cursor: Link<K, V, N> = self.head.take();
        self.len = 0;

        while let Some(ptr) = cursor {
            // SAFETY: `ptr` is reachable on level 0 and has not been freed;
            // the successor is read before the node is released.
            cursor = unsafe { ptr.as_ref() }.next();

            // SAFETY: the chain is detached from `self.head`, so each node is
            // freed once.
            drop(unsafe { self.free_node(ptr) });
        }
    }

    /// Remove and return the first element in sort order.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let head: NonNull<Node<K, V, N>> = self.head?;

        // SAFETY: `head` is the live head of this list.
        Some(unsafe { self.unlink_head(head) })
    }

    /// Allocate and initialise a node with no links.
    fn alloc_node(&mut self, key: K, value: V) -> Result<NonNull<Node<K, V, N>>, InsertError> {
        let layout: Layout = Self::NODE_LAYOUT;

        let Some(block) = self.alloc.allocate(layout) else {
            warn_log!(size = layout.size(), align = layout.align(), "node allocation failed");

            return Err(InsertError::AllocationFailed {
                size: layout.size(),
                align: layout.align(),
            });
        };

        let ptr: NonNull<Node<K, V, N>> = block.cast();

        // SAFETY: the block is fresh, sized and aligned for one node.
        unsafe { ptr.as_ptr().write(Node::new(key, value)) };
        Ok(ptr)
    }

    /// Move the key and value out of a node and release its block.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `alloc_node` on this list, must not be reachable
    /// any more (or about to be discarded with the whole chain), and must
    /// not be freed twice.
    unsafe fn free_node(&mut self, ptr: NonNull<Node<K, V, N>>) -> (K, V) {
        // SAFETY: caller guarantees a live, uniquely owned node.
        let node: Node<K, V, N> = unsafe { ptr.as_ptr().read() };

        // SAFETY: same allocator and layout as `alloc_node`.
        unsafe { self.alloc.deallocate(ptr.cast(), Self::NODE_LAYOUT) };

        (node.key, node.value)
    }

    /// Remove the head and hand its levels to the new head.
    ///
    /// For each level above 0 where the new head has no link, it takes the
    /// old head's link there. If that link is the new head itself, it takes
    /// its own link from the level below instead.
    ///
    /// # Safety
    ///
    /// `head` must be `self.head`.
    unsafe fn unlink_head(&mut self, head: NonNull<Node<K, V, N>>) -> (K, V) {
        let old: *mut Node<K, V, N> = head.as_ptr();

        // SAFETY: `old` is the live head; `successor` is live on level 0.
        unsafe {
            self.head = (*old).links[0];

            if let Some(successor) = self.head {
                let new: *mut Node<K, V, N> = successor.as_ptr();

                for level in 1..N {
                    if (*new).links[level].is_some() {
                        continue;
                    }

                    let carried: Link<K, V, N> = (*old).links[level];
                    (*new).links[level] = if carried == Some(successor) {
                        (*new).links[level - 1]
                    } else {
                        carried
                    };
                }
            }
        }

        trace_log!(len = self.len, "head removed");
        self.len -= 1;

        // SAFETY: nothing links to the old head any more.
        unsafe { self.free_node(head) }
    }
}

// ============================================================================
//  Search, insert, erase
// ============================================================================

impl<K: Ord, V, const N: usize, A: NodeAllocator> SkipList<K, V, N, A> {
    /// Look up `key`. Expected O(log n).
    ///
    /// The reference lives as long as the shared borrow of the list, so no
    /// erase or clear can run while it is held.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&V> {
        let ptr: NonNull<Node<K, V, N>> = self.find_node(key)?;

        // SAFETY: found nodes are live while `self` is borrowed.
        Some(&unsafe { ptr.as_ref() }.value)
    }

    /// `true` if `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Insert `key` with `value`.
    ///
    /// Returns `false` and leaves the list untouched if the key is present
    /// and duplicates are rejected.
    ///
    /// # Panics
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the node
    /// allocator is out of memory. Use [`try_insert`](Self::try_insert) to
    /// get the failure back instead.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.try_insert(key, value) {
            Ok(()) => true,

            Err(InsertError::DuplicateKey) => false,

            Err(InsertError::AllocationFailed { .. }) => {
                StdAlloc::handle_alloc_error(Self::NODE_LAYOUT)
            }
        }
    }

    /// Insert `key` with `value`, reporting why nothing was added.
    ///
    /// Allocates exactly one node on success and none on failure.
    ///
    /// # Errors
    ///
    /// - [`InsertError::DuplicateKey`] if the key is present and duplicates
    ///   are rejected.
    /// - [`InsertError::AllocationFailed`] if the allocator returned no block.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), InsertError> {
        let Some(head) = self.head else {
            let node: NonNull<Node<K, V, N>> = self.alloc_node(key, value)?;
            self.head = Some(node);
            self.len = 1;
            return Ok(());
        };

        let direction: Direction = self.config.direction;
        let allow_duplicates: bool = self.config.allow_duplicates();

        // SAFETY: the head is live.
        let head_key: &K = &unsafe { head.as_ref() }.key;

        if !allow_duplicates && *head_key == key {
            return Err(InsertError::DuplicateKey);
        }

        if direction.before(&key, head_key) {
            return self.insert_head(head, key, value);
        }

        let path: Path<K, V, N> = self.search_path(head, &key);

        if !allow_duplicates {
            // SAFETY: path entries and their successors are live.
            if let Some(next) = unsafe { path[0].as_ref() }.next() {
                if unsafe { next.as_ref() }.key == key {
                    return Err(InsertError::DuplicateKey);
                }
            }
        }

        // A head alone on the top level has only one element to point at;
        // the second element must cover every level.
        // SAFETY: the head is live.
        let height: usize = if unsafe { head.as_ref() }.links[N - 1].is_none() {
            N
        } else {
            self.heights.draw(N)
        };

        let node: NonNull<Node<K, V, N>> = self.alloc_node(key, value)?;

        for (level, pred) in path.iter().enumerate().take(height) {
            // SAFETY: `pred` is a live node on `level` and `node` is fresh.
            unsafe {
                let pred: *mut Node<K, V, N> = pred.as_ptr();
                (*node.as_ptr()).links[level] = (*pred).links[level];
                (*pred).links[level] = Some(node);
            }
        }

        self.len += 1;
        Ok(())
    }

    /// Remove `key` and return its value, or `None` if it is absent.
    ///
    /// Releases exactly the removed node.
    pub fn erase(&mut self, key: &K) -> Option<V> {
        self.erase_entry(key).map(|(_, value)| value)
    }

    /// Remove `key` and return the stored key and value.
    pub fn erase_entry(&mut self, key: &K) -> Option<(K, V)> {
        let head: NonNull<Node<K, V, N>> = self.head?;
        let direction: Direction = self.config.direction;

        // SAFETY: the head is live.
        let head_key: &K = &unsafe { head.as_ref() }.key;

        if *head_key == *key {
            // SAFETY: `head` is `self.head`.
            return Some(unsafe { self.unlink_head(head) });
        }

        if direction.before(key, head_key) {
            return None;
        }

        let path: Path<K, V, N> = self.search_path(head, key);

        // SAFETY: path entries and their successors are live.
        let target: NonNull<Node<K, V, N>> = unsafe { path[0].as_ref() }.next()?;
        if unsafe { target.as_ref() }.key != *key {
            return None;
        }

        for (level, pred_ptr) in path.iter().copied().enumerate() {
            // SAFETY: `pred` and `target` are live, distinct nodes; levels
            // are patched bottom-up so `level - 1` is already final.
            unsafe {
                let pred: *mut Node<K, V, N> = pred_ptr.as_ptr();
                if (*pred).links[level] != Some(target) {
                    continue;
                }

                let mut replacement: Link<K, V, N> = (*target.as_ptr()).links[level];

                if replacement == Some(pred_ptr) {
                    warn_log!(link_level = level, "erase: refusing self link");
                    replacement = (*pred).links[level.saturating_sub(1)];
                } else if replacement.is_none() && level > 0 && pred_ptr == head {
                    // Level would be left with only the head.
                    debug_log!(link_level = level, "erase: promoting head successor");
                    replacement = (*pred).links[level - 1];
                }

                (*pred).links[level] = replacement;
            }
        }

        self.len -= 1;

        // SAFETY: every link to `target` was rewritten above.
        Some(unsafe { self.free_node(target) })
    }

    /// New element sorts before the head: it becomes the head.
    ///
    /// The old head keeps a freshly drawn height; on the levels above it,
    /// its links move to the new head.
    fn insert_head(
        &mut self,
        old_head: NonNull<Node<K, V, N>>,
        key: K,
        value: V,
    ) -> Result<(), InsertError> {
        let node: NonNull<Node<K, V, N>> = self.alloc_node(key, value)?;
        let kept: usize = self.heights.draw(N);

        // SAFETY: `node` is fresh and `old_head` is live.
        unsafe {
            let new: *mut Node<K, V, N> = node.as_ptr();
            let old: *mut Node<K, V, N> = old_head.as_ptr();

            for level in 0..N {
                (*new).links[level] = if level < kept || (*old).links[level].is_none() {
                    Some(old_head)
                } else {
                    (*old).links[level].take()
                };
            }
        }

        trace_log!(kept, "new head");
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Head-first descent to the last node strictly before `key` on every level.
    fn search_path(&self, head: NonNull<Node<K, V, N>>, key: &K) -> Path<K, V, N> {
        let direction: Direction = self.config.direction;
        let mut path: Path<K, V, N> = [head; N];
        let mut cursor: NonNull<Node<K, V, N>> = head;

        for level in (0..N).rev() {
            cursor = Self::advance(direction, cursor, level, key);
            path[level] = cursor;
        }

        path
    }

    fn find_node(&self, key: &K) -> Link<K, V, N> {
        let head: NonNull<Node<K, V, N>> = self.head?;
        let direction: Direction = self.config.direction;

        // SAFETY: the head is live.
        let head_key: &K = &unsafe { head.as_ref() }.key;
        if *head_key == *key {
            return Some(head);
        }

        if direction.before(key, head_key) {
            return None;
        }

        let mut cursor: NonNull<Node<K, V, N>> = head;
        for level in (0..N).rev() {
            cursor = Self::advance(direction, cursor, level, key);
        }

        // SAFETY: `cursor` and its successor are live.
        let next: NonNull<Node<K, V, N>> = unsafe { cursor.as_ref() }.next()?;
        (unsafe { next.as_ref() }.key == *key).then_some(next)
    }

    /// Walk `level` from `cursor` while the next key sorts before `key`.
    #[inline(always)]
    fn advance(
        direction: Direction,
        mut cursor: NonNull<Node<K, V, N>>,
        level: usize,
        key: &K,
    ) -> NonNull<Node<K, V, N>> {
        // SAFETY: every node reachable from the head is live.
        while let Some(next) = unsafe { cursor.as_ref() }.links[level] {
            // SAFETY: as above.
            let next_node: &Node<K, V, N> = unsafe { next.as_ref() };
            prefetch_read(next_node.links[level].map_or(std::ptr::null(), |p| p.as_ptr().cast_const()));

            if !direction.before(&next_node.key, key) {
                break;
            }

            cursor = next;
        }

        cursor
    }

    /// Walk every level independently and verify the structure.
    ///
    /// Checks level-0 order, that each level is an ordered subsequence of
    /// the level below, that no link points at its own node or at a node
    /// outside the list, that the head is linked on every level once two
    /// elements exist, and that `len() == count()`.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let direction: Direction = self.config.direction;
        let allow_duplicates: bool = self.config.allow_duplicates();

        // Level 0, bounded so a cycle cannot spin forever.
        let mut chain: Vec<NonNull<Node<K, V, N>>> = Vec::with_capacity(self.len);
        let mut cursor: Link<K, V, N> = self.head;
        while let Some(ptr) = cursor {
            if chain.len() > self.len {
                return Err(InvariantViolation::LengthDrift {
                    size: self.len,
                    count: chain.len(),
                });
            }

            chain.push(ptr);

            // SAFETY: reachable nodes are live.
            cursor = unsafe { ptr.as_ref() }.next();
        }

        if chain.len() != self.len {
            return Err(InvariantViolation::LengthDrift {
                size: self.len,
                count: chain.len(),
            });
        }

        let positions: HashMap<NonNull<Node<K, V, N>>, usize> =
            chain.iter().enumerate().map(|(pos, ptr)| (*ptr, pos)).collect();

        for (pos, pair) in chain.windows(2).enumerate() {
            // SAFETY: reachable nodes are live.
            let (a, b) = unsafe { (&pair[0].as_ref().key, &pair[1].as_ref().key) };

            let ordered: bool = if allow_duplicates {
                !direction.before(b, a)
            } else {
                direction.before(a, b)
            };

            if !ordered {
                return Err(InvariantViolation::Unordered {
                    level: 0,
                    position: pos + 1,
                });
            }
        }

        for (pos, ptr) in chain.iter().enumerate() {
            // SAFETY: reachable nodes are live.
            let node: &Node<K, V, N> = unsafe { ptr.as_ref() };

            if let Some(level) = node.links.iter().position(|link| *link == Some(*ptr)) {
                return Err(InvariantViolation::SelfLink {
                    level,
                    position: pos,
                });
            }
        }

        let mut below: Vec<bool> = vec![true; chain.len()];
        for level in 1..N {
            let mut members: Vec<bool> = vec![false; chain.len()];
            let Some(head) = self.head else {
                break;
            };

            members[0] = true;
            let mut last: usize = 0;
            let mut cursor: NonNull<Node<K, V, N>> = head;

            // SAFETY: every followed link is checked against `positions`
            // before it is dereferenced.
            while let Some(next) = unsafe { cursor.as_ref() }.links[level] {
                let Some(&pos) = positions.get(&next) else {
                    return Err(InvariantViolation::Dangling { level });
                };

                if pos <= last {
                    return Err(InvariantViolation::Unordered {
                        level,
                        position: pos,
                    });
                }

                if !below[pos] {
                    return Err(InvariantViolation::NotSubsequence { level });
                }

                members[pos] = true;
                last = pos;
                cursor = next;
            }

            for (pos, ptr) in chain.iter().enumerate() {
                // SAFETY: reachable nodes are live.
                if !members[pos] && unsafe { ptr.as_ref() }.links[level].is_some() {
                    return Err(InvariantViolation::StaleLink {
                        level,
                        position: pos,
                    });
                }
            }

            below = members;
        }

        if self.len >= 2 {
            if let Some(head) = self.head {
                // SAFETY: the head is live.
                let links = &unsafe { head.as_ref() }.links;
                if let Some(level) = links.iter().position(Option::is_none) {
                    return Err(InvariantViolation::HeadGap { level });
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
//  Trait impls
// ============================================================================

impl<K, V, const N: usize, A: NodeAllocator> Drop for SkipList<K, V, N, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, const N: usize, A> Clone for SkipList<K, V, N, A>
where
    K: Ord + Clone,
    V: Clone,
    A: NodeAllocator + Default,
{
    /// Deep copy: every node is duplicated into a fresh allocator, in the
    /// same order, so equal keys keep their relative order.
    fn clone(&self) -> Self {
        let mut out: Self = Self::with_allocator(self.config, A::default());
        out.heights = self.heights.clone();

        let mut tails: [Link<K, V, N>; N] = [None; N];
        for (key, value) in self {
            let node: NonNull<Node<K, V, N>> = match out.alloc_node(key.clone(), value.clone()) {
                Ok(node) => node,
                Err(_) => StdAlloc::handle_alloc_error(Self::NODE_LAYOUT),
            };

            let height: usize = match out.len {
                0 => {
                    out.head = Some(node);
                    0
                }
                1 => N,
                _ => out.heights.draw(N),
            };

            for (level, tail) in tails.iter_mut().enumerate() {
                if out.len == 0 {
                    *tail = Some(node);
                    continue;
                }

                if level < height {
                    if let Some(prev) = *tail {
                        // SAFETY: `prev` is the live last node on `level`.
                        unsafe { (*prev.as_ptr()).links[level] = Some(node) };
                    }
                    *tail = Some(node);
                }
            }

            out.len += 1;
        }

        out
    }
}

impl<K: StdFmt::Debug, V: StdFmt::Debug, const N: usize, A: NodeAllocator> StdFmt::Debug
    for SkipList<K, V, N, A>
{
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V, const N: usize, A: NodeAllocator> Extend<(K, V)> for SkipList<K, V, N, A> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> FromIterator<(K, V)> for SkipList<K, V, N> {
    /// Natural direction; later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list: Self = Self::new(Direction::Natural);
        list.extend(iter);
        list
    }
}

// ============================================================================
//  Tests
// ============================================================================
