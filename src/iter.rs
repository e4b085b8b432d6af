//! Iterators over a [`SkipList`].
//!
//! [`Iter`] borrows the list, so no insert or erase can happen while it is
//! alive. [`IntoIter`] owns the list and frees nodes as it yields them.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::alloc::NodeAllocator;
use crate::list::SkipList;
use crate::node::{Link, Node};

/// Borrowing iterator in sort order. Created by [`SkipList::iter`].
pub struct Iter<'a, K, V, const N: usize> {
    cursor: Link<K, V, N>,
    remaining: usize,
    _marker: PhantomData<&'a Node<K, V, N>>,
}

impl<K, V, const N: usize> Iter<'_, K, V, N> {
    pub(crate) const fn new(head: Link<K, V, N>, len: usize) -> Self {
        Self {
            cursor: head,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, K, V, const N: usize> Iterator for Iter<'a, K, V, N> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let ptr: NonNull<Node<K, V, N>> = self.cursor?;

        // SAFETY: the list is borrowed for 'a, so every node on level 0 is
        // live and unmodified for 'a.
        let node: &'a Node<K, V, N> = unsafe { &*ptr.as_ptr() };

        self.cursor = node.next();
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, const N: usize> ExactSizeIterator for Iter<'_, K, V, N> {}

impl<K, V, const N: usize> FusedIterator for Iter<'_, K, V, N> {}

impl<K, V, const N: usize> Clone for Iter<'_, K, V, N> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

// SAFETY: `Iter` only hands out shared references.
unsafe impl<K: Sync, V: Sync, const N: usize> Send for Iter<'_, K, V, N> {}

// SAFETY: as above.
unsafe impl<K: Sync, V: Sync, const N: usize> Sync for Iter<'_, K, V, N> {}

impl<'a, K, V, const N: usize, A: NodeAllocator> IntoIterator for &'a SkipList<K, V, N, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator in sort order.
///
/// Each element's node is released as it is yielded; whatever is left is
/// released when the iterator drops.
pub struct IntoIter<K, V, const N: usize, A: NodeAllocator> {
    list: SkipList<K, V, N, A>,
}

impl<K, V, const N: usize, A: NodeAllocator> Iterator for IntoIter<K, V, N, A> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_first()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<K, V, const N: usize, A: NodeAllocator> ExactSizeIterator for IntoIter<K, V, N, A> {}

impl<K, V, const N: usize, A: NodeAllocator> FusedIterator for IntoIter<K, V, N, A> {}

impl<K, V, const N: usize, A: NodeAllocator> IntoIterator for SkipList<K, V, N, A> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, N, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}
