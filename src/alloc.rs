//! Aligned block allocation for skip-list nodes.
//!
//! Two layers:
//!
//! - [`allocate`] / [`deallocate`]: stateless functions over the global
//!   allocator that hand out blocks whose start address is a multiple of a
//!   requested power-of-two alignment. No pooling, no reuse cache.
//! - [`NodeAllocator`]: the seam the list allocates through, one block per
//!   node. [`AlignedAllocator`] is the default; [`CountingAllocator`] adds
//!   bookkeeping for tests and benchmarks.

use std::alloc::{self as StdAlloc, Layout};
use std::mem as StdMem;
use std::ptr::NonNull;

/// Allocate `size` bytes aligned to `align`.
///
/// Returns `None` when `size` is zero, when `align` is not a power of two
/// or is smaller than a pointer, or when the system allocator is out of
/// memory.
#[must_use]
pub fn allocate(align: usize, size: usize) -> Option<NonNull<u8>> {
    let layout: Layout = block_layout(align, size)?;

    // SAFETY: `block_layout` rejects zero-sized layouts.
    NonNull::new(unsafe { StdAlloc::alloc(layout) })
}

/// Release a block returned by [`allocate`].
///
/// # Safety
///
/// - `ptr` must come from [`allocate`] called with the same `align` and `size`.
/// - The block must not have been released already.
///
/// No bookkeeping catches misuse.
pub unsafe fn deallocate(ptr: NonNull<u8>, align: usize, size: usize) {
    let Some(layout) = block_layout(align, size) else {
        debug_assert!(false, "deallocate: layout was never allocatable");
        return;
    };

    // SAFETY: guaranteed by the caller.
    unsafe { StdAlloc::dealloc(ptr.as_ptr(), layout) }
}

#[inline]
fn block_layout(align: usize, size: usize) -> Option<Layout> {
    if size == 0 || align < StdMem::size_of::<*const u8>() {
        return None;
    }

    // Also rejects non power-of-two alignments.
    Layout::from_size_align(size, align).ok()
}

/// Allocator for fixed-layout node blocks.
///
/// # Safety
///
/// Implementations must return blocks that satisfy the requested layout and
/// stay valid until passed back to [`NodeAllocator::deallocate`].
pub unsafe trait NodeAllocator {
    /// Allocate one block for `layout`, or `None` if memory is exhausted.
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator with
    /// the same `layout`, and must not be released twice.
    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout);
}

/// Stateless node allocator backed by [`allocate`] / [`deallocate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlignedAllocator;

// SAFETY: `allocate` returns blocks with the requested size and alignment.
unsafe impl NodeAllocator for AlignedAllocator {
    #[inline]
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        allocate(layout.align(), layout.size())
    }

    #[inline]
    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { deallocate(ptr, layout.align(), layout.size()) }
    }
}

/// Node allocator that counts the blocks it hands out and takes back.
///
/// # Example
///
/// ```rust
/// use cacheskip::{CountingAllocator, Direction, SkipList, SkipListConfig};
///
/// let mut list: SkipList<u32, u32, 6, CountingAllocator> =
///     SkipList::with_allocator(SkipListConfig::new(Direction::Natural), CountingAllocator::new());
///
/// assert!(list.insert(1, 10));
/// assert!(!list.insert(1, 11));
/// assert_eq!(list.allocator().allocations(), 1);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountingAllocator {
    inner: AlignedAllocator,
    allocations: usize,
    deallocations: usize,
}

impl CountingAllocator {
    /// Create a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: AlignedAllocator,
            allocations: 0,
            deallocations: 0,
        }
    }

    /// Blocks handed out so far.
    #[inline]
    #[must_use]
    pub const fn allocations(&self) -> usize {
        self.allocations
    }

    /// Blocks released so far.
    #[inline]
    #[must_use]
    pub const fn deallocations(&self) -> usize {
        self.deallocations
    }

    /// Blocks currently outstanding.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> usize {
        self.allocations - self.deallocations
    }
}

// SAFETY: delegates to `AlignedAllocator`.
unsafe impl NodeAllocator for CountingAllocator {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        let block: NonNull<u8> = self.inner.allocate(layout)?;
        self.allocations += 1;
        Some(block)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations += 1;

        // SAFETY: forwarded caller contract.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

// ============================================================================
//  Tests
// ============================================================================
