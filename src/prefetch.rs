//! Software prefetch hint for search descent.
//!
//! While a search compares the key of the node it just reached, the CPU can
//! already be loading the node that link points to on the same level.
//!
//! Only `x86_64` issues a real hint (`_mm_prefetch`, `_MM_HINT_T0`); the
//! aarch64 intrinsic is not stable yet, so every other target is a no-op.

/// Hint that the cache line at `ptr` will be read soon.
///
/// Safe for null or dangling pointers: a prefetch never faults.
#[inline(always)]
pub(crate) fn prefetch_read<T>(ptr: *const T) {
    if ptr.is_null() {
        return;
    }

    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: prefetch is a hint and does not dereference.
        unsafe {
            std::arch::x86_64::_mm_prefetch(ptr.cast::<i8>(), std::arch::x86_64::_MM_HINT_T0);
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = ptr;
    }
}
