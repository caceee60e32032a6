// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An implementation of `GlobalAlloc` that tracks memory usage.

use monos_core::memory::{
    BYTES_ALLOCATED_LIFETIME, BYTES_DEALLOCATED_LIFETIME, CURRENTLY_ALLOCATED_BYTES,
    PEAK_ALLOCATED_BYTES, TOTAL_ALLOCATIONS, TOTAL_DEALLOCATIONS, TOTAL_REALLOCATIONS,
};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::Ordering;

/// A wrapper around a `GlobalAlloc` implementation (like
/// `std::alloc::System`) that intercepts allocation calls to update the
/// global byte counters defined in `monos_core::memory`.
///
/// Registering it as the `#[global_allocator]` makes every heap allocation
/// in the process visible to the accounting, which is how the
/// exactly-once-release guarantee of `UniqueHandle` becomes observable in
/// integration tests and telemetry.
///
/// # Type Parameters
///
/// * `A`: The underlying allocator that performs the actual memory
///   operations. Defaults to `System`.
///
/// # Usage
///
/// ```rust,ignore
/// use monos_alloc::TrackingAllocator;
///
/// #[global_allocator]
/// static GLOBAL: TrackingAllocator = TrackingAllocator::new(std::alloc::System);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl<A> TrackingAllocator<A> {
    /// Creates a new tracking allocator that wraps the given inner
    /// allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

/// Credits `size` freshly allocated bytes to the counters.
fn record_allocated(size: usize) {
    let result = CURRENTLY_ALLOCATED_BYTES.fetch_update(
        Ordering::Relaxed,
        Ordering::Relaxed,
        |current| current.checked_add(size),
    );

    match result {
        Ok(previous) => {
            PEAK_ALLOCATED_BYTES.fetch_max((previous + size) as u64, Ordering::Relaxed);
            BYTES_ALLOCATED_LIFETIME.fetch_add(size as u64, Ordering::Relaxed);
        }
        Err(_) => log::error!("Memory tracking counter overflowed during alloc! Size: {size}"),
    }
}

/// Debits `size` freed bytes from the counters.
fn record_deallocated(size: usize) {
    let result = CURRENTLY_ALLOCATED_BYTES.fetch_update(
        Ordering::Relaxed,
        Ordering::Relaxed,
        |current| current.checked_sub(size),
    );

    if result.is_err() {
        log::error!("Memory tracking counter underflowed during dealloc! Size: {size}");
    } else {
        BYTES_DEALLOCATED_LIFETIME.fetch_add(size as u64, Ordering::Relaxed);
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    /// Allocates memory and updates tracking counters.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it is part of the `GlobalAlloc`
    /// trait. The caller must ensure that `layout` has a non-zero size.
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            record_allocated(layout.size());
        }
        ptr
    }

    /// Allocates zero-initialized memory and updates tracking counters.
    ///
    /// # Safety
    ///
    /// This function is unsafe for the same reasons as `alloc`.
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
            record_allocated(layout.size());
        }
        ptr
    }

    /// Deallocates memory and updates tracking counters.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it is part of the `GlobalAlloc`
    /// trait. The caller must ensure that `ptr` was allocated by this
    /// allocator with the same `layout`.
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        TOTAL_DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        record_deallocated(layout.size());
        self.inner.dealloc(ptr, layout);
    }

    /// Reallocates memory and updates tracking counters by the size
    /// difference.
    ///
    /// # Safety
    ///
    /// This function is unsafe for the same reasons as `realloc` in
    /// `GlobalAlloc`.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            TOTAL_REALLOCATIONS.fetch_add(1, Ordering::Relaxed);

            let old_size = layout.size();
            if new_size >= old_size {
                record_allocated(new_size - old_size);
            } else {
                record_deallocated(old_size - new_size);
            }
        }
        new_ptr
    }
}
