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

use super::{HandleError, HandleResult};
use crate::memory;
use std::fmt;

/// An exclusive-ownership handle to a single heap-allocated value.
///
/// A `UniqueHandle<T>` is the sole owner of at most one boxed `T`. When the
/// handle is dropped, the owned value is released exactly once; dropping an
/// empty handle does nothing. The handle never allocates: construction
/// takes a `Box<T>` so that allocation (and allocation failure) stays the
/// caller's concern.
///
/// Ownership moves with the handle. A plain Rust move (`let b = a;`)
/// transfers ownership and statically forbids any further use of `a`. When
/// the source must stay alive but observably empty, use
/// [`UniqueHandle::take`].
///
/// The type implements neither `Clone` nor `Copy`, so duplicating
/// ownership is unrepresentable rather than merely discouraged:
///
/// ```compile_fail
/// use monos_core::UniqueHandle;
///
/// let a = UniqueHandle::from_boxed(Box::new(1u8));
/// let b: UniqueHandle<u8> = a.clone(); // no `Clone` impl exists
/// ```
///
/// ```compile_fail
/// use monos_core::UniqueHandle;
///
/// let a = UniqueHandle::from_boxed(Box::new(1u8));
/// let b = a;
/// let c = a; // use of moved value
/// ```
///
/// # Examples
///
/// ```
/// use monos_core::UniqueHandle;
///
/// let mut first = UniqueHandle::from_boxed(Box::new(41u32));
/// if let Some(value) = first.get_mut() {
///     *value += 1;
/// }
///
/// let second = first.take();
/// assert!(first.is_empty());
/// assert_eq!(second.get(), Some(&42));
/// // `second` releases the value here; `first` releases nothing.
/// ```
pub struct UniqueHandle<T> {
    /// The owned value, if any. `None` is the EMPTY state.
    slot: Option<Box<T>>,
}

impl<T> UniqueHandle<T> {
    /// Creates a handle that owns nothing.
    pub const fn empty() -> Self {
        Self { slot: None }
    }

    /// Creates a handle that takes sole ownership of an already-allocated
    /// value. Ownership takes effect immediately.
    pub fn from_boxed(value: Box<T>) -> Self {
        memory::record_acquisition();
        Self { slot: Some(value) }
    }

    /// Returns `true` if the handle currently owns a value.
    pub fn is_owning(&self) -> bool {
        self.slot.is_some()
    }

    /// Returns `true` if the handle owns nothing.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Borrows the owned value, or `None` if the handle is empty.
    pub fn get(&self) -> Option<&T> {
        self.slot.as_deref()
    }

    /// Mutably borrows the owned value, or `None` if the handle is empty.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slot.as_deref_mut()
    }

    /// Moves the owned value into a new handle, leaving this one empty.
    ///
    /// This is the dynamic counterpart of a plain Rust move for the cases
    /// where the source binding must remain alive. Taking from an empty
    /// handle yields an empty handle and records no transfer.
    pub fn take(&mut self) -> UniqueHandle<T> {
        match self.slot.take() {
            Some(value) => {
                memory::record_transfer();
                UniqueHandle { slot: Some(value) }
            }
            None => UniqueHandle::empty(),
        }
    }

    /// Releases the owned value now, leaving the handle empty.
    ///
    /// Calling this on an already-empty handle is a no-op, so an explicit
    /// reset followed by the handle's own drop can never release twice.
    pub fn reset(&mut self) {
        if let Some(value) = self.slot.take() {
            memory::record_release();
            drop(value);
        }
    }

    /// Detaches the owned allocation and hands it back to the caller
    /// without releasing it.
    ///
    /// The value leaves the handle's accounting: its eventual release is
    /// the caller's responsibility again, exactly as it was before
    /// [`UniqueHandle::from_boxed`].
    pub fn into_boxed(mut self) -> Option<Box<T>> {
        let slot = self.slot.take();
        if slot.is_some() {
            memory::record_detachment();
        }
        slot
    }

    /// Consumes the handle and returns the owned value.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::Empty`] if the handle owns nothing.
    pub fn into_inner(self) -> HandleResult<T> {
        match self.into_boxed() {
            Some(value) => Ok(*value),
            None => Err(HandleError::Empty),
        }
    }
}

/// Releases the owned value, if any, exactly once.
///
/// `reset` checks for the empty state before releasing, which makes the
/// drop idempotent against handles that were already emptied by `take`,
/// `reset`, or `into_boxed`.
impl<T> Drop for UniqueHandle<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

/// The default handle is empty, mirroring construction from a null
/// allocation in the two-state model.
impl<T> Default for UniqueHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Box<T>> for UniqueHandle<T> {
    fn from(value: Box<T>) -> Self {
        Self::from_boxed(value)
    }
}

/// Manual implementation of `Debug`.
/// It reports only the ownership state, so it does not require `T: Debug`
/// and never borrows the owned value.
impl<T> fmt::Debug for UniqueHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_owning() {
            write!(f, "UniqueHandle(owning)")
        } else {
            write!(f, "UniqueHandle(empty)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A payload that counts its drops, so release behavior is observable.
    struct CountedPayload<'a> {
        drops: &'a AtomicUsize,
    }

    impl Drop for CountedPayload<'_> {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counted(drops: &AtomicUsize) -> UniqueHandle<CountedPayload<'_>> {
        UniqueHandle::from_boxed(Box::new(CountedPayload { drops }))
    }

    #[test]
    fn test_each_handle_releases_exactly_once() {
        let drops = AtomicUsize::new(0);
        {
            let _handles: Vec<_> = (0..8).map(|_| counted(&drops)).collect();
            assert_eq!(drops.load(Ordering::Relaxed), 0);
        }
        assert_eq!(drops.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn test_take_transfers_ownership() {
        let drops = AtomicUsize::new(0);
        let mut source = counted(&drops);

        let destination = source.take();
        assert!(source.is_empty());
        assert!(destination.is_owning());

        // The emptied source releases nothing.
        drop(source);
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        // The single release happens at the destination's destruction.
        drop(destination);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_plain_move_releases_at_destination() {
        let drops = AtomicUsize::new(0);
        let first = counted(&drops);

        let second = first;
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        drop(second);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let drops = AtomicUsize::new(0);
        let mut handle = counted(&drops);

        handle.reset();
        assert_eq!(drops.load(Ordering::Relaxed), 1);
        assert!(handle.is_empty());

        handle.reset();
        drop(handle);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_empty_handle_drop_is_noop() {
        let handle: UniqueHandle<u64> = UniqueHandle::default();
        assert!(handle.is_empty());
        drop(handle);
    }

    #[test]
    fn test_take_from_empty_source() {
        let mut source: UniqueHandle<u32> = UniqueHandle::empty();
        let destination = source.take();
        assert!(source.is_empty());
        assert!(destination.is_empty());
    }

    #[test]
    fn test_into_boxed_detaches_without_release() {
        let drops = AtomicUsize::new(0);
        let handle = counted(&drops);

        let detached = handle.into_boxed().expect("handle was owning");
        assert_eq!(drops.load(Ordering::Relaxed), 0);

        drop(detached);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_into_inner_returns_the_value() {
        let handle = UniqueHandle::from_boxed(Box::new(7u32));
        assert_eq!(handle.into_inner(), Ok(7));
    }

    #[test]
    fn test_into_inner_on_empty_fails() {
        let handle: UniqueHandle<u32> = UniqueHandle::empty();
        assert_eq!(handle.into_inner(), Err(HandleError::Empty));
    }

    #[test]
    fn test_accessors() {
        let mut handle = UniqueHandle::from_boxed(Box::new(10i32));
        assert_eq!(handle.get(), Some(&10));

        if let Some(value) = handle.get_mut() {
            *value = 20;
        }
        assert_eq!(handle.get(), Some(&20));

        handle.reset();
        assert_eq!(handle.get(), None);
        assert_eq!(handle.get_mut(), None);
    }

    #[test]
    fn test_debug_reports_state_only() {
        struct Opaque;
        let handle = UniqueHandle::from_boxed(Box::new(Opaque));
        assert_eq!(format!("{handle:?}"), "UniqueHandle(owning)");
        assert_eq!(
            format!("{:?}", UniqueHandle::<Opaque>::empty()),
            "UniqueHandle(empty)"
        );
    }
}
