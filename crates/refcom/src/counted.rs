//! A heap box that carries its own reference count.
//!
//! Stands in for the external resource system where none exists, and gives
//! tests and benches a resource whose count can be observed.

use std::ptr::NonNull;
use std::sync::atomic::{self, AtomicU32, Ordering};

use crate::handle::Handle;
use crate::kind::RefCounted;

/// A value behind an intrusive atomic reference count.
///
/// Created with a count of one owned by the returned handle. The value is
/// dropped and the box freed when the last reference is released.
#[derive(Debug)]
pub struct Counted<T> {
    refs: AtomicU32,
    value: T,
}

impl<T> Counted<T> {
    pub fn new(value: T) -> Handle<Counted<T>> {
        let raw = Box::into_raw(Box::new(Counted {
            refs: AtomicU32::new(1),
            value,
        }));
        // SAFETY: a fresh allocation whose single reference we hand over.
        unsafe { Handle::from_raw(raw) }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// The current number of references.
    ///
    /// Only a snapshot when other threads share the resource.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.refs.load(Ordering::Acquire)
    }
}

// SAFETY: the box stays allocated while `refs` is positive and is freed
// exactly once, by the release that takes the count to zero.
unsafe impl<T> RefCounted for Counted<T> {
    #[inline]
    unsafe fn add_ref(this: NonNull<Self>) -> u32 {
        // SAFETY: the caller guarantees `this` is live.
        let refs = unsafe { &this.as_ref().refs };
        // Never wraps: at the limit the count stays where it is.
        match refs.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1)) {
            Ok(previous) => previous + 1,
            Err(_) => panic!("reference count overflow"),
        }
    }

    #[inline]
    unsafe fn release(this: NonNull<Self>) -> u32 {
        // SAFETY: the caller owns a reference, so `this` is live.
        let previous = unsafe { this.as_ref().refs.fetch_sub(1, Ordering::Release) };
        if previous != 1 {
            return previous - 1;
        }
        atomic::fence(Ordering::Acquire);
        // SAFETY: that was the last reference; the pointer came from
        // `Box::into_raw` in `Counted::new`.
        drop(unsafe { Box::from_raw(this.as_ptr()) });
        0
    }
}
