//! The generic owning handle.
//!
//! `Handle<T>` is a single nullable pointer. It is either empty or bound to
//! exactly one resource and contributes exactly one reference while bound.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::diagnostics::{self, RefEvent};
use crate::error::Error;
use crate::kind::RefCounted;

/// An owned reference to an externally reference-counted resource.
///
/// - `Clone` shares the resource and adds one reference.
/// - Moving transfers the reference; [`take`](Handle::take) does the same and
///   leaves an empty handle behind.
/// - Dropping, [`reset`](Handle::reset) and overwriting release it.
///
/// `Handle` deliberately implements neither `PartialEq` nor `Hash`: what makes
/// two resources "the same" is up to the resource system. Pointer identity is
/// available explicitly through [`Handle::ptr_eq`].
pub struct Handle<T: RefCounted> {
    ptr: Option<NonNull<T>>,
    _owns: PhantomData<T>,
}

// SAFETY: a handle only exposes `&T` and the counting protocol, so it can cross
// threads under the same conditions as `Arc<T>`.
unsafe impl<T: RefCounted + Send + Sync> Send for Handle<T> {}
unsafe impl<T: RefCounted + Send + Sync> Sync for Handle<T> {}

#[inline]
unsafe fn acquire<T: RefCounted>(ptr: NonNull<T>) {
    // SAFETY: forwarded from the caller.
    let count = unsafe { T::add_ref(ptr) };
    diagnostics::record::<T>(RefEvent::AddRef, ptr.as_ptr(), Some(count));
}

#[inline]
unsafe fn release<T: RefCounted>(ptr: NonNull<T>) {
    // The address is only logged, never dereferenced after release.
    let addr = ptr.as_ptr();
    // SAFETY: forwarded from the caller.
    let count = unsafe { T::release(ptr) };
    diagnostics::record::<T>(RefEvent::Release, addr, Some(count));
}

impl<T: RefCounted> Handle<T> {
    /// An empty handle.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: None,
            _owns: PhantomData,
        }
    }

    /// Adopts the reference the caller holds on `raw` without incrementing.
    ///
    /// A null `raw` produces an empty handle.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point at a live resource of kind `T` on which
    /// the caller owns one reference. That reference now belongs to the
    /// handle and must not be released elsewhere.
    #[inline]
    pub unsafe fn from_raw(raw: *mut T) -> Self {
        let ptr = NonNull::new(raw);
        if ptr.is_some() {
            diagnostics::record::<T>(RefEvent::Adopt, raw, None);
        }
        Self {
            ptr,
            _owns: PhantomData,
        }
    }

    /// Binds to `raw` by taking a new reference of its own.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point at a live resource of kind `T`.
    #[inline]
    pub unsafe fn from_raw_borrowed(raw: *mut T) -> Self {
        match NonNull::new(raw) {
            Some(ptr) => {
                // SAFETY: the caller guarantees `raw` is live.
                unsafe { acquire(ptr) };
                Self {
                    ptr: Some(ptr),
                    _owns: PhantomData,
                }
            }
            None => Self::empty(),
        }
    }

    /// Runs a create-and-return call against an empty slot.
    ///
    /// `create` reports failure through its own error channel. A call that
    /// succeeds yet leaves the slot null is turned into
    /// [`Error::NullResource`].
    pub fn try_create<F, E>(create: F) -> Result<Self, E>
    where
        F: FnOnce(*mut *mut T) -> Result<(), E>,
        E: From<Error>,
    {
        let mut handle = Self::empty();
        let outcome = {
            let mut slot = handle.slot();
            create(slot.as_mut_ptr())
        };
        outcome?;

        if handle.is_empty() {
            return Err(Error::NullResource {
                kind: type_name::<T>(),
            }
            .into());
        }
        Ok(handle)
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.ptr.is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Releases the held reference, if any, and leaves the handle empty.
    ///
    /// Calling it on an empty handle does nothing.
    #[inline]
    pub fn reset(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: a bound handle owns one reference on a live resource.
            unsafe { release(ptr) };
        }
    }

    /// Moves the binding out, leaving this handle empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Moves `other` in and returns the previous binding unreleased.
    #[inline]
    pub fn replace(&mut self, other: Self) -> Self {
        mem::replace(self, other)
    }

    /// The raw pointer for passing to the resource's own API.
    ///
    /// Ownership and the count are untouched. The handle must be bound:
    /// debug builds assert it, release builds return null.
    #[inline]
    pub fn as_raw(&self) -> *mut T {
        debug_assert!(self.is_bound(), "as_raw on an empty {}", type_name::<Self>());
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    #[inline]
    pub fn as_non_null(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    /// A reference to the storage of the raw pointer, null when empty.
    ///
    /// For APIs that borrow an interface through a `&*mut T`.
    #[inline]
    pub fn as_raw_ref(&self) -> &*mut T {
        // SAFETY: `Option<NonNull<T>>` is guaranteed to have the layout of
        // `*mut T`, with `None` represented as null.
        unsafe { &*(&self.ptr as *const Option<NonNull<T>>).cast::<*mut T>() }
    }

    /// The resource itself, while the handle keeps it alive.
    #[inline]
    pub fn resource(&self) -> Option<&T> {
        // SAFETY: `RefCounted` guarantees a live `T` while we hold a count.
        self.ptr.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Exposes the binding slot to a create-and-return call.
    ///
    /// The handle must be empty; a bound handle trips a debug assertion and
    /// is reset in release builds so its reference is not lost. Whatever the
    /// call writes into the slot is adopted when the returned guard drops.
    pub fn slot(&mut self) -> Slot<'_, T> {
        debug_assert!(
            self.is_empty(),
            "slot requested on a bound {}",
            type_name::<Self>()
        );
        self.reset();
        Slot { handle: self }
    }

    /// Gives the reference back to the caller without releasing it.
    ///
    /// Returns null for an empty handle.
    #[inline]
    pub fn into_raw(mut self) -> *mut T {
        match self.ptr.take() {
            Some(ptr) => {
                diagnostics::record::<T>(RefEvent::Detach, ptr.as_ptr(), None);
                ptr.as_ptr()
            }
            None => ptr::null_mut(),
        }
    }

    /// Whether both handles are bound to the same pointer.
    ///
    /// Two empty handles are not considered identical.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        match (this.ptr, other.ptr) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: RefCounted> Default for Handle<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: RefCounted> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        if let Some(ptr) = self.ptr {
            // SAFETY: `self` holds a reference, so the resource is live.
            unsafe { acquire(ptr) };
        }
        Self {
            ptr: self.ptr,
            _owns: PhantomData,
        }
    }

    /// Copy-assignment: releases the current binding, then shares `source`.
    ///
    /// Already sharing the same resource is a no-op.
    fn clone_from(&mut self, source: &Self) {
        if self.ptr == source.ptr {
            return;
        }
        self.reset();
        if let Some(ptr) = source.ptr {
            // SAFETY: `source` still holds its reference.
            unsafe { acquire(ptr) };
            self.ptr = Some(ptr);
        }
    }
}

impl<T: RefCounted> Drop for Handle<T> {
    #[inline]
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: RefCounted> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(ptr) => write!(f, "Handle<{}>({:p})", type_name::<T>(), ptr),
            None => write!(f, "Handle<{}>(empty)", type_name::<T>()),
        }
    }
}

/// Out-parameter guard returned by [`Handle::slot`].
///
/// Pass [`as_mut_ptr`](Slot::as_mut_ptr) (or a [`cast`](Slot::cast) of it) to
/// the creating call. When the guard drops, a pointer written into the slot is
/// owned by the handle.
pub struct Slot<'a, T: RefCounted> {
    handle: &'a mut Handle<T>,
}

impl<T: RefCounted> Slot<'_, T> {
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut *mut T {
        (&mut self.handle.ptr as *mut Option<NonNull<T>>).cast::<*mut T>()
    }

    /// The slot reinterpreted as `*mut U`.
    ///
    /// `U` must be a nullable pointer type with the layout of `*mut T`, such
    /// as `Option<I>` for a transparent interface wrapper `I`.
    #[inline]
    pub fn cast<U>(&mut self) -> *mut U {
        debug_assert_eq!(mem::size_of::<U>(), mem::size_of::<*mut T>());
        self.as_mut_ptr().cast::<U>()
    }
}

impl<T: RefCounted> Drop for Slot<'_, T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.handle.ptr {
            diagnostics::record::<T>(RefEvent::Adopt, ptr.as_ptr(), None);
        }
    }
}
