//! `IUnknown` as a refcom resource kind.

use std::any::type_name;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;

use refcom::{Handle, RefCounted};
use windows::core::{IUnknown_Vtbl, Interface};

use crate::error::{ComError, Result};

/// The object behind a COM interface pointer of type `I`.
///
/// Every COM object starts with its vtable pointer, and every vtable starts
/// with the three `IUnknown` entries, which is all this type relies on.
#[repr(C)]
pub struct Com<I> {
    vtable: *const IUnknown_Vtbl,
    _interface: PhantomData<I>,
}

// SAFETY: sharing follows whatever windows-rs declares for the interface.
unsafe impl<I: Send + Sync> Send for Com<I> {}
unsafe impl<I: Send + Sync> Sync for Com<I> {}

// SAFETY: AddRef/Release are the COM counting protocol; the object finalizes
// itself when Release returns zero.
unsafe impl<I: Interface> RefCounted for Com<I> {
    #[inline]
    unsafe fn add_ref(this: NonNull<Self>) -> u32 {
        unsafe {
            let vtable = &*this.as_ref().vtable;
            (vtable.AddRef)(this.as_ptr().cast())
        }
    }

    #[inline]
    unsafe fn release(this: NonNull<Self>) -> u32 {
        unsafe {
            let vtable = &*this.as_ref().vtable;
            (vtable.Release)(this.as_ptr().cast())
        }
    }
}

/// An owned COM interface pointer.
pub type ComHandle<I> = Handle<Com<I>>;

/// Bridges between [`ComHandle`] and the windows-rs interface types.
pub trait ComHandleExt<I: Interface>: Sized {
    /// Adopts the reference a windows-rs smart pointer holds.
    fn from_interface(interface: I) -> Self;

    /// Adopts `interface` when present, otherwise an empty handle.
    fn from_option(interface: Option<I>) -> Self;

    /// Borrows the interface for calling its methods.
    fn interface(&self) -> Option<&I>;

    /// Like [`interface`](ComHandleExt::interface) but empty is an error.
    fn require(&self) -> Result<&I> {
        self.interface().ok_or(ComError::Empty {
            kind: type_name::<I>(),
        })
    }

    /// A new windows-rs smart pointer sharing the resource.
    fn to_interface(&self) -> Option<I> {
        self.interface().cloned()
    }

    /// Hands the reference over to a windows-rs smart pointer.
    fn into_interface(self) -> Option<I>;

    /// `QueryInterface` for `J`.
    fn cast<J: Interface>(&self) -> Result<ComHandle<J>> {
        let interface = self.require()?.cast::<J>()?;
        Ok(ComHandle::from_interface(interface))
    }

    /// The object's count as reported by an AddRef/Release pair.
    ///
    /// COM documents these values as informational; use for diagnostics only.
    fn ref_count_hint(&self) -> Option<u32>;
}

impl<I: Interface> ComHandleExt<I> for ComHandle<I> {
    fn from_interface(interface: I) -> Self {
        // SAFETY: `into_raw` gives up the smart pointer's reference to us.
        unsafe { Handle::from_raw(interface.into_raw().cast::<Com<I>>()) }
    }

    fn from_option(interface: Option<I>) -> Self {
        interface.map_or_else(Handle::empty, Self::from_interface)
    }

    fn interface(&self) -> Option<&I> {
        let slot: *const *mut Com<I> = self.as_raw_ref();
        // SAFETY: `*mut Com<I>` and `*mut c_void` share a layout.
        let raw: &*mut c_void = unsafe { &*slot.cast::<*mut c_void>() };
        // SAFETY: a non-null pointer is a live `I` kept alive by this handle,
        // and the borrow is tied to `self`.
        unsafe { I::from_raw_borrowed(raw) }
    }

    fn into_interface(self) -> Option<I> {
        let raw = self.into_raw();
        // SAFETY: `into_raw` passed our reference to the new smart pointer.
        NonNull::new(raw).map(|ptr| unsafe { I::from_raw(ptr.as_ptr().cast()) })
    }

    fn ref_count_hint(&self) -> Option<u32> {
        let ptr = self.as_non_null()?;
        // SAFETY: the handle keeps the object alive across the pair.
        unsafe {
            Com::<I>::add_ref(ptr);
            Some(Com::<I>::release(ptr))
        }
    }
}

/// Fails with [`refcom::Error::NullResource`] when a creation call
/// succeeded without producing an object.
pub(crate) fn ensure_bound<I: Interface>(handle: ComHandle<I>) -> Result<ComHandle<I>> {
    if handle.is_empty() {
        return Err(refcom::Error::NullResource {
            kind: type_name::<I>(),
        }
        .into());
    }
    Ok(handle)
}
