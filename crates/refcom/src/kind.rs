use std::ptr::NonNull;

/// The counting protocol of an externally reference-counted resource.
///
/// Implemented once per resource kind. [`Handle`](crate::Handle) only ever
/// calls these two functions; it never reads or writes the resource itself.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - a pointer whose count is positive refers to a live, properly aligned
///   `Self`, so handles may hand out `&Self` while they hold a reference;
/// - `add_ref` and `release` may be called from any thread the kind is
///   `Send`/`Sync` for;
/// - `release` finalizes the resource exactly when the count reaches zero and
///   the pointer is never touched by the protocol afterwards.
pub unsafe trait RefCounted {
    /// Increments the count and returns the new value.
    ///
    /// The returned value is informational only (COM documents it as such).
    ///
    /// # Safety
    ///
    /// `this` must point at a live resource of this kind.
    unsafe fn add_ref(this: NonNull<Self>) -> u32;

    /// Decrements the count, finalizing the resource at zero, and returns the
    /// new value.
    ///
    /// # Safety
    ///
    /// `this` must point at a live resource of this kind and the caller must
    /// own the reference being given up.
    unsafe fn release(this: NonNull<Self>) -> u32;
}
