//! Owning handles for externally reference-counted resources.
//!
//! A [`Handle<T>`] holds at most one counted reference to a resource whose
//! lifetime is managed by someone else: a COM object, a driver object, or a
//! [`Counted<T>`] box when no such system exists. Every resource kind plugs in
//! through the [`RefCounted`] trait, so the clone/move/reset surface is written
//! once and shared by every kind.
//!
//! ```
//! use refcom::Counted;
//!
//! let first = Counted::new(String::from("swap chain"));
//! let second = first.clone();
//! assert_eq!(first.resource().map(Counted::ref_count), Some(2));
//!
//! drop(first);
//! assert_eq!(second.resource().map(Counted::ref_count), Some(1));
//! ```

pub mod counted;
pub mod diagnostics;
pub mod error;
pub mod handle;
pub mod kind;

pub use counted::Counted;
pub use diagnostics::KindStats;
pub use error::{Error, Result};
pub use handle::{Handle, Slot};
pub use kind::RefCounted;
