#![cfg(windows)]
//! `refcom` handles for the COM graphics stack.
//!
//! Every interface becomes a [`ComHandle<I>`]; the per-family modules name the
//! handles and wrap the calls that create them.

pub mod animation;
pub mod apartment;
pub mod com;
pub mod d2d;
pub mod d3d11;
pub mod dwrite;
pub mod dxgi;
pub mod error;
pub mod factory;
pub mod wic;

pub use apartment::Apartment;
pub use com::{Com, ComHandle, ComHandleExt};
pub use error::{ComError, Result};
pub use factory::SharedFactories;
