use thiserror::Error;

/// Errors produced while binding handles.
///
/// Contract violations on a handle (raw access while empty, requesting a slot
/// while bound) are assertions, not values of this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A create-and-return call reported success but left its slot null.
    #[error("creation of {kind} reported success but produced no resource")]
    NullResource { kind: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
