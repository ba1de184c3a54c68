use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComError {
    #[error("COM call failed: {0}")]
    Com(#[from] windows::core::Error),

    #[error(transparent)]
    Handle(#[from] refcom::Error),

    #[error("COM apartment initialization failed: {0}")]
    Apartment(windows::core::Error),

    #[error("operation needs a bound {kind} handle")]
    Empty { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, ComError>;
