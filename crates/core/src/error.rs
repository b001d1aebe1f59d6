//! Error types for Propmap

use thiserror::Error;

/// Main error type for Propmap core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unsupported geometry kind: {0}")]
    UnsupportedGeometry(String),

    #[error("geometry has no coordinates")]
    EmptyGeometry,

    #[error("cannot normalize {0} into an outline feature")]
    InvalidOutline(String),
}

/// Result type alias for Propmap core operations
pub type Result<T> = std::result::Result<T, Error>;
