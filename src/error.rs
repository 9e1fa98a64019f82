//! Unified error types for Borderwatch.
//!
//! The pure core (classification, intensity, clamping) never fails; errors
//! only appear at the edges: persistent storage, configuration files, and
//! sample sources handing over unusable data.

use core::fmt;

use crate::app::ports::StoreError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible edge operation funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The preference store could not be read or written.
    Store(StoreError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// A sample source produced data that cannot be interpreted.
    Sample(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Sample(msg) => write!(f, "sample: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
