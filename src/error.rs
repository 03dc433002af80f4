//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for container operations
///
/// Registration failures are produced by the container itself and
/// indicate misuse (a programmer error, not a runtime condition).
/// Init/start failures are produced by the registered objects and are
/// propagated to the caller verbatim, without wrapping.
#[derive(Error, Debug)]
pub enum Error {
    /// Object registered without any recognized capability
    #[error("{object} exposes none of the Initializer, Runner, or Globalizer capabilities")]
    InvalidRegistration {
        /// Type name of the rejected object
        object: &'static str,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Generic string-based error
    #[error("{0}")]
    Message(String),

    /// Generic error from external sources
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create a string-based error
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
