//! Error handling for the phone-forward library
//!
//! All mutating operations on the core structures report failure through
//! [`PhoneError`]; lookup operations cannot fail and return plain options.

use thiserror::Error;

/// Main error type for phone-forward operations
#[derive(Error, Debug)]
pub enum PhoneError {
    /// Memory allocation failures
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// A number that is empty or contains symbols outside the digit alphabet
    #[error("Invalid number: {number:?}")]
    InvalidNumber {
        /// The offending input
        number: String,
    },

    /// Trie structure related errors
    #[error("Trie error: {message}")]
    Trie {
        /// Error message describing the trie issue
        message: String,
    },
}

impl PhoneError {
    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create an invalid number error
    pub fn invalid_number<S: Into<String>>(number: S) -> Self {
        Self::InvalidNumber {
            number: number.into(),
        }
    }

    /// Create a trie error
    pub fn trie<S: Into<String>>(message: S) -> Self {
        Self::Trie {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::OutOfMemory { .. } => true,
            Self::InvalidNumber { .. } => false,
            Self::Trie { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "memory",
            Self::InvalidNumber { .. } => "input",
            Self::Trie { .. } => "trie",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PhoneError>;
