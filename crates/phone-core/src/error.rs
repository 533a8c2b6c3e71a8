//! Error types for the phone simulator
//!
//! Two families live here:
//!
//! - [`CallError`]: the expected, recoverable outcomes of a refused call
//!   attempt. They are returned by [`Phone::call`](crate::Phone::call) and
//!   never terminate the simulation.
//! - [`PhoneSimError`]: failures of the surrounding machinery (directory
//!   lookups, register export, configuration).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for call attempts
pub type CallResult<T> = Result<T, CallError>;

/// Result type for directory, export and configuration operations
pub type PhoneSimResult<T> = Result<T, PhoneSimError>;

/// Why a call attempt did not connect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The calling phone is already in a conversation
    #[error("Phone{{{number}}} is already during the conversation")]
    SelfBusy {
        /// Number of the busy caller
        number: String,
    },

    /// The called phone is in a conversation
    #[error("Phone{{{to}}} is currently unavailable, call from {from} was not delivered")]
    DestinationBusy {
        /// Caller number
        from: String,
        /// Busy destination number
        to: String,
    },

    /// The called phone declined
    #[error("Phone{{{to}}} rejected call from {from}")]
    Rejected {
        /// Caller number
        from: String,
        /// Destination number that declined
        to: String,
    },
}

/// Errors raised outside the call protocol itself
#[derive(Debug, Error)]
pub enum PhoneSimError {
    /// Phone number does not match the accepted format
    #[error("Invalid phone number: {number}")]
    InvalidNumber { number: String },

    /// A phone with this number is already registered
    #[error("Phone number {number} is already registered")]
    DuplicateNumber { number: String },

    /// Phone count outside the accepted range
    #[error("Invalid amount of phones: {amount} (at most {max})")]
    InvalidAmount { amount: u64, max: usize },

    /// No phone at the given directory position
    #[error("Phone with ID {id} doesn't exist")]
    PhoneNotFound { id: usize },

    /// Export file name does not match the accepted pattern
    #[error("Invalid register file name: {name}")]
    InvalidFileName { name: String },

    /// Writing a register failed
    #[error("Failed to write register to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Logging could not be installed
    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl PhoneSimError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid number error
    pub fn invalid_number(number: impl Into<String>) -> Self {
        Self::InvalidNumber {
            number: number.into(),
        }
    }

    /// Check if the shell can simply prompt again
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PhoneSimError::InvalidNumber { .. }
                | PhoneSimError::DuplicateNumber { .. }
                | PhoneSimError::InvalidAmount { .. }
                | PhoneSimError::PhoneNotFound { .. }
                | PhoneSimError::InvalidFileName { .. }
        )
    }
}
