//! # error
//!
//! why: tell callers which key failed and at which stage
//! relations: returned by value.rs, wrapped by tictactoe-core's GameError
//! what: StorageError, Result alias

use std::io;

use thiserror::Error;

use crate::codec::CodecError;

/// errors raised while binding a value to storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// the store could not be read while loading `key`
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    /// the store rejected the write-through for `key`
    ///
    /// the in-memory value has already been updated when this is returned
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    /// bytes stored under `key` could not be decoded
    #[error("stored value for '{key}' is malformed: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: CodecError,
    },

    /// the new value for `key` could not be encoded
    #[error("failed to encode value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: CodecError,
    },
}

impl StorageError {
    /// key of the slot involved in the failure
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. }
            | Self::Write { key, .. }
            | Self::Deserialize { key, .. }
            | Self::Serialize { key, .. } => key,
        }
    }

    /// true for failures that leave the in-memory value intact and usable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Serialize { .. })
    }
}

/// result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
