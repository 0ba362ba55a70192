//! # value
//!
//! why: bind one in-memory value to one storage slot with write-through
//! relations: uses Storage from lib.rs and Codec from codec.rs
//! what: InitialValue, PersistentValue

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::{Codec, JsonCodec};
use crate::error::{Result, StorageError};
use crate::SharedStorage;

/// value used when nothing is stored yet
pub enum InitialValue<T> {
    /// use this value as is
    Value(T),
    /// call this once, only when the slot is empty
    Lazy(Box<dyn FnOnce() -> T>),
}

impl<T> InitialValue<T> {
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    pub fn lazy(producer: impl FnOnce() -> T + 'static) -> Self {
        Self::Lazy(Box::new(producer))
    }

    fn resolve(self) -> T {
        match self {
            Self::Value(value) => value,
            Self::Lazy(producer) => producer(),
        }
    }
}

impl<T: Default> Default for InitialValue<T> {
    fn default() -> Self {
        Self::Value(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for InitialValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// a value mirrored to a storage slot
///
/// loads from storage once on creation and writes back on every `set`
pub struct PersistentValue<T, C = JsonCodec> {
    key: String,
    value: T,
    codec: C,
    storage: SharedStorage,
}

impl<T> PersistentValue<T, JsonCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// bind `key` using the json codec
    pub fn new(
        storage: SharedStorage,
        key: impl Into<String>,
        initial: InitialValue<T>,
    ) -> Result<Self> {
        Self::with_codec(storage, key, initial, JsonCodec)
    }
}

impl<T, C: Codec<T>> PersistentValue<T, C> {
    /// bind `key` using a custom codec
    ///
    /// stored bytes that fail to decode are an error, the initial value is
    /// only used when the slot is missing or empty
    pub fn with_codec(
        storage: SharedStorage,
        key: impl Into<String>,
        initial: InitialValue<T>,
        codec: C,
    ) -> Result<Self> {
        let key = key.into();
        let stored = storage
            .borrow()
            .read(&key)
            .map_err(|source| StorageError::Read {
                key: key.clone(),
                source,
            })?;

        let value = match stored {
            Some(bytes) if !bytes.is_empty() => {
                debug!(key = %key, len = bytes.len(), "loaded stored value");
                codec
                    .decode(&bytes)
                    .map_err(|source| StorageError::Deserialize {
                        key: key.clone(),
                        source,
                    })?
            }
            _ => {
                debug!(key = %key, "no stored value, using initial value");
                initial.resolve()
            }
        };

        Ok(Self {
            key,
            value,
            codec,
            storage,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// current in-memory value, no i/o
    pub fn get(&self) -> &T {
        &self.value
    }

    /// replace the value and write it through
    ///
    /// the write happens on every call, even when the new value equals the
    /// old one. the in-memory value is updated even if the write fails.
    pub fn set(&mut self, value: T) -> Result<()> {
        self.value = value;
        self.persist()
    }

    /// mutate the value in place and write it through
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> Result<()> {
        f(&mut self.value);
        self.persist()
    }

    /// replace the value without writing it
    ///
    /// the slot keeps its previous bytes until the next `set` or `update`
    pub fn set_in_memory(&mut self, value: T) {
        self.value = value;
    }

    fn persist(&self) -> Result<()> {
        let bytes = self
            .codec
            .encode(&self.value)
            .map_err(|source| {
                warn!(key = %self.key, error = %source, "encode failed, value kept in memory only");
                StorageError::Serialize {
                    key: self.key.clone(),
                    source,
                }
            })?;

        self.storage
            .borrow_mut()
            .write(&self.key, &bytes)
            .map_err(|source| {
                warn!(
                    key = %self.key,
                    error = %source,
                    "write-through failed, value kept in memory only"
                );
                StorageError::Write {
                    key: self.key.clone(),
                    source,
                }
            })?;

        debug!(key = %self.key, len = bytes.len(), "value persisted");
        Ok(())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PersistentValue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
