//! # codec
//!
//! why: values are stored as opaque bytes, the encoding is pluggable
//! relations: used by value.rs to encode on write and decode on load
//! what: Codec trait, JsonCodec default, FnCodec for closure-based codecs

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// failure to turn a value into bytes or back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CodecError(pub String);

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

/// encode/decode pair for values of type `T`
pub trait Codec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// json via serde_json, the default for every serde type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// codec built from an encode closure and a decode closure
///
/// ```
/// use tictactoe_storage::{Codec, CodecError, FnCodec};
///
/// let codec = FnCodec::new(
///     |n: &u32| Ok(n.to_string().into_bytes()),
///     |bytes: &[u8]| {
///         std::str::from_utf8(bytes)
///             .ok()
///             .and_then(|s| s.parse().ok())
///             .ok_or_else(|| CodecError::new("not a number"))
///     },
/// );
/// assert_eq!(codec.encode(&42).unwrap(), b"42".to_vec());
/// assert_eq!(codec.decode(b"7").unwrap(), 7);
/// ```
pub struct FnCodec<T, E, D> {
    encode: E,
    decode: D,
    _value: PhantomData<fn() -> T>,
}

impl<T, E, D> FnCodec<T, E, D>
where
    E: Fn(&T) -> Result<Vec<u8>, CodecError>,
    D: Fn(&[u8]) -> Result<T, CodecError>,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _value: PhantomData,
        }
    }
}

impl<T, E, D> Codec<T> for FnCodec<T, E, D>
where
    E: Fn(&T) -> Result<Vec<u8>, CodecError>,
    D: Fn(&[u8]) -> Result<T, CodecError>,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        (self.encode)(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        (self.decode)(bytes)
    }
}

impl<T, E, D> fmt::Debug for FnCodec<T, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodec").finish_non_exhaustive()
    }
}
