//! Versioned JSON persistence on top of key-value storage
//!
//! Every blob is wrapped in an envelope carrying a format version. Blobs
//! from another version or that fail to decode are reported as errors by
//! [`load`]; [`load_or_default`] logs them and falls back to the default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{Storage, StorageError};

/// Current envelope format
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode or decode blob: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("blob has format version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    payload: serde_json::Value,
}

/// Serialize `value` into storage under `key`
pub fn save<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string(&EnvelopeOut {
        version: FORMAT_VERSION,
        payload: value,
    })?;
    storage.set(key, &json)?;
    Ok(())
}

/// Load the blob under `key`; `Ok(None)` when nothing is stored
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, PersistError> {
    let Some(json) = storage.get(key)? else {
        return Ok(None);
    };
    let envelope: EnvelopeIn = serde_json::from_str(&json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistError::VersionMismatch {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(Some(serde_json::from_value(envelope.payload)?))
}

/// Load the blob under `key`, falling back to the default on any problem
pub fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Discarding stored {}: {}", key, e);
            T::default()
        }
    }
}
