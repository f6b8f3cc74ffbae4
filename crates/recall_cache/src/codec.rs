//! The fixed binary encoding shared by argument hashing and entry persistence.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Encodes a value with bincode's standard configuration.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CacheError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(|e| {
        CacheError::Serialization {
            reason: e.to_string(),
        }
    })
}

/// Decodes a value that must span the whole input.
///
/// Returns a plain reason string so callers can attach the right context
/// (an argument name, or an entry path).
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let (value, consumed) =
        bincode::serde::decode_from_slice::<T, _>(bytes, bincode::config::standard())
            .map_err(|e| e.to_string())?;
    if consumed != bytes.len() {
        return Err(format!(
            "{} trailing bytes after decoded value",
            bytes.len() - consumed
        ));
    }
    Ok(value)
}
