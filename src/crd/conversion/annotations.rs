//! Side-channel storage on object annotations
//!
//! Fields with no home in the target schema ride across conversions as
//! JSON blobs under well-known annotation keys. Presence or absence of a
//! key, never its content, drives control flow in the converters.

use kube::core::ObjectMeta;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ConvertError;

/// Serialize `value` for the given annotation key without attaching it.
///
/// Used when the caller decides placement later (or on a different object
/// than the one being read).
pub fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<String, ConvertError> {
    serde_json::to_string(value).map_err(|e| ConvertError::Encoding(key, e))
}

/// Deserialize a blob previously produced by [`encode`] or [`store`].
pub fn decode<T: DeserializeOwned>(key: &'static str, raw: &str) -> Result<T, ConvertError> {
    serde_json::from_str(raw).map_err(|e| ConvertError::Decoding(key, e))
}

/// Serialize `value` and stash it under `key` on the object's annotations.
pub fn store<T: Serialize>(
    metadata: &mut ObjectMeta,
    key: &'static str,
    value: &T,
) -> Result<(), ConvertError> {
    let blob = encode(key, value)?;
    insert_raw(metadata, key, blob);
    Ok(())
}

/// Attach an already-encoded blob under `key`.
pub fn insert_raw(metadata: &mut ObjectMeta, key: &str, blob: String) {
    metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(key.to_string(), blob);
}

/// Raw blob stored under `key`, if any. Absence is not an error; callers
/// treat a missing blob as "compute the default".
pub fn load<'a>(metadata: &'a ObjectMeta, key: &str) -> Option<&'a str> {
    metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(key))
        .map(String::as_str)
}

/// Drop the given keys. An annotation map emptied by the removal collapses
/// back to absent, so an object that never had annotations round-trips to
/// an object that still has none.
pub fn remove(metadata: &mut ObjectMeta, keys: &[&str]) {
    if let Some(map) = metadata.annotations.as_mut() {
        for key in keys {
            map.remove(*key);
        }
        if map.is_empty() {
            metadata.annotations = None;
        }
    }
}

#[cfg(test)]
#[path = "annotations_test.rs"]
mod tests;
