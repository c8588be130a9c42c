//! JSON record codec.
//!
//! Records written through these helpers are compact JSON, which never
//! contains a raw newline. Anything else is rejected before it reaches the
//! file.

use crate::collection::store::Collection;
use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes `value` as a single-line JSON record.
///
/// # Errors
///
/// Returns `Codec` if serialization fails, or `InvalidRecord` if the output
/// contains a newline (possible only with a custom `Serialize` impl that
/// emits raw JSON).
pub fn encode_record<T: Serialize + ?Sized>(value: &T) -> CoreResult<Vec<u8>> {
    let bytes = serde_json::to_vec(value)?;
    if bytes.contains(&b'\n') {
        return Err(CoreError::invalid_record(
            "serialized record contains a newline",
        ));
    }
    Ok(bytes)
}

impl Collection {
    /// Inserts the JSON encoding of `value`.
    pub fn insert_json<T: Serialize + ?Sized>(&self, value: &T) -> CoreResult<()> {
        let record = encode_record(value)?;
        self.insert(&record)
    }

    /// Visits every record decoded as `T`.
    ///
    /// `visit` returns true to stop early. A record that does not decode
    /// ends the scan with a `Codec` error.
    pub fn for_each_json<T, F>(&self, mut visit: F) -> CoreResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(usize, T) -> bool,
    {
        self.try_for_each(|index, record| {
            let value = serde_json::from_slice(record)?;
            Ok(visit(index, value))
        })
    }

    /// Decodes every record as `T`.
    pub fn all_json<T: DeserializeOwned>(&self) -> CoreResult<Vec<T>> {
        let mut values = Vec::new();
        self.for_each_json(|_, value| {
            values.push(value);
            false
        })?;
        Ok(values)
    }
}
