//! Per-field decode policy
//!
//! Fields are strict by default: a shape mismatch fails the whole response.
//! Wrapping a field in [`Lenient`] switches it to "fall back to the default and
//! keep going", which the descriptor `x-cortex-dependency` block needs because
//! hand-written descriptors frequently get it wrong.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Lenient<T>(pub T);

impl<T> Lenient<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Lenient<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(Lenient(T::default()));
        }
        match serde_json::from_value(raw) {
            Ok(value) => Ok(Lenient(value)),
            Err(e) => {
                tracing::warn!(
                    "ignoring malformed {}: {}",
                    std::any::type_name::<T>().rsplit("::").next().unwrap_or("field"),
                    e
                );
                Ok(Lenient(T::default()))
            }
        }
    }
}

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
