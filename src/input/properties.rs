//! Manifest property bag.
//!
//! Properties arrive as one nested JSON object; callers address values by
//! dot-delimited path (`database.port`). The bag is never mutated during
//! resolution, and an explicit JSON `null` reads the same as an absent key.

use crate::error::ResolveError;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(Map<String, Value>);

impl PropertyBag {
    /// Raw value at a dotted path, if present and non-null.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.0, path).filter(|value| !value.is_null())
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Typed value at a dotted path. A present value of the wrong JSON type
    /// is an error, never a silent absence.
    pub fn get_as<T: FromValue>(&self, path: &str) -> Result<Option<T>, ResolveError> {
        match self.get(path) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| ResolveError::wrong_type(path, T::EXPECTED)),
        }
    }

    pub fn string(&self, path: &str) -> Result<Option<String>, ResolveError> {
        self.get_as(path)
    }

    pub fn integer(&self, path: &str) -> Result<Option<i64>, ResolveError> {
        self.get_as(path)
    }

    pub fn boolean(&self, path: &str) -> Result<Option<bool>, ResolveError> {
        self.get_as(path)
    }

    pub fn string_list(&self, path: &str) -> Result<Option<Vec<String>>, ResolveError> {
        self.get_as(path)
    }

    pub fn require_string(&self, path: &str) -> Result<String, ResolveError> {
        self.string(path)?
            .ok_or_else(|| ResolveError::missing(path))
    }

    pub fn require_integer(&self, path: &str) -> Result<i64, ResolveError> {
        self.integer(path)?
            .ok_or_else(|| ResolveError::missing(path))
    }
}

/// Walk a dot-delimited path through nested JSON objects.
pub(crate) fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        None => root.get(path),
        Some((head, rest)) => lookup(root.get(head)?.as_object()?, rest),
    }
}

/// Extraction from a JSON value into the concrete types resolution works
/// with. `EXPECTED` is the noun used in wrong-type error messages.
pub(crate) trait FromValue: Sized {
    const EXPECTED: &'static str;
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "a string";
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "an integer";
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "a boolean";
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for Vec<String> {
    const EXPECTED: &'static str = "a list of strings";
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|entry| entry.as_str().map(str::to_string))
            .collect()
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "a value";
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for Map<String, Value> {
    const EXPECTED: &'static str = "an object";
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}
