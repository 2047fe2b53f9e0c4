//! Component state: immutable snapshots and the patches merged into them.
//!
//! A snapshot is never mutated after construction. `merged` always builds a
//! new map, so the previous snapshot stays intact for change detection.

use std::collections::BTreeMap;
use std::rc::Rc;
use serde_json::{Map, Value};
use crate::{Result, WidgetError};

/// Any value a component keeps in its state.
pub type StateValue = Value;

/// Read-only view of a component's state at one point in time.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    values: Rc<BTreeMap<String, StateValue>>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    /// Shorthand for string-valued keys, the common case for attribute-driven state.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow-merge `patch` over this snapshot into a fresh snapshot.
    pub fn merged(&self, patch: &StatePatch) -> StateSnapshot {
        let mut values = (*self.values).clone();
        for (key, value) in &patch.entries {
            values.insert(key.clone(), value.clone());
        }
        StateSnapshot {
            values: Rc::new(values),
        }
    }

    /// Keys of `self` whose value differs from `previous`, including keys
    /// that `previous` does not have. Returned in key order.
    pub fn changed_keys(&self, previous: &StateSnapshot) -> Vec<String> {
        self.values
            .iter()
            .filter(|(key, value)| previous.values.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// True when both snapshots share the same backing map.
    pub fn ptr_eq(&self, other: &StateSnapshot) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl PartialEq for StateSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

/// A partial state update, applied with `setState`-style shallow merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    entries: BTreeMap<String, StateValue>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form: `StatePatch::new().with("currentInput", "0")`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Build a patch from a JSON object. Any other JSON shape is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(WidgetError::InvalidPatch(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for StatePatch {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for StatePatch
where
    K: Into<String>,
    V: Into<StateValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut patch = StatePatch::new();
        for (key, value) in iter {
            patch.insert(key, value);
        }
        patch
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
