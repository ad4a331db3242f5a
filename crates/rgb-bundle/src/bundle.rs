//! The `Bundle` container.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{BundleError, BundleResult, BundleValue, Value, ValueKind};

/// A named map from string keys to [`Value`]s.
///
/// Bundles nest: a value may itself be a bundle, to any depth. Children are
/// owned, so the value graph is always a tree. Keys are unique within one
/// bundle and `put` on an existing key replaces the old value. Iteration
/// order is unspecified; equality is structural and ignores insertion order.
///
/// Dropping is iterative, so a chain of any depth can be built and freed.
/// `Clone`, `PartialEq`, `Display`, `Debug` and serde recurse once per
/// nesting level and are bounded by the thread's stack (serde formats
/// usually impose a lower recursion limit of their own).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Diagnostic name, also the natural key when stored in a parent.
    name: String,
    entries: FxHashMap<String, Value>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: FxHashMap::default(),
        }
    }

    /// Get the bundle name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a value, replacing any previous value under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a copy of the value under `key` as `T`.
    ///
    /// Returns `None` when the key is absent **and** when the stored value is
    /// of a different kind than `T`. It never panics and never alters the
    /// bundle. Use [`try_get`](Self::try_get) to tell the two cases apart.
    #[must_use]
    pub fn get<T: BundleValue>(&self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(T::from_value)
    }

    /// Like [`get`](Self::get), but reports why no value was returned.
    pub fn try_get<T: BundleValue>(&self, key: &str) -> BundleResult<T> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| BundleError::MissingKey {
                bundle: self.name.clone(),
                key: key.to_owned(),
            })?;

        T::from_value(value).ok_or_else(|| BundleError::TypeMismatch {
            bundle: self.name.clone(),
            key: key.to_owned(),
            expected: T::KIND,
            found: value.kind(),
        })
    }

    /// Borrow the raw value under `key`.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Borrow a nested bundle without cloning it.
    #[must_use]
    pub fn get_bundle(&self, key: &str) -> Option<&Bundle> {
        self.entries.get(key).and_then(Value::as_bundle)
    }

    /// Mutably borrow a nested bundle.
    pub fn get_bundle_mut(&mut self, key: &str) -> Option<&mut Bundle> {
        self.entries.get_mut(key).and_then(Value::as_bundle_mut)
    }

    /// Borrow a string entry without cloning it.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Check whether any value is stored under `key`.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Alias of [`exists`](Self::exists).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.exists(key)
    }

    /// Get the kind of the value under `key`.
    #[must_use]
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.entries.get(key).map(Value::kind)
    }

    /// Remove and return the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of entries (not counting entries of nested bundles).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bundle has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn sorted_entries(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Drop for Bundle {
    fn drop(&mut self) {
        // Detach nested bundles onto a work list so freeing a deep chain
        // does not recurse through `Value::Bundle`.
        let mut pending = Vec::new();
        detach_children(&mut self.entries, &mut pending);
        while let Some(mut child) = pending.pop() {
            detach_children(&mut child.entries, &mut pending);
        }
    }
}

fn detach_children(entries: &mut FxHashMap<String, Value>, pending: &mut Vec<Bundle>) {
    if !entries.values().any(|v| matches!(v, Value::Bundle(_))) {
        return;
    }
    for (_, value) in entries.drain() {
        if let Value::Bundle(child) = value {
            pending.push(child);
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bundle {}: {{", self.name)?;
        for (i, (key, value)) in self.sorted_entries().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("name", &self.name)
            .field("entries", &self.sorted_entries())
            .finish()
    }
}
