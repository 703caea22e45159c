// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path-addressed datablock properties.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::id::DataId;

/// The current value of a datablock property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A single boolean.
    Bool(bool),
    /// A single integer.
    Int(i32),
    /// A single float.
    Float(f32),
    /// An enum, stored by its integer value.
    Enum(i32),
    /// A fixed-size boolean array.
    BoolArray(Vec<bool>),
    /// A fixed-size integer array.
    IntArray(Vec<i32>),
    /// A fixed-size float array (colors, vectors).
    FloatArray(Vec<f32>),
    /// A string.
    String(String),
    /// A reference to another datablock.
    Pointer(Option<DataId>),
    /// A list of datablocks. Cannot be overridden.
    Collection(Vec<DataId>),
}

impl PropertyValue {
    /// Returns the array length of the value, or 0 for scalars.
    #[must_use]
    pub fn array_len(&self) -> usize {
        match self {
            Self::BoolArray(v) => v.len(),
            Self::IntArray(v) => v.len(),
            Self::FloatArray(v) => v.len(),
            _ => 0,
        }
    }
}

/// Properties of one datablock, keyed by path (`"frame_start"`,
/// `"render.resolution_x"`, `"color"`, ...).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyMap {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyMap {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PropertyValue> {
        self.values.get(path)
    }

    /// Returns a mutable reference to the value at `path`, if any.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut PropertyValue> {
        self.values.get_mut(path)
    }

    /// Sets the value at `path`, returning the previous value.
    pub fn set(&mut self, path: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(path.into(), value)
    }

    /// Removes the value at `path`.
    pub fn remove(&mut self, path: &str) -> Option<PropertyValue> {
        self.values.remove(path)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the map has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(path, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn set_replaces_and_returns_previous() {
        let mut map = PropertyMap::new();
        assert!(map.set("frame_start", PropertyValue::Int(1)).is_none());
        assert_eq!(
            map.set("frame_start", PropertyValue::Int(10)),
            Some(PropertyValue::Int(1))
        );
        assert_eq!(map.get("frame_start"), Some(&PropertyValue::Int(10)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn array_len_is_zero_for_scalars() {
        assert_eq!(PropertyValue::Float(1.0).array_len(), 0);
        assert_eq!(PropertyValue::FloatArray(vec![0.0; 3]).array_len(), 3);
        assert_eq!(PropertyValue::String("x".into()).array_len(), 0);
    }
}
