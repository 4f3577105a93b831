//! Insertion-ordered field maps.
//!
//! Placeholder numbering follows key order, so a [`FieldMap`] never reorders
//! its entries: iteration yields keys in the order they were first inserted.

use crate::error::{JoblyError, JoblyResult};
use crate::value::FieldValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ordered mapping from field name to [`FieldValue`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field.
    ///
    /// Re-inserting an existing key replaces the value in place and returns the
    /// old one; the key keeps its original position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Chainable [`insert`](FieldMap::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Build a map from a JSON object, keeping document order only if the
    /// object itself preserves it. Prefer deserializing straight into
    /// `FieldMap` when order matters.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        let serde_json::Value::Object(obj) = value else {
            return Err(JoblyError::invalid("expected a JSON object of fields"));
        };
        let mut map = Self::new();
        for (k, v) in obj {
            map.insert(k, FieldValue::try_from(v)?);
        }
        Ok(map)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
        let mut map = FieldMap {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Build a [`FieldMap`] literal.
///
/// ```ignore
/// let fields = jobly::field_map! { "numEmployees" => 10, "logoUrl" => "x.png" };
/// ```
#[macro_export]
macro_rules! field_map {
    () => { $crate::FieldMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::FieldMap::new();
        $( map.insert($key, $value); )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let map = field_map! { "b" => 1, "a" => 2, "c" => 3 };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut map = field_map! { "a" => 1, "b" => 2 };
        let old = map.insert("a", 9);
        assert_eq!(old, Some(FieldValue::Int(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&FieldValue::Int(9)));
    }

    #[test]
    fn deserializes_in_document_order() {
        let map: FieldMap =
            serde_json::from_str(r#"{"logoUrl": "x.png", "numEmployees": 10, "description": null}"#)
                .unwrap();
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["logoUrl", "numEmployees", "description"]
        );
        assert_eq!(map.get("description"), Some(&FieldValue::Null));
    }

    #[test]
    fn rejects_nested_values() {
        assert!(serde_json::from_str::<FieldMap>(r#"{"tags": ["a"]}"#).is_err());
        assert!(FieldMap::from_json(serde_json::json!("nope")).is_err());
    }

    #[test]
    fn serializes_in_order() {
        let map = field_map! { "z" => true, "a" => "x" };
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"z":true,"a":"x"}"#);
    }
}
