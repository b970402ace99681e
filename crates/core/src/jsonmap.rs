// SPDX-License-Identifier: MIT

//! Order-preserving JSON map with an explicit wire marker.
//!
//! Plain `serde_json::Map` is fine for free-form objects, but the
//! specification's `metrics` field is typed as an ordered
//! `map<string, {val, unit, ts}>`, and round-trips through the archive
//! journal and the rule engine's rolling windows, where insertion order
//! doubles as recency order. A bare JSON object loses that guarantee once it
//! passes through anything that re-serializes via an unordered map, so
//! `JsonMap` carries its entries as a `[[key, value], ...]` list tagged with
//! `__type: "Map"` — the same marker shape the original adapter used on the
//! wire for this field. It's generic over the value type so it can back
//! both `metrics` (`JsonMap<MetricEntry>`) and untyped payloads
//! (`JsonMap<serde_json::Value>`).

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// An ordered string-keyed map, serialized with a `__type: "Map"` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonMap<V>(IndexMap<String, V>);

impl<V> Default for JsonMap<V> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<V> JsonMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, V> {
        self.0.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, V> {
        self.0.keys()
    }
}

impl<V: Clone> JsonMap<V> {
    /// Merge `other` on top of `self`, overwriting existing keys in place
    /// and appending new ones at the end — the deep-merge patch semantics
    /// the store applies to `metrics.set`.
    pub fn merge(&mut self, other: &JsonMap<V>) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Remove each listed key — the store's `metrics.delete` form.
    pub fn delete_many(&mut self, keys: &[String]) {
        for k in keys {
            self.0.shift_remove(k);
        }
    }
}

impl<V> FromIterator<(String, V)> for JsonMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V> IntoIterator for JsonMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

const MARKER_TYPE: &str = "Map";

impl<V: Serialize> Serialize for JsonMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let pairs: Vec<(&String, &V)> = self.0.iter().collect();
        let mut state = serializer.serialize_struct("JsonMap", 2)?;
        state.serialize_field("__type", MARKER_TYPE)?;
        state.serialize_field("value", &pairs)?;
        state.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for JsonMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonMapVisitor(PhantomData))
    }
}

struct JsonMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for JsonMapVisitor<V> {
    type Value = JsonMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a `{__type:\"Map\", value:[[k,v],...]}` marker object or a plain JSON object")
    }

    /// Accepts the marker shape. Falls back to treating an ordinary JSON
    /// object as an already-ordered map (insertion order of `serde_json`'s
    /// own map is preserved when the `preserve_order` feature is enabled,
    /// which this workspace relies on).
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = IndexMap::new();
        let mut saw_marker = false;
        while let Some(key) = map.next_key::<String>()? {
            if key == "__type" {
                let tag: String = map.next_value()?;
                if tag != MARKER_TYPE {
                    return Err(de::Error::custom(format!("unexpected __type: {tag}")));
                }
                saw_marker = true;
            } else if key == "value" && saw_marker {
                let pairs: Vec<(String, V)> = map.next_value()?;
                out.extend(pairs);
            } else {
                let value: V = map.next_value()?;
                out.insert(key, value);
            }
        }
        Ok(JsonMap(out))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut out = IndexMap::new();
        while let Some((k, v)) = seq.next_element::<(String, V)>()? {
            out.insert(k, v);
        }
        Ok(JsonMap(out))
    }
}

#[cfg(test)]
#[path = "jsonmap_tests.rs"]
mod tests;
