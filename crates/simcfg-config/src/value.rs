//! Configuration value tree.
//!
//! A [`Value`] is either a scalar or a [`Group`] of named children. Groups keep
//! insertion order so emitted documents list settings in the order they were
//! loaded or recorded.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use simcfg_common::{Error, Result};
use std::fmt;

/// Kind tag of a [`Value`], used in type-mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Bool,
    Str,
    Float,
    Group,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Str => write!(f, "string"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Group => write!(f, "group"),
        }
    }
}

/// A node of the configuration tree.
///
/// There is no implicit coercion between variants: an `Int` is never read as
/// a `Float` and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    Float(f64),
    Group(Group),
}

impl Value {
    /// An empty group, the shape of a fresh tree root.
    pub fn empty_group() -> Self {
        Value::Group(Group::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Float(_) => ValueKind::Float,
            Value::Group(_) => ValueKind::Group,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Convert a parsed JSON document into a tree.
    ///
    /// `null`, arrays and integers beyond `i64` have no counterpart in the
    /// tree and are rejected with the dotted path of the offending entry.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        convert_json(json, "")
    }
}

fn convert_json(json: serde_json::Value, key: &str) -> Result<Value> {
    use serde_json::Value as J;

    let unsupported = |found: &str| Error::UnsupportedValue {
        key: key.to_string(),
        found: found.to_string(),
    };

    match json {
        J::Bool(b) => Ok(Value::Bool(b)),
        J::String(s) => Ok(Value::Str(s)),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if n.is_u64() {
                Err(unsupported("integer above i64 range"))
            } else {
                n.as_f64().map(Value::Float).ok_or_else(|| unsupported("number"))
            }
        }
        J::Object(map) => {
            let mut group = Group::with_capacity(map.len());
            for (name, child) in map {
                let child_key = join_key(key, &name);
                group.insert(name, convert_json(child, &child_key)?);
            }
            Ok(Value::Group(group))
        }
        J::Array(_) => Err(unsupported("array")),
        J::Null => Err(unsupported("null")),
    }
}

/// Join a dotted prefix and a child name. The root prefix is empty.
pub(crate) fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Group> for Value {
    fn from(g: Group) -> Self {
        Value::Group(g)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Group(g) => g.serialize(serializer),
        }
    }
}

/// Insertion-ordered mapping from names to values.
///
/// Iteration order is the order keys were first inserted; replacing a value
/// keeps its slot. Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Group {
    entries: IndexMap<String, Value>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries.get_mut(name)
    }

    /// Insert or replace `name`. A replaced entry keeps its original position.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(name.into(), value)
    }

    /// Return the child `name`, inserting the result of `make` first if absent.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> Value) -> &mut Value {
        let index = match self.entries.get_index_of(name) {
            Some(i) => i,
            None => self.entries.insert_full(name.to_string(), make()).0,
        };
        &mut self.entries[index]
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Value> {
        Value::from_json(serde_json::from_str(text).unwrap())
    }

    #[test]
    fn json_numbers_keep_their_kind() {
        let v = parse(r#"{"i": 3, "f": 3.0, "neg": -7}"#).unwrap();
        let g = v.as_group().unwrap();
        assert_eq!(g.get("i"), Some(&Value::Int(3)));
        assert_eq!(g.get("f"), Some(&Value::Float(3.0)));
        assert_eq!(g.get("neg"), Some(&Value::Int(-7)));
    }

    #[test]
    fn object_order_is_preserved() {
        let v = parse(r#"{"zeta": 1, "alpha": 2, "mid": {"y": 1, "x": 2}}"#).unwrap();
        let g = v.as_group().unwrap();
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        let mid = g.get("mid").and_then(Value::as_group).unwrap();
        assert_eq!(mid.keys().collect::<Vec<_>>(), vec!["y", "x"]);
    }

    #[test]
    fn arrays_and_null_are_rejected_with_path() {
        let err = parse(r#"{"sys": {"list": [1, 2]}}"#).unwrap_err();
        match err {
            Error::UnsupportedValue { key, found } => {
                assert_eq!(key, "sys.list");
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = parse(r#"{"a": null}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { .. }));
    }

    #[test]
    fn huge_unsigned_is_rejected() {
        let err = parse(r#"{"big": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref key, .. } if key == "big"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut g = Group::new();
        g.insert("a", Value::Int(1));
        g.insert("b", Value::Int(2));
        let old = g.insert("a", Value::Int(10));
        assert_eq!(old, Some(Value::Int(1)));
        assert_eq!(g.len(), 2);
        assert_eq!(g.iter().next(), Some(("a", &Value::Int(10))));
    }

    #[test]
    fn equality_respects_order() {
        let mut ab = Group::new();
        ab.insert("a", Value::Int(1));
        ab.insert("b", Value::Int(2));
        let mut ba = Group::new();
        ba.insert("b", Value::Int(2));
        ba.insert("a", Value::Int(1));
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn wide_group_loads_every_key() {
        let body = (0..20_000)
            .map(|i| format!("\"k{i}\": {i}"))
            .collect::<Vec<_>>()
            .join(",");
        let v = parse(&format!("{{{body}}}")).unwrap();
        let g = v.as_group().unwrap();
        assert_eq!(g.len(), 20_000);
        assert_eq!(g.keys().next(), Some("k0"));
        assert_eq!(g.get("k19999"), Some(&Value::Int(19_999)));
    }

    #[test]
    fn get_or_insert_with_keeps_existing() {
        let mut g = Group::new();
        g.insert("a", Value::Int(1));
        *g.get_or_insert_with("b", Value::empty_group) = Value::Int(2);
        let a = g.get_or_insert_with("a", || Value::Int(99));
        assert_eq!(a, &Value::Int(1));
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn serializes_in_recorded_order() {
        let mut g = Group::new();
        g.insert("z", Value::Bool(true));
        g.insert("a", Value::from("x"));
        let text = serde_json::to_string(&Value::Group(g)).unwrap();
        assert_eq!(text, r#"{"z":true,"a":"x"}"#);
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ValueKind::Int.to_string(), "integer");
        assert_eq!(Value::Float(1.5).kind().to_string(), "float");
        assert_eq!(Value::empty_group().kind(), ValueKind::Group);
    }
}
