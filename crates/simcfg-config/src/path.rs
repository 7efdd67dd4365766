//! Dotted key paths and tree resolution.
//!
//! A key such as `"cache.l2.size"` walks the tree one segment at a time.
//! Empty segments are ordinary names (`"a..b"` has a middle segment `""`);
//! only the completely empty key addresses the root itself.
//!
//! Reads and writes use separate entry points: [`resolve_read_only`] and
//! [`resolve_checked`] never allocate, [`resolve_or_create`] materializes
//! missing groups.

use crate::value::{Group, Value};
use simcfg_common::{Error, Result};

/// Split a dotted key into its segments. The empty key has no segments.
pub fn segments(key: &str) -> Vec<&str> {
    if key.is_empty() {
        Vec::new()
    } else {
        key.split('.').collect()
    }
}

/// Walk `path` from `root` without creating anything.
///
/// Returns `None` as soon as a segment is missing or a scalar sits where a
/// group would be needed to continue.
pub fn resolve_read_only<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut node = root;
    for segment in path {
        node = node.as_group()?.get(segment)?;
    }
    Some(node)
}

/// Walk `path` from `root`, telling a missing segment apart from a scalar
/// that blocks the walk.
///
/// A missing segment is `Ok(None)`. A scalar met before the last segment is
/// [`Error::TypeConflict`] naming the prefix that holds it, the same error a
/// write through that scalar would raise.
pub fn resolve_checked<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Value>> {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        let Value::Group(group) = node else {
            return Err(Error::TypeConflict {
                key: path[..depth].join("."),
                found: node.kind().to_string(),
            });
        };
        match group.get(segment) {
            Some(child) => node = child,
            None => return Ok(None),
        }
    }
    Ok(Some(node))
}

/// Walk `path` from `root`, creating empty groups for missing segments.
///
/// Fails with [`Error::TypeConflict`] when an existing scalar blocks the walk;
/// the error names the prefix holding that scalar.
pub fn resolve_or_create<'a>(root: &'a mut Value, path: &[&str]) -> Result<&'a mut Value> {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        node = match node {
            Value::Group(group) => group.get_or_insert_with(segment, Value::empty_group),
            other => {
                return Err(Error::TypeConflict {
                    key: path[..depth].join("."),
                    found: other.kind().to_string(),
                })
            }
        };
    }
    Ok(node)
}

/// Store `value` at `key`, creating intermediate groups as needed.
///
/// Replacing a scalar with a scalar is allowed so re-recording the same key
/// is idempotent. Replacing a group with a scalar, or writing a scalar at the
/// root, is a [`Error::TypeConflict`].
pub fn write(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let path = segments(key);
    let Some((leaf, parents)) = path.split_last() else {
        return match value {
            Value::Group(_) => {
                *root = value;
                Ok(())
            }
            other => Err(Error::TypeConflict {
                key: String::new(),
                found: format!("{} written over the root group", other.kind()),
            }),
        };
    };

    let parent = resolve_or_create(root, parents)?;
    let group: &mut Group = match parent {
        Value::Group(group) => group,
        other => {
            return Err(Error::TypeConflict {
                key: parents.join("."),
                found: other.kind().to_string(),
            })
        }
    };

    if let Some(existing) = group.get(leaf) {
        if existing.is_group() && !value.is_group() {
            return Err(Error::TypeConflict {
                key: key.to_string(),
                found: existing.kind().to_string(),
            });
        }
    }
    group.insert(*leaf, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> Value {
        Value::from_json(serde_json::from_str(text).unwrap()).unwrap()
    }

    #[test]
    fn segments_keep_empty_components() {
        assert!(segments("").is_empty());
        assert_eq!(segments("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(segments("a."), vec!["a", ""]);
        assert_eq!(segments(".a"), vec!["", "a"]);
        assert_eq!(segments("a..b"), vec!["a", "", "b"]);
        assert_eq!(segments("."), vec!["", ""]);
    }

    #[test]
    fn read_walks_nested_groups() {
        let root = tree(r#"{"cache": {"l2": {"size": 256}}}"#);
        let found = resolve_read_only(&root, &segments("cache.l2.size"));
        assert_eq!(found, Some(&Value::Int(256)));
    }

    #[test]
    fn read_of_empty_key_is_root() {
        let root = tree(r#"{"a": 1}"#);
        let found = resolve_read_only(&root, &segments("")).unwrap();
        assert!(found.is_group());
    }

    #[test]
    fn read_stops_at_missing_or_scalar() {
        let root = tree(r#"{"a": {"b": 1}}"#);
        assert!(resolve_read_only(&root, &segments("a.c")).is_none());
        assert!(resolve_read_only(&root, &segments("a.b.c")).is_none());
        assert!(resolve_read_only(&root, &segments("x")).is_none());
    }

    #[test]
    fn checked_read_names_blocking_scalar() {
        let root = tree(r#"{"a": {"b": 1}}"#);
        assert_eq!(
            resolve_checked(&root, &segments("a.b")).unwrap(),
            Some(&Value::Int(1))
        );
        assert_eq!(resolve_checked(&root, &segments("a.c.d")).unwrap(), None);
        assert_eq!(resolve_checked(&root, &segments("x")).unwrap(), None);

        let err = resolve_checked(&root, &segments("a.b.c.d")).unwrap_err();
        match err {
            Error::TypeConflict { key, found } => {
                assert_eq!(key, "a.b");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_segment_is_a_real_name() {
        let root = tree(r#"{"a": {"": {"b": 5}}}"#);
        assert_eq!(
            resolve_read_only(&root, &segments("a..b")),
            Some(&Value::Int(5))
        );
    }

    #[test]
    fn write_creates_intermediate_groups() {
        let mut root = Value::empty_group();
        write(&mut root, "sys.cores.count", Value::Int(4)).unwrap();
        assert_eq!(
            resolve_read_only(&root, &segments("sys.cores.count")),
            Some(&Value::Int(4))
        );
        let sys = resolve_read_only(&root, &segments("sys")).unwrap();
        assert!(sys.is_group());
    }

    #[test]
    fn write_twice_keeps_single_entry() {
        let mut root = Value::empty_group();
        write(&mut root, "a.b", Value::Int(1)).unwrap();
        write(&mut root, "a.b", Value::Int(1)).unwrap();
        let a = resolve_read_only(&root, &segments("a"))
            .and_then(Value::as_group)
            .unwrap();
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn write_through_scalar_is_conflict() {
        let mut root = Value::empty_group();
        write(&mut root, "a", Value::Int(1)).unwrap();
        let err = write(&mut root, "a.b", Value::Int(2)).unwrap_err();
        match err {
            Error::TypeConflict { key, found } => {
                assert_eq!(key, "a");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalar_over_group_is_conflict() {
        let mut root = Value::empty_group();
        write(&mut root, "a.b", Value::Int(1)).unwrap();
        let err = write(&mut root, "a", Value::Bool(true)).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref key, .. } if key == "a"));
    }

    #[test]
    fn scalar_at_root_is_conflict() {
        let mut root = Value::empty_group();
        assert!(matches!(
            write(&mut root, "", Value::Int(1)),
            Err(Error::TypeConflict { .. })
        ));
    }

    #[test]
    fn resolve_or_create_returns_existing_node() {
        let mut root = tree(r#"{"a": {"b": 1}}"#);
        let node = resolve_or_create(&mut root, &["a"]).unwrap();
        assert_eq!(node.as_group().map(|g| g.len()), Some(1));
    }
}
