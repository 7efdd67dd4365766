//! The configuration store.
//!
//! A [`ConfigStore`] owns two trees: `input`, loaded once and never mutated,
//! and `used`, which mirrors every setting read (or defaulted) during
//! initialization. [`ConfigStore::finalize`] diffs the two to find unused
//! settings and writes `used` out as the effective configuration of the run.

use crate::access::{self, Setting};
use crate::path::{self, resolve_checked, resolve_read_only, segments};
use crate::value::{join_key, Group, Value};
use serde::Serialize;
use simcfg_common::{plural_count, Error, Result, OUTPUT_INDENT};
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Names starting with this marker are script-only metadata. They are copied
/// to the output verbatim at finalize and must never be read by the simulator.
pub const PRIVATE_PREFIX: char = '*';

/// Outcome of a successful [`ConfigStore::finalize`].
#[derive(Debug, Clone)]
pub struct FinalizeReport {
    /// Number of private (`*`-prefixed) settings copied to the output.
    pub copied_private: usize,
    /// Dotted paths of input settings that were never read.
    pub unused: Vec<String>,
    /// Where the used configuration was written.
    pub output: PathBuf,
}

/// Hierarchical configuration with read tracking.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    input: Value,
    used: Value,
}

impl ConfigStore {
    /// Load a JSON document from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let store = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(store)
    }

    /// Parse a JSON document held in memory.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(Value::from_json(json)?)
    }

    /// Wrap an already-built tree. The root must be a group.
    pub fn from_value(input: Value) -> Result<Self> {
        if !input.is_group() {
            return Err(Error::TypeMismatch {
                key: String::new(),
                expected: "group".to_string(),
                found: input.kind().to_string(),
            });
        }
        Ok(Self {
            input,
            used: Value::empty_group(),
        })
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn used(&self) -> &Value {
        &self.used
    }

    /// True if every segment of `key` is present in the input tree.
    /// Does not record anything.
    pub fn exists(&self, key: &str) -> bool {
        resolve_read_only(&self.input, &segments(key)).is_some()
    }

    /// Read a required setting and record it as used.
    pub fn get<T: Setting>(&mut self, key: &str) -> Result<T> {
        let value = lookup(&self.input, key)?;
        let out = access::convert::<T>(key, value)?;
        record(&mut self.used, key, value.clone(), false)?;
        Ok(out)
    }

    /// Read a setting, falling back to `default` when a segment is missing.
    /// Either way the returned value is recorded as used.
    ///
    /// A scalar in the input where the path needs a group is a
    /// [`Error::TypeConflict`], not a missing key.
    pub fn get_or<T: Setting + Debug>(&mut self, key: &str, default: T) -> Result<T> {
        match find(&self.input, key)? {
            Some(value) => {
                let out = access::convert::<T>(key, value)?;
                record(&mut self.used, key, value.clone(), false)?;
                Ok(out)
            }
            None => {
                let recorded = access::default_value(key, &default)?;
                record(&mut self.used, key, recorded, true)?;
                Ok(default)
            }
        }
    }

    /// Read a required string setting as a view into the store.
    pub fn get_str(&mut self, key: &str) -> Result<&str> {
        let value = lookup(&self.input, key)?;
        let Value::Str(s) = value else {
            return Err(access::mismatch::<String>(key, value.kind()));
        };
        record(&mut self.used, key, Value::Str(s.clone()), false)?;
        Ok(s)
    }

    /// Read a string setting, falling back to `default`. The result borrows
    /// from either the store or the caller's default.
    pub fn get_str_or<'a>(&'a mut self, key: &str, default: &'a str) -> Result<&'a str> {
        match find(&self.input, key)? {
            Some(Value::Str(s)) => {
                record(&mut self.used, key, Value::Str(s.clone()), false)?;
                Ok(s)
            }
            Some(other) => Err(access::mismatch::<String>(key, other.kind())),
            None => {
                record(&mut self.used, key, Value::from(default), true)?;
                Ok(default)
            }
        }
    }

    /// Names of the immediate children of the group at `key`, in input order.
    ///
    /// A missing key or a scalar yields an empty list.
    pub fn subgroups(&self, key: &str) -> Vec<&str> {
        match resolve_read_only(&self.input, &segments(key)) {
            Some(Value::Group(group)) => group.keys().collect(),
            _ => Vec::new(),
        }
    }

    /// Dotted paths of input settings with no counterpart in the used tree.
    ///
    /// A group that was never touched is reported once, not per leaf.
    pub fn unused_settings(&self) -> Vec<String> {
        let mut unused = Vec::new();
        if let (Value::Group(input), Value::Group(used)) = (&self.input, &self.used) {
            collect_unused(input, used, "", &mut unused);
        }
        unused
    }

    /// Copy every `*`-prefixed input setting into the used tree.
    ///
    /// Descends into groups present in both trees. Fails if a private setting
    /// was already recorded, since that means the simulator read it.
    pub fn copy_private_settings(&mut self) -> Result<usize> {
        match (&self.input, &mut self.used) {
            (Value::Group(input), Value::Group(used)) => copy_private(input, used, ""),
            _ => Ok(0),
        }
    }

    /// The used tree as an indented JSON document with a trailing newline.
    pub fn render_used(&self) -> Result<String> {
        let buf = self.used_json()?;
        Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
    }

    fn used_json(&self) -> Result<Vec<u8>> {
        let indent = vec![b' '; OUTPUT_INDENT];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.used.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// End the configuration phase.
    ///
    /// Copies private settings, reports unused ones, and writes the used tree
    /// to `output`. With `strict`, any unused setting is an error and nothing
    /// is written.
    pub fn finalize(mut self, output: impl AsRef<Path>, strict: bool) -> Result<FinalizeReport> {
        let output = output.as_ref();

        let copied_private = self.copy_private_settings()?;
        if copied_private > 0 {
            info!(
                "Copied {} to output config",
                plural_count(copied_private, "non-sim var")
            );
        }

        let unused = self.unused_settings();
        for key in &unused {
            warn!(key = %key, "setting not used during configuration");
        }
        if !unused.is_empty() {
            if strict {
                return Err(Error::UnusedSettings {
                    count: unused.len(),
                });
            }
            warn!(
                "{} not used during configuration",
                plural_count(unused.len(), "setting")
            );
        }

        let json = self.used_json()?;
        fs::write(output, json).map_err(|e| Error::io(output, e))?;
        info!(path = %output.display(), "used configuration written");

        Ok(FinalizeReport {
            copied_private,
            unused,
            output: output.to_path_buf(),
        })
    }
}

fn find<'a>(input: &'a Value, key: &str) -> Result<Option<&'a Value>> {
    resolve_checked(input, &segments(key))
}

fn lookup<'a>(input: &'a Value, key: &str) -> Result<&'a Value> {
    find(input, key)?.ok_or_else(|| Error::MissingKey {
        key: key.to_string(),
    })
}

fn record(used: &mut Value, key: &str, value: Value, defaulted: bool) -> Result<()> {
    path::write(used, key, value)?;
    debug!(key, defaulted, "setting read");
    Ok(())
}

/// A setting whose used counterpart is missing, or has a different kind, was
/// never read as what the input holds.
fn collect_unused(input: &Group, used: &Group, prefix: &str, out: &mut Vec<String>) {
    for (name, value) in input.iter() {
        let key = join_key(prefix, name);
        match (value, used.get(name)) {
            (Value::Group(input_child), Some(Value::Group(used_child))) => {
                collect_unused(input_child, used_child, &key, out)
            }
            (input_value, Some(used_value)) if input_value.kind() == used_value.kind() => {}
            _ => out.push(key),
        }
    }
}

fn copy_private(input: &Group, used: &mut Group, prefix: &str) -> Result<usize> {
    let mut copied = 0;
    for (name, value) in input.iter() {
        let key = join_key(prefix, name);
        if name.starts_with(PRIVATE_PREFIX) {
            if used.contains(name) {
                return Err(Error::PrivateSettingRead { key });
            }
            used.insert(name, value.clone());
            copied += 1;
        } else if let (Value::Group(input_child), Some(Value::Group(used_child))) =
            (value, used.get_mut(name))
        {
            copied += copy_private(input_child, used_child, &key)?;
        }
    }
    Ok(copied)
}
