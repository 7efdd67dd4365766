//! simcfg hierarchical configuration store.
//!
//! This crate provides:
//! - An ordered value tree loaded from JSON
//! - Dotted key-path resolution with explicit read and write entry points
//! - Typed reads with default fallback that record every setting consulted
//! - Finalization: unused-setting detection, private-setting copy-through,
//!   and emission of the effective ("used") configuration
//! - Compact mask (`0 2:8:2`) and list (`1,2,3`) value syntaxes
//!
//! All errors are fatal to the configuration phase. Callers are expected to
//! report them and stop, never retry.

pub mod access;
pub mod list;
pub mod mask;
pub mod path;
pub mod store;
pub mod value;

pub use access::Setting;
pub use list::{parse_list, ListItem};
pub use mask::{mask_indices, parse_mask, Range};
pub use simcfg_common::{Error, Result};
pub use store::{ConfigStore, FinalizeReport, PRIVATE_PREFIX};
pub use value::{Group, Value, ValueKind};
