//! Subcommands of the `simcfg` binary.

use clap::{Subcommand, ValueEnum};
use simcfg_common::{plural_count, Result};
use simcfg_config::{mask_indices, parse_list, parse_mask, ConfigStore, Value};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;

/// simcfg subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a mask expression such as "0 2:8:2"
    Mask {
        /// Whitespace-separated ranges (a, a:b, a:b:c)
        expr: String,
        /// Number of mask slots
        #[arg(long)]
        size: u32,
    },
    /// Split and parse a delimited list
    List {
        /// The list text, e.g. "1,2,,3"
        input: String,
        /// Characters that separate fields
        #[arg(long, default_value = ",")]
        delims: String,
        /// Element type
        #[arg(long, value_enum, default_value_t = ListKind::U32)]
        kind: ListKind,
    },
    /// Print the immediate children of a group
    Groups {
        /// Input configuration (JSON)
        config: PathBuf,
        /// Dotted key of the group; empty for the root
        #[arg(default_value = "")]
        key: String,
    },
    /// Read settings, then write the used configuration and report unused ones
    Check {
        /// Input configuration (JSON)
        config: PathBuf,
        /// Where to write the used configuration
        #[arg(long, short)]
        output: PathBuf,
        /// Required setting to read (any kind)
        #[arg(long = "read", value_name = "KEY")]
        reads: Vec<String>,
        /// Setting to read with a default; the JSON scalar picks the type
        #[arg(long = "default", value_name = "KEY=JSON", value_parser = parse_default)]
        defaults: Vec<DefaultRead>,
        /// Fail if any input setting was never read
        #[arg(long, env = "SIMCFG_STRICT")]
        strict: bool,
    },
}

/// Element type for `simcfg list`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    U32,
    U64,
    Str,
}

/// A `--default KEY=JSON` argument.
#[derive(Debug, Clone)]
pub struct DefaultRead {
    pub key: String,
    pub value: DefaultValue,
}

/// Scalar default; its variant picks the type the setting is read as.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Bool(bool),
    Float(f64),
    Str(String),
}

fn parse_default(arg: &str) -> std::result::Result<DefaultRead, String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=JSON, got '{arg}'"))?;
    let json: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("default for {key}: {e}"))?;
    let value = match Value::from_json(json).map_err(|e| e.to_string())? {
        Value::Int(i) => DefaultValue::Int(i),
        Value::Bool(b) => DefaultValue::Bool(b),
        Value::Float(f) => DefaultValue::Float(f),
        Value::Str(s) => DefaultValue::Str(s),
        Value::Group(_) => return Err(format!("default for {key} must be a scalar")),
    };
    Ok(DefaultRead {
        key: key.to_string(),
        value,
    })
}

/// Execute one subcommand.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Mask { expr, size } => run_mask(&expr, size),
        Command::List {
            input,
            delims,
            kind,
        } => run_list(&input, &delims, kind),
        Command::Groups { config, key } => run_groups(&config, &key),
        Command::Check {
            config,
            output,
            reads,
            defaults,
            strict,
        } => run_check(&config, &output, &reads, &defaults, strict),
    }
}

fn run_mask(expr: &str, size: u32) -> Result<()> {
    let mask = parse_mask(expr, size)?;
    let bits: String = mask.iter().map(|&set| if set { '1' } else { '0' }).collect();
    println!("{bits}");
    println!("{}", join(&mask_indices(&mask)));
    Ok(())
}

fn run_list(input: &str, delims: &str, kind: ListKind) -> Result<()> {
    match kind {
        ListKind::U32 => print_lines(&parse_list::<u32>(input, delims)?),
        ListKind::U64 => print_lines(&parse_list::<u64>(input, delims)?),
        ListKind::Str => print_lines(&parse_list::<String>(input, delims)?),
    }
    Ok(())
}

fn run_groups(config: &Path, key: &str) -> Result<()> {
    let store = ConfigStore::load(config)?;
    print_lines(&store.subgroups(key));
    Ok(())
}

fn run_check(
    config: &Path,
    output: &Path,
    reads: &[String],
    defaults: &[DefaultRead],
    strict: bool,
) -> Result<()> {
    let mut store = ConfigStore::load(config)?;

    for key in reads {
        let _: Value = store.get(key)?;
    }
    for read in defaults {
        let key = read.key.as_str();
        let got: Value = match &read.value {
            DefaultValue::Int(i) => store.get_or(key, *i)?.into(),
            DefaultValue::Bool(b) => store.get_or(key, *b)?.into(),
            DefaultValue::Float(f) => store.get_or(key, *f)?.into(),
            DefaultValue::Str(s) => store.get_or(key, s.clone())?.into(),
        };
        debug!(key, value = ?got, "default read");
    }

    let report = store.finalize(output, strict)?;
    println!(
        "wrote {} ({} unused, {} copied)",
        report.output.display(),
        plural_count(report.unused.len(), "setting"),
        plural_count(report.copied_private, "private setting"),
    );
    for key in &report.unused {
        println!("unused: {key}");
    }
    Ok(())
}

fn print_lines<T: Display>(items: &[T]) {
    for item in items {
        println!("{item}");
    }
}

fn join(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arg_picks_type_from_json() {
        let d = parse_default("sys.cores=4").unwrap();
        assert_eq!(d.key, "sys.cores");
        assert_eq!(d.value, DefaultValue::Int(4));

        let d = parse_default("sim.name=\"zsim\"").unwrap();
        assert_eq!(d.value, DefaultValue::Str("zsim".to_string()));

        let d = parse_default("a.b=true").unwrap();
        assert_eq!(d.value, DefaultValue::Bool(true));

        let d = parse_default("cpu.ipc=1.5").unwrap();
        assert_eq!(d.value, DefaultValue::Float(1.5));
    }

    #[test]
    fn default_arg_rejects_malformed() {
        assert!(parse_default("no-equals").is_err());
        assert!(parse_default("k={\"a\":1}").is_err());
        assert!(parse_default("k=[1]").is_err());
        assert!(parse_default("k=notjson").is_err());
    }

    #[test]
    fn join_indices() {
        assert_eq!(join(&[0, 2, 4]), "0,2,4");
        assert_eq!(join(&[]), "");
    }
}
