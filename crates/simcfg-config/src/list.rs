//! Delimited value lists, e.g. `"1000,2000,,3000"`.

use simcfg_common::{Error, Result};

/// Element type of a parsed list.
pub trait ListItem: Sized {
    /// Parse one non-empty field, or `None` if it is not a valid `Self`.
    fn parse_item(field: &str) -> Option<Self>;
}

macro_rules! numeric_item {
    ($($t:ty),*) => {
        $(
            impl ListItem for $t {
                fn parse_item(field: &str) -> Option<Self> {
                    field.trim().parse().ok()
                }
            }
        )*
    };
}

numeric_item!(u32, u64, i32, i64, f64);

/// Strings are taken verbatim, surrounding whitespace included.
impl ListItem for String {
    fn parse_item(field: &str) -> Option<Self> {
        Some(field.to_string())
    }
}

/// Split `input` on any character of `delimiters` and parse each field.
///
/// Empty fields are skipped. The first field that does not parse fails the
/// whole list.
pub fn parse_list<T: ListItem>(input: &str, delimiters: &str) -> Result<Vec<T>> {
    input
        .split(|c: char| delimiters.contains(c))
        .filter(|field| !field.is_empty())
        .map(|field| {
            T::parse_item(field).ok_or_else(|| Error::ListParse {
                field: field.to_string(),
                input: input.to_string(),
            })
        })
        .collect()
}
