//! Pluralization for log and error messages.

/// Return "s" suffix for plural counts.
///
/// - `plural_s(0)` -> `"s"` (0 settings)
/// - `plural_s(1)` -> `""` (1 setting)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Format count with noun, handling pluralization.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
