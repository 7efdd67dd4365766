//! Range-set masks.
//!
//! A mask expression is a whitespace-separated list of ranges:
//!
//! | token   | positions                     |
//! |---------|-------------------------------|
//! | `a`     | `a`                           |
//! | `a:b`   | `a, a+1, ..., b-1`            |
//! | `a:b:c` | `a, a+c, a+2c, ...` below `b` |
//!
//! `"0 2:8:2"` over 8 slots selects `0, 2, 4, 6`. Every malformed token and
//! every position outside the mask is an error; nothing is clamped.

use simcfg_common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Arithmetic index sequence `min, min+step, ...` strictly below `sup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    min: u32,
    sup: u32,
    step: u32,
}

impl Range {
    /// Build a range, enforcing `step > 0` and `min < sup`.
    pub fn new(min: u32, sup: u32, step: u32) -> Result<Self> {
        let range = Self { min, sup, step };
        if step == 0 {
            return Err(Error::RangeBounds(format!("range {range} has 0 step")));
        }
        if min >= sup {
            return Err(Error::RangeBounds(format!("range {range} has min >= sup")));
        }
        Ok(range)
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn sup(&self) -> u32 {
        self.sup
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Every position the range selects, in increasing order.
    pub fn positions(&self) -> impl Iterator<Item = u64> {
        (u64::from(self.min)..u64::from(self.sup)).step_by(self.step as usize)
    }

    /// Set every selected position of `mask`.
    pub fn fill(&self, mask: &mut [bool]) -> Result<()> {
        let size = mask.len();
        for pos in self.positions() {
            let slot = usize::try_from(pos)
                .ok()
                .and_then(|i| mask.get_mut(i))
                .ok_or_else(|| {
                    Error::RangeBounds(format!(
                        "range {self} includes out-of-bounds {pos} (mask size {size})"
                    ))
                })?;
            *slot = true;
        }
        Ok(())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.min, self.sup, self.step)
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let parts = token
            .split(':')
            .map(|part| parse_part(part, token))
            .collect::<Result<Vec<u32>>>()?;

        match parts.as_slice() {
            [a] => match a.checked_add(1) {
                Some(sup) => Range::new(*a, sup, 1),
                None => Err(Error::RangeBounds(format!(
                    "range '{token}' exceeds the largest position"
                ))),
            },
            [a, b] => Range::new(*a, *b, 1),
            [a, b, c] => Range::new(*a, *b, *c),
            _ => Err(Error::RangeSyntax(format!(
                "range '{token}' can only have 1-3 numbers delimited by ':', {} parsed",
                parts.len()
            ))),
        }
    }
}

fn parse_part(part: &str, token: &str) -> Result<u32> {
    if part.is_empty() {
        return Err(Error::RangeSyntax(format!(
            "empty number in range '{token}'"
        )));
    }
    if let Some(digits) = part.strip_prefix('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::RangeBounds(format!(
                "range '{token}' has negative numbers"
            )));
        }
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::RangeSyntax(format!(
            "{part} in range '{token}' is not a valid number"
        )));
    }
    part.parse::<u32>().map_err(|_| {
        Error::RangeBounds(format!("{part} in range '{token}' is too large"))
    })
}

/// Parse `expr` into a mask of `size` slots.
pub fn parse_mask(expr: &str, size: u32) -> Result<Vec<bool>> {
    let mut mask = vec![false; size as usize];
    for token in expr.split_ascii_whitespace() {
        let range: Range = token.parse()?;
        range.fill(&mut mask)?;
    }
    Ok(mask)
}

/// Indices of the set slots of `mask`.
pub fn mask_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &set)| set.then_some(i))
        .collect()
}
