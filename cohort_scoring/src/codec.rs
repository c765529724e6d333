//! Rank labels.
//!
//! A ballot with `N` options is presented as a grid with `N` columns. Each column
//! is labelled with the rank and the points it earns, for example `1st (3 pts)`,
//! `2nd (2 pts)`, `3rd (1 pt)`. The best rank earns `N` points and the worst earns 1.
//!
//! The label is the value recorded by the form provider, so the same format
//! is parsed back when the answers are collected.

use log::{debug, warn};
use snafu::prelude::*;

use crate::config::*;

/// The rank and the points recovered from a label.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct RankPoints {
    pub rank: u32,
    pub points: u32,
}

/// Points earned by `rank` on a ballot with `n` options.
pub fn points_for_rank(rank: u32, n: u32) -> Result<u32, LabelError> {
    ensure!((1..=n).contains(&rank), RankOutOfRangeSnafu { rank, n });
    Ok(n - rank + 1)
}

/// Builds the label for `rank` on a ballot with `n` options.
pub fn encode(rank: u32, n: u32) -> Result<RankLabel, LabelError> {
    let points = points_for_rank(rank, n)?;
    let unit = if points == 1 { "pt" } else { "pts" };
    Ok(RankLabel {
        rank,
        points,
        text: format!("{}{} ({} {})", rank, ordinal_suffix(rank), points, unit),
    })
}

/// All the labels of a ballot with `n` options, best rank first.
pub fn labels(n: u32) -> Vec<RankLabel> {
    (1..=n).filter_map(|rank| encode(rank, n).ok()).collect()
}

/// Parses a label back into a rank and points.
///
/// The leading integer is the rank. If the label also carries a point value in
/// parentheses, that value is kept as recorded, even if it does not match `n`:
/// the ballot may have had a different number of options when it was filled.
/// Otherwise the points are computed from the rank and `n`.
///
/// A rank too large for a `u32` is reported as out of range with `rank`
/// saturated to `u32::MAX`.
pub fn decode(label: &str, n: u32) -> Result<RankPoints, LabelError> {
    let s = label.trim();
    let digits = leading_digits(s);
    ensure!(!digits.is_empty(), UnparsableLabelSnafu { label });
    let rank = digits
        .parse::<u32>()
        .ok()
        .context(RankOutOfRangeSnafu { rank: u32::MAX, n })?;
    ensure!(rank >= 1, RankOutOfRangeSnafu { rank, n });

    let recorded = match s.find('(') {
        Some(idx) => {
            let digits = leading_digits(s[idx + 1..].trim_start());
            if digits.is_empty() {
                None
            } else {
                Some(digits.parse::<u32>().ok().context(UnparsableLabelSnafu { label })?)
            }
        }
        None => None,
    };
    let points = match recorded {
        Some(0) => {
            warn!("decode: label {:?} records 0 points", label);
            0
        }
        Some(points) => {
            if rank <= n && points != n - rank + 1 {
                debug!(
                    "decode: label {:?} records {} points, {} expected with {} options",
                    label,
                    points,
                    n - rank + 1,
                    n
                );
            }
            points
        }
        None => points_for_rank(rank, n)?,
    };
    Ok(RankPoints { rank, points })
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    &s[..end]
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
