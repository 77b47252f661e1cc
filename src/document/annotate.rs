//! Tate-chu-yoko detection for short digit runs.
//!
//! In vertical text a run of two or three half-width digits is set
//! horizontally inside a single column cell. Single digits stay upright and
//! longer runs (years, phone numbers) are read as numbers and stay vertical.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Two or three ASCII digits. `\d` would also match non-ASCII digits.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[0-9]{2,3}").expect("digit run pattern is valid"));

/// Byte ranges of `line` that should be rendered combined.
///
/// A candidate run qualifies only when neither neighboring char is a digit,
/// which rules out every slice of a run of four or more digits.
pub fn digit_runs(line: &str) -> Vec<Range<usize>> {
    DIGIT_RUN
        .find_iter(line)
        .filter(|m| is_isolated(line, m.start(), m.end()))
        .map(|m| m.range())
        .collect()
}

fn is_isolated(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let after = line[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}
