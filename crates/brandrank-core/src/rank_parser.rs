//! Recovering a brand's rank from free-form generated text.
//!
//! Generated answers are expected to contain a numbered list, one entry per
//! line (`"3. Acme Cloud - great for teams"`). Only those lines are
//! considered; prose in between is ignored, and a bare mention of the brand
//! outside a numbered line does not produce a rank.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BrandIdentity, MatchOutcome, MatchedItem};

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*").expect("valid numbered-line regex"));

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("valid decimal-digit regex"));

/// Find the first numbered line that mentions the brand and apply the
/// position policy to its number.
///
/// Scanning stops at the first qualifying line even when its number falls
/// outside the tracked window.
#[must_use]
pub fn parse_ranking<'a>(text: &'a str, brand: &BrandIdentity) -> MatchOutcome<'a> {
    let needle = brand.name.trim().to_lowercase();
    if needle.is_empty() {
        return MatchOutcome::not_found();
    }

    for line in text.lines().map(str::trim) {
        let Some(rank) = numbered_rank(line) else {
            continue;
        };
        if line.to_lowercase().contains(&needle) {
            return MatchOutcome::from_raw(Some(rank), Some(MatchedItem::Line(line)));
        }
    }

    MatchOutcome::not_found()
}

/// Leading list number of a trimmed line, if it has one.
///
/// Any Unicode decimal digits count (`１.`, `٣.`). A number too large for
/// `u32` still marks a list entry; it saturates so the position policy
/// rejects it.
fn numbered_rank(line: &str) -> Option<u32> {
    let captures = NUMBERED_LINE.captures(line)?;
    captures
        .get(1)?
        .as_str()
        .chars()
        .try_fold(0u32, |acc, c| {
            Some(acc.saturating_mul(10).saturating_add(digit_value(c)?))
        })
}

/// Numeric value of a decimal digit from any script.
///
/// Unicode encodes decimal digits in contiguous runs of 0 through 9, some of
/// them back to back, so the value is the offset from the start of the run
/// modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let code = u32::from(c);
    let mut start = code;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((code - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}
