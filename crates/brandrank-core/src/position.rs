//! Normalization of raw ranks into stored positions.

use serde::{Serialize, Serializer};

/// Highest rank that still counts as a placement (first page of results).
pub const MAX_TRACKED_RANK: u32 = 10;

/// Label used wherever the not-found sentinel is rendered as text.
pub const NOT_FOUND_LABEL: &str = "Not Found";

/// A stored position: a rank inside `1..=MAX_TRACKED_RANK`, or not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Ranked(u8),
    NotFound,
}

impl Position {
    #[must_use]
    pub fn is_mentioned(self) -> bool {
        matches!(self, Position::Ranked(_))
    }

    #[must_use]
    pub fn rank(self) -> Option<u8> {
        match self {
            Position::Ranked(rank) => Some(rank),
            Position::NotFound => None,
        }
    }

    /// Column value for the `position SMALLINT NULL` columns.
    #[must_use]
    pub fn as_db_value(self) -> Option<i16> {
        self.rank().map(i16::from)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Ranked(rank) => write!(f, "{rank}"),
            Position::NotFound => f.write_str(NOT_FOUND_LABEL),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Position::Ranked(rank) => serializer.serialize_u8(*rank),
            Position::NotFound => serializer.serialize_str(NOT_FOUND_LABEL),
        }
    }
}

/// Map a raw matcher/parser rank onto a stored [`Position`].
///
/// Only ranks in `1..=10` survive. Anything past the first page, a zero rank,
/// or no rank at all becomes [`Position::NotFound`], whichever source
/// produced it.
#[must_use]
pub fn apply_position_policy(raw_rank: Option<u32>) -> Position {
    match raw_rank {
        Some(rank @ 1..=MAX_TRACKED_RANK) => {
            // 1..=10 always fits in u8.
            u8::try_from(rank).map_or(Position::NotFound, Position::Ranked)
        }
        _ => Position::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ten_is_kept() {
        let position = apply_position_policy(Some(10));
        assert_eq!(position, Position::Ranked(10));
        assert!(position.is_mentioned());
    }

    #[test]
    fn rank_one_is_kept() {
        assert_eq!(apply_position_policy(Some(1)), Position::Ranked(1));
    }

    #[test]
    fn rank_eleven_is_suppressed() {
        let position = apply_position_policy(Some(11));
        assert_eq!(position, Position::NotFound);
        assert!(!position.is_mentioned());
    }

    #[test]
    fn missing_rank_is_not_found() {
        assert_eq!(apply_position_policy(None), Position::NotFound);
    }

    #[test]
    fn zero_rank_is_not_found() {
        assert_eq!(apply_position_policy(Some(0)), Position::NotFound);
    }

    #[test]
    fn huge_rank_is_not_found() {
        assert_eq!(apply_position_policy(Some(u32::MAX)), Position::NotFound);
    }

    #[test]
    fn db_value_is_null_for_sentinel() {
        assert_eq!(Position::NotFound.as_db_value(), None);
        assert_eq!(Position::Ranked(3).as_db_value(), Some(3));
    }

    #[test]
    fn serializes_rank_as_number_and_sentinel_as_label() {
        assert_eq!(serde_json::to_value(Position::Ranked(4)).unwrap(), 4);
        assert_eq!(
            serde_json::to_value(Position::NotFound).unwrap(),
            NOT_FOUND_LABEL
        );
    }

    #[test]
    fn display_matches_serialized_label() {
        assert_eq!(Position::NotFound.to_string(), "Not Found");
        assert_eq!(Position::Ranked(7).to_string(), "7");
    }
}
