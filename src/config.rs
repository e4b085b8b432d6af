//! Construction-time configuration for [`SkipList`](crate::SkipList).
//!
//! Everything here is fixed for the lifetime of a list.

use std::fmt as StdFmt;
use std::str::FromStr;

use crate::error::ParseDirectionError;
use crate::height::HeightDistribution;

/// Sort direction of a list.
///
/// Two lists over the same key domain with opposite directions give mirror
/// views of one ordering, e.g. bid and ask price levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest key first.
    #[default]
    Natural,

    /// Largest key first.
    Reversed,
}

impl Direction {
    /// `true` if `a` sorts strictly before `b` in this direction.
    #[inline(always)]
    #[must_use]
    pub fn before<K: Ord + ?Sized>(self, a: &K, b: &K) -> bool {
        match self {
            Self::Natural => a < b,
            Self::Reversed => b < a,
        }
    }

    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Natural => Self::Reversed,
            Self::Reversed => Self::Natural,
        }
    }
}

impl StdFmt::Display for Direction {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::Reversed => write!(f, "reversed"),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" | "asc" | "ascending" => Ok(Self::Natural),

            "reversed" | "desc" | "descending" => Ok(Self::Reversed),

            _ => Err(ParseDirectionError::new(s)),
        }
    }
}

/// What `insert` does with a key that is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Reject the insert and leave the list unchanged.
    #[default]
    Reject,

    /// Keep both. Equal keys sit next to each other; lookups and erases
    /// address the first one in traversal order.
    Allow,
}

/// Options captured when a list is built.
///
/// # Example
///
/// ```rust
/// use cacheskip::{Direction, HeightDistribution, SkipListConfig};
///
/// let config = SkipListConfig::new(Direction::Reversed)
///     .with_height(HeightDistribution::SquareRoot)
///     .with_seed(7);
///
/// assert_eq!(config.direction, Direction::Reversed);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipListConfig {
    /// Sort direction.
    pub direction: Direction,

    /// Duplicate key handling.
    pub duplicates: DuplicatePolicy,

    /// Height distribution for new nodes.
    pub height: HeightDistribution,

    /// Generator seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl SkipListConfig {
    /// Default options with the given direction.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            duplicates: DuplicatePolicy::Reject,
            height: HeightDistribution::Logarithmic,
            seed: None,
        }
    }

    /// Set the duplicate policy.
    #[must_use]
    pub const fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Set the height distribution.
    #[must_use]
    pub const fn with_height(mut self, height: HeightDistribution) -> Self {
        self.height = height;
        self
    }

    /// Fix the generator seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `true` when duplicate keys are accepted.
    #[inline]
    #[must_use]
    pub const fn allow_duplicates(&self) -> bool {
        matches!(self.duplicates, DuplicatePolicy::Allow)
    }
}

impl From<Direction> for SkipListConfig {
    fn from(direction: Direction) -> Self {
        Self::new(direction)
    }
}
