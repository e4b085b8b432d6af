//! Error types.
//!
//! Misses (`find`/`erase` on an absent key) are not errors; they come back
//! as `None`.

use std::fmt as StdFmt;

// ============================================================================
//  InsertError
// ============================================================================

/// Why an insert did not add an element.
///
/// The list is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The key is present and the list rejects duplicates.
    DuplicateKey,

    /// The node allocator had no block for the new node.
    AllocationFailed {
        /// Requested block size in bytes.
        size: usize,

        /// Requested block alignment in bytes.
        align: usize,
    },
}

impl StdFmt::Display for InsertError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "key already present"),

            Self::AllocationFailed { size, align } => {
                write!(f, "node allocation failed ({size} bytes, align {align})")
            }
        }
    }
}

impl std::error::Error for InsertError {}

// ============================================================================
//  InvariantViolation
// ============================================================================

/// A broken structural invariant found by
/// [`SkipList::check_invariants`](crate::SkipList::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two neighbours on a level are out of order.
    Unordered {
        /// Level the pair was found on.
        level: usize,
        /// Level-0 position of the second node of the pair.
        position: usize,
    },

    /// A node on `level` is not on the level below.
    NotSubsequence {
        /// Offending level.
        level: usize,
    },

    /// A node links to itself.
    SelfLink {
        /// Level of the self link.
        level: usize,
        /// Level-0 position of the node.
        position: usize,
    },

    /// A node carries a link on a level it is not part of.
    StaleLink {
        /// Level of the link.
        level: usize,
        /// Level-0 position of the node.
        position: usize,
    },

    /// A level chain points at a node not on level 0.
    Dangling {
        /// Offending level.
        level: usize,
    },

    /// The head has an empty link while the list holds two or more elements.
    HeadGap {
        /// First empty level.
        level: usize,
    },

    /// The maintained length disagrees with the level-0 walk.
    LengthDrift {
        /// Maintained counter.
        size: usize,
        /// Recounted nodes.
        count: usize,
    },
}

impl StdFmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::Unordered { level, position } => {
                write!(f, "level {level}: node at position {position} is out of order")
            }

            Self::NotSubsequence { level } => {
                write!(f, "level {level} is not a subsequence of level {}", level - 1)
            }

            Self::SelfLink { level, position } => {
                write!(f, "level {level}: node at position {position} links to itself")
            }

            Self::StaleLink { level, position } => {
                write!(f, "level {level}: node at position {position} is off the level but linked")
            }

            Self::Dangling { level } => {
                write!(f, "level {level} reaches a node missing from level 0")
            }

            Self::HeadGap { level } => write!(f, "head has no link on level {level}"),

            Self::LengthDrift { size, count } => {
                write!(f, "size {size} disagrees with counted {count} nodes")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

// ============================================================================
//  ParseDirectionError
// ============================================================================

/// An unrecognised direction string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    input: String,
}

impl ParseDirectionError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl StdFmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        write!(
            f,
            "unknown direction {:?} (expected \"natural\" or \"reversed\")",
            self.input
        )
    }
}

impl std::error::Error for ParseDirectionError {}
