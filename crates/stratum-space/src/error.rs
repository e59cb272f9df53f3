//! Error types for space construction.

use std::fmt;

use stratum_core::BlockPos;

/// Errors arising from space construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// A box's minimum corner exceeds its maximum on some axis.
    InvertedBounds {
        /// Requested minimum corner.
        min: BlockPos,
        /// Requested maximum corner.
        max: BlockPos,
    },
    /// The space would hold more cells than `usize` can count.
    TooManyCells,
    /// Attempted to construct a space with zero cells.
    EmptySpace,
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedBounds { min, max } => {
                write!(f, "box minimum {min} exceeds maximum {max}")
            }
            Self::TooManyCells => write!(f, "space has too many cells to index"),
            Self::EmptySpace => write!(f, "space must have at least one cell"),
        }
    }
}

impl std::error::Error for SpaceError {}
