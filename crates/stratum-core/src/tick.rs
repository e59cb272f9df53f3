//! Scheduling keys shared by the scheduler and behavior handlers.

use std::fmt;

use crate::fluid::Fluid;
use crate::id::BlockTypeId;

/// Which of a cell's two tick channels an entry belongs to.
///
/// Pending updates are keyed by `(position, TargetKind)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    /// The cell's block.
    Block,
    /// The cell's fluid.
    Fluid,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Fluid => f.write_str("fluid"),
        }
    }
}

/// What a scheduled tick was scheduled for.
///
/// Recorded with the entry so that firing can detect a cell whose
/// contents changed kind since scheduling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickTarget {
    /// A block of the given type.
    Block(BlockTypeId),
    /// A fluid of the given kind.
    Fluid(Fluid),
}

impl TickTarget {
    /// The channel this target belongs to.
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Block(_) => TargetKind::Block,
            Self::Fluid(_) => TargetKind::Fluid,
        }
    }
}

/// Ordering among scheduled ticks that share a deadline.
///
/// Lower variants fire first; equal priorities fire in insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TickPriority {
    /// Fires before everything else at its deadline.
    ExtremelyHigh,
    /// Fires before `High`.
    VeryHigh,
    /// Fires before `Normal`.
    High,
    /// The default.
    #[default]
    Normal,
    /// Fires after `Normal`.
    Low,
    /// Fires after `Low`.
    VeryLow,
    /// Fires after everything else at its deadline.
    ExtremelyLow,
}
