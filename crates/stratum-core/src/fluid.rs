//! Fluid kinds and per-cell fluid state.

use std::fmt;

/// A kind of fluid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fluid {
    /// No fluid.
    Empty,
    /// Water.
    Water,
    /// Lava.
    Lava,
}

impl fmt::Display for Fluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Water => "water",
            Self::Lava => "lava",
        };
        f.write_str(name)
    }
}

/// Fluid occupying a cell, alongside (not instead of) its block state.
///
/// Levels run `1..=8`; a non-falling level-8 fluid is a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FluidState {
    /// The fluid kind.
    pub fluid: Fluid,
    /// Fill level, `0` only for [`Fluid::Empty`].
    pub level: u8,
    /// Whether the fluid is falling from above.
    pub falling: bool,
}

impl FluidState {
    /// Highest fill level.
    pub const MAX_LEVEL: u8 = 8;

    /// No fluid.
    pub const EMPTY: FluidState = FluidState {
        fluid: Fluid::Empty,
        level: 0,
        falling: false,
    };

    /// A source block of `fluid`.
    pub fn source(fluid: Fluid) -> Self {
        if fluid == Fluid::Empty {
            return Self::EMPTY;
        }
        Self {
            fluid,
            level: Self::MAX_LEVEL,
            falling: false,
        }
    }

    /// A flowing fluid at `level`, clamped to `1..=MAX_LEVEL`.
    pub fn flowing(fluid: Fluid, level: u8, falling: bool) -> Self {
        if fluid == Fluid::Empty {
            return Self::EMPTY;
        }
        Self {
            fluid,
            level: level.clamp(1, Self::MAX_LEVEL),
            falling,
        }
    }

    /// Whether the cell holds no fluid.
    pub fn is_empty(&self) -> bool {
        self.fluid == Fluid::Empty
    }

    /// Whether this is a source.
    pub fn is_source(&self) -> bool {
        !self.is_empty() && self.level == Self::MAX_LEVEL && !self.falling
    }
}

impl Default for FluidState {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fluid_never_has_level() {
        assert_eq!(FluidState::source(Fluid::Empty), FluidState::EMPTY);
        assert_eq!(FluidState::flowing(Fluid::Empty, 5, true), FluidState::EMPTY);
        assert!(!FluidState::EMPTY.is_source());
    }

    #[test]
    fn flowing_level_is_clamped() {
        assert_eq!(FluidState::flowing(Fluid::Water, 0, false).level, 1);
        assert_eq!(FluidState::flowing(Fluid::Water, 12, false).level, 8);
        assert!(FluidState::source(Fluid::Lava).is_source());
        assert!(!FluidState::flowing(Fluid::Water, 8, true).is_source());
    }
}
