//! Presentation-only side effects emitted by behaviors.

use crate::id::BlockPos;

/// A cue for sound, particles, or other presentation.
///
/// Side effects never influence simulation state. They are dropped on
/// client-side grids so that replicated simulations stay silent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SideEffect {
    /// Play a named sound at a cell.
    Sound {
        /// Where the sound originates.
        pos: BlockPos,
        /// Sound identifier.
        name: &'static str,
    },
    /// Spawn particles at a cell.
    Particles {
        /// Where the particles spawn.
        pos: BlockPos,
        /// Particle identifier.
        name: &'static str,
        /// How many to spawn.
        count: u32,
    },
    /// A numbered world event (e.g. "block broken") for the presentation layer.
    LevelEvent {
        /// Where the event happened.
        pos: BlockPos,
        /// Event code.
        code: u32,
        /// Event-specific payload.
        data: i32,
    },
}

impl SideEffect {
    /// The cell the effect is anchored at.
    pub fn pos(&self) -> BlockPos {
        match self {
            Self::Sound { pos, .. } | Self::Particles { pos, .. } | Self::LevelEvent { pos, .. } => {
                *pos
            }
        }
    }
}
