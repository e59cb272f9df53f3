//! Collaborator traits: grid access and the side-effect sink.
//!
//! The engine never owns world storage. It reads cells through
//! [`GridView`], writes them through [`WorldGrid`], and forwards
//! presentation cues to a [`SideEffects`] sink.

use crate::effect::SideEffect;
use crate::fluid::FluidState;
use crate::id::{BlockPos, SectionPos, TickId};
use crate::rng::{self, TickRng};
use crate::state::BlockState;

/// Read-only access to cell contents.
///
/// Shape updates and survival checks only ever see a `GridView`, so they
/// cannot mutate the world.
pub trait GridView {
    /// Current block state at `pos`, or `None` if the cell is not
    /// addressable (outside the world or not loaded).
    fn get_state(&self, pos: BlockPos) -> Option<BlockState>;

    /// Current fluid at `pos`; [`FluidState::EMPTY`] for unaddressable cells.
    fn get_fluid(&self, pos: BlockPos) -> FluidState;

    /// Whether `pos` is addressable.
    fn is_loaded(&self, pos: BlockPos) -> bool {
        self.get_state(pos).is_some()
    }
}

/// Mutable world storage driven by the tick engine.
///
/// Writes are raw: the grid stores what it is given. Neighbour
/// propagation, tick purging, and lifecycle hooks are the engine's job.
pub trait WorldGrid: GridView {
    /// Store `state` at `pos`. Returns `false` if the cell is not
    /// addressable or already held exactly `state`.
    fn set_state(&mut self, pos: BlockPos, state: BlockState) -> bool;

    /// Store `fluid` at `pos`. Returns `false` if the cell is not
    /// addressable or already held exactly `fluid`.
    fn set_fluid(&mut self, pos: BlockPos, fluid: FluidState) -> bool;

    /// Whether this grid is a client-side replica.
    ///
    /// Client-side grids run the same transitions but suppress side effects.
    fn is_client_side(&self) -> bool {
        false
    }

    /// World seed all random streams derive from.
    fn seed(&self) -> u64;

    /// Random stream scoped to `(tick, region)`.
    fn random_stream(&self, tick: TickId, region: SectionPos) -> TickRng {
        rng::random_stream(self.seed(), tick, region)
    }

    /// Sections eligible for random ticking, in ascending order.
    fn loaded_sections(&self) -> Vec<SectionPos>;
}

/// Sink for presentation side effects.
pub trait SideEffects {
    /// Accept one side effect.
    fn emit(&mut self, effect: SideEffect);
}

/// A sink that drops everything.
impl SideEffects for () {
    fn emit(&mut self, _effect: SideEffect) {}
}

/// A sink that records effects in order.
impl SideEffects for Vec<SideEffect> {
    fn emit(&mut self, effect: SideEffect) {
        self.push(effect);
    }
}
