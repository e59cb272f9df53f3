//! The [`BlockBehavior`] and [`FluidBehavior`] handler traits.
//!
//! Every block type carries exactly one `BlockBehavior`. All of its
//! methods default to no-ops, so a type overrides only the channels it
//! reacts to. Handlers are stateless (`&self`): anything that must
//! persist lives in block states, fluids, or scheduled ticks.

use crate::context::{ShapeContext, TickContext};
use stratum_core::{BlockPos, BlockState, Direction, FluidState};

/// Per-type reaction to neighbour changes, time, and lifecycle events.
///
/// # Channels
///
/// - [`update_shape`](Self::update_shape) and
///   [`can_survive`](Self::can_survive) are pure. They run inside the
///   propagation cascade with a read-only [`ShapeContext`] and return
///   the cell's recomputed state; the engine applies it.
/// - The remaining channels receive a [`TickContext`]. They cannot write
///   the world directly: every edit is recorded in the context's edit
///   buffer and applied by the engine after the handler returns, in
///   recording order.
///
/// # Object safety
///
/// This trait is object-safe; the registry stores handlers as
/// `Box<dyn BlockBehavior>`.
///
/// # Examples
///
/// A block that pops off when the cell below stops being solid:
///
/// ```
/// use stratum_behavior::{BlockBehavior, ShapeContext};
/// use stratum_core::{BlockPos, BlockState};
///
/// struct NeedsFloor;
///
/// impl BlockBehavior for NeedsFloor {
///     fn can_survive(&self, ctx: &ShapeContext<'_>, _state: &BlockState, pos: BlockPos) -> bool {
///         ctx.is_solid(pos.below())
///     }
/// }
/// ```
pub trait BlockBehavior: Send + Sync + 'static {
    /// Recompute `state` at `pos` after the neighbour at `neighbor_pos`,
    /// lying in `direction` from `pos`, became `neighbor`.
    ///
    /// Returning a state equal to `state` means "no change". Default:
    /// unchanged.
    fn update_shape(
        &self,
        ctx: &ShapeContext<'_>,
        state: &BlockState,
        direction: Direction,
        neighbor: &BlockState,
        pos: BlockPos,
        neighbor_pos: BlockPos,
    ) -> BlockState {
        let _ = (ctx, direction, neighbor, pos, neighbor_pos);
        state.clone()
    }

    /// Whether `state` can remain at `pos`. A cell that fails this check
    /// after a neighbour update is replaced by the empty block. Default:
    /// always.
    fn can_survive(&self, ctx: &ShapeContext<'_>, state: &BlockState, pos: BlockPos) -> bool {
        let _ = (ctx, state, pos);
        true
    }

    /// A neighbour at `from` changed and this cell's own state stayed the
    /// same.
    fn neighbor_changed(
        &self,
        ctx: &mut TickContext<'_>,
        pos: BlockPos,
        state: &BlockState,
        from: BlockPos,
    ) {
        let _ = (ctx, pos, state, from);
    }

    /// `state` was just written at `pos`, replacing `old` of a different type.
    fn on_place(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, old: &BlockState) {
        let _ = (ctx, pos, state, old);
    }

    /// `state` at `pos` was just replaced by `new` of a different type.
    fn on_remove(
        &self,
        ctx: &mut TickContext<'_>,
        pos: BlockPos,
        state: &BlockState,
        new: &BlockState,
    ) {
        let _ = (ctx, pos, state, new);
    }

    /// A scheduled block tick fired for this cell.
    fn tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        let _ = (ctx, pos, state);
    }

    /// This cell was drawn by random-tick sampling.
    ///
    /// Only delivered when [`is_randomly_ticking`](Self::is_randomly_ticking)
    /// returns `true` for the current state.
    fn random_tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        let _ = (ctx, pos, state);
    }

    /// Whether random-tick sampling should deliver
    /// [`random_tick`](Self::random_tick) to `state`. Default: no.
    fn is_randomly_ticking(&self, state: &BlockState) -> bool {
        let _ = state;
        false
    }
}

/// The behavior of a block type that does nothing. Used for the empty block.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inert;

impl BlockBehavior for Inert {}

/// Per-fluid reaction to scheduled fluid ticks.
///
/// Registered once per [`Fluid`](stratum_core::Fluid) kind; fluid ticks
/// are scheduled and fired on a channel separate from block ticks.
pub trait FluidBehavior: Send + Sync + 'static {
    /// A scheduled fluid tick fired at `pos`, which holds `fluid`.
    fn tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, fluid: FluidState);

    /// Delay, in ticks, between a fluid change and its next fluid tick.
    fn tick_delay(&self) -> u64;
}
