//! Signal sources and consumers: the lever and the lamp.

use stratum_behavior::{BlockBehavior, PowerSource, ShapeContext, TickContext, MAX_SIGNAL};
use stratum_core::{BlockPos, BlockState, Direction, Property, SideEffect};

/// Lever switch property.
pub const POWERED: &str = "powered";

/// Lamp light property.
pub const LIT: &str = "lit";

/// Ticks a lamp stays lit after losing power.
pub const LAMP_OFF_DELAY: u64 = 4;

/// The `powered` property declaration.
pub fn powered_property() -> Property {
    Property::boolean(POWERED, false)
}

/// The `lit` property declaration.
pub fn lit_property() -> Property {
    Property::boolean(LIT, false)
}

// ── Lever ──────────────────────────────────────────────────────────

/// A floor lever: full signal out of every face while switched on.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lever;

impl Lever {
    /// The state after flipping the lever.
    pub fn toggled(state: &BlockState) -> BlockState {
        state.cycle(POWERED)
    }
}

impl BlockBehavior for Lever {
    fn can_survive(&self, ctx: &ShapeContext<'_>, _state: &BlockState, pos: BlockPos) -> bool {
        ctx.is_solid(pos.below())
    }

    fn on_remove(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _new: &BlockState) {
        if state.get_bool(POWERED) {
            ctx.emit(SideEffect::Sound {
                pos,
                name: "lever.click",
            });
        }
    }
}

impl PowerSource for Lever {
    fn signal(&self, state: &BlockState, _direction: Direction) -> u8 {
        if state.get_bool(POWERED) {
            MAX_SIGNAL
        } else {
            0
        }
    }
}

// ── Lamp ───────────────────────────────────────────────────────────

/// Lights up at once when a neighbour powers it, and goes dark
/// [`LAMP_OFF_DELAY`] ticks after the power is gone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lamp;

impl Lamp {
    fn powered(ctx: &ShapeContext<'_>, pos: BlockPos) -> bool {
        ctx.best_neighbor_signal(pos) > 0
    }

    fn check(ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        let lit = state.get_bool(LIT);
        let powered = Lamp::powered(&ctx.shape(), pos);
        if !lit && powered {
            ctx.set_state(pos, state.with(LIT, true));
        } else if lit && !powered {
            ctx.schedule_block(pos, state.type_id(), LAMP_OFF_DELAY);
        }
    }
}

impl BlockBehavior for Lamp {
    fn on_place(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _old: &BlockState) {
        Lamp::check(ctx, pos, state);
    }

    fn neighbor_changed(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _from: BlockPos) {
        Lamp::check(ctx, pos, state);
    }

    fn tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        if state.get_bool(LIT) && !Lamp::powered(&ctx.shape(), pos) {
            ctx.set_state(pos, state.with(LIT, false));
        }
    }
}
