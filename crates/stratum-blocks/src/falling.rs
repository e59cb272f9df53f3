//! Falling blocks (sand, gravel): drop when the cell below is free.

use stratum_behavior::{BlockBehavior, Fallable, TickContext};
use stratum_core::{BlockPos, BlockState, SideEffect};

/// Schedules a tick whenever it is placed or a neighbour changes. The
/// engine performs the fall when that tick fires over a free cell.
#[derive(Clone, Copy, Debug)]
pub struct Falling {
    landing_sound: &'static str,
}

impl Falling {
    /// A falling block that plays `landing_sound` when it comes to rest.
    pub const fn new(landing_sound: &'static str) -> Self {
        Self { landing_sound }
    }
}

impl BlockBehavior for Falling {
    fn on_place(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _old: &BlockState) {
        ctx.schedule_block(pos, state.type_id(), self.fall_delay());
    }

    fn neighbor_changed(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _from: BlockPos) {
        ctx.schedule_block(pos, state.type_id(), self.fall_delay());
    }
}

impl Fallable for Falling {
    fn on_land(&self, ctx: &mut TickContext<'_>, pos: BlockPos, _state: &BlockState, _replaced: &BlockState) {
        ctx.emit(SideEffect::Sound {
            pos,
            name: self.landing_sound,
        });
    }
}
