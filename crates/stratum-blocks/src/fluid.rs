//! Flowing fluids: water and lava spreading from sources.
//!
//! A fluid tick first settles the cell's own level from its
//! neighbours, then pushes fluid outward: straight down when the cell
//! below is open, otherwise sideways at a reduced level.

use stratum_behavior::{FluidBehavior, ShapeContext, TickContext};
use stratum_core::{BlockPos, Direction, Fluid, FluidState};

/// Level-based flow for one fluid kind.
#[derive(Clone, Copy, Debug)]
pub struct FlowingFluid {
    fluid: Fluid,
    tick_delay: u64,
    drop: u8,
    renews: bool,
}

impl FlowingFluid {
    /// Water: fast, loses one level per cell, and two adjacent sources
    /// over a floor form a new source.
    pub const fn water() -> Self {
        Self {
            fluid: Fluid::Water,
            tick_delay: 5,
            drop: 1,
            renews: true,
        }
    }

    /// Lava: slow and short-reaching, never renews.
    pub const fn lava() -> Self {
        Self {
            fluid: Fluid::Lava,
            tick_delay: 30,
            drop: 2,
            renews: false,
        }
    }

    /// The fluid kind this behavior drives.
    pub fn fluid(&self) -> Fluid {
        self.fluid
    }

    fn same(&self, fluid: FluidState) -> bool {
        fluid.fluid == self.fluid
    }

    /// Whether fluid can flow into the cell at `pos`: its block is empty,
    /// or is replaceable and holds no fluid of its own.
    fn accepts(&self, ctx: &ShapeContext<'_>, pos: BlockPos) -> bool {
        let Some(state) = ctx.state_at(pos) else {
            return false;
        };
        if state.is_empty() {
            return true;
        }
        ctx.attributes_at(pos).replaceable
            && ctx.registry().fluid_container(state.type_id()).is_none()
    }

    /// The level `current` settles to given its surroundings.
    pub fn settled(&self, ctx: &ShapeContext<'_>, pos: BlockPos, current: FluidState) -> FluidState {
        if current.is_source() {
            return current;
        }
        if self.same(ctx.fluid_at(pos.above())) {
            return FluidState::flowing(self.fluid, FluidState::MAX_LEVEL, true);
        }
        let mut sources = 0;
        let mut best = 0u8;
        for dir in Direction::HORIZONTAL {
            let n = ctx.fluid_at(pos.relative(dir));
            if !self.same(n) {
                continue;
            }
            if n.is_source() {
                sources += 1;
            }
            let level = if n.falling { FluidState::MAX_LEVEL } else { n.level };
            best = best.max(level);
        }
        if self.renews && sources >= 2 {
            let below = pos.below();
            let floor = ctx.fluid_at(below);
            if ctx.is_solid(below) || (self.same(floor) && floor.is_source()) {
                return FluidState::source(self.fluid);
            }
        }
        match best.checked_sub(self.drop) {
            Some(level) if level > 0 => FluidState::flowing(self.fluid, level, false),
            _ => FluidState::EMPTY,
        }
    }

    fn spread(&self, ctx: &mut TickContext<'_>, pos: BlockPos, fluid: FluidState) {
        let shape = ctx.shape();
        let below = pos.below();
        let under = shape.fluid_at(below);
        let open_below = under.is_empty() || (self.same(under) && !under.is_source());
        if open_below && self.accepts(&shape, below) {
            let falling = FluidState::flowing(self.fluid, FluidState::MAX_LEVEL, true);
            if under != falling {
                self.flow_into(ctx, below, falling);
            }
            if !fluid.is_source() {
                return;
            }
        }
        let from = if fluid.falling { FluidState::MAX_LEVEL } else { fluid.level };
        let Some(level) = from.checked_sub(self.drop).filter(|&l| l > 0) else {
            return;
        };
        let next = FluidState::flowing(self.fluid, level, false);
        for dir in Direction::HORIZONTAL {
            let target = pos.relative(dir);
            if !self.accepts(&shape, target) {
                continue;
            }
            let there = shape.fluid_at(target);
            let lower = self.same(there) && !there.is_source() && !there.falling && there.level < level;
            if there.is_empty() || lower {
                self.flow_into(ctx, target, next);
            }
        }
    }

    fn flow_into(&self, ctx: &mut TickContext<'_>, pos: BlockPos, fluid: FluidState) {
        if ctx.state_at(pos).is_some_and(|s| !s.is_empty()) {
            ctx.remove(pos);
        }
        ctx.set_fluid(pos, fluid);
    }
}

impl FluidBehavior for FlowingFluid {
    fn tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, fluid: FluidState) {
        let settled = self.settled(&ctx.shape(), pos, fluid);
        if settled != fluid {
            ctx.set_fluid(pos, settled);
        }
        if !settled.is_empty() {
            self.spread(ctx, pos, settled);
        }
    }

    fn tick_delay(&self) -> u64 {
        self.tick_delay
    }
}
