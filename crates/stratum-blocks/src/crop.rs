//! Crops: randomly ticking plants that grow through age stages and
//! accept fertilizer.

use rand::Rng;

use stratum_behavior::{BlockBehavior, Growable, ShapeContext, TickContext};
use stratum_core::{BlockPos, BlockState, Property, SideEffect};

/// Growth-stage property.
pub const AGE: &str = "age";

/// Final growth stage.
pub const MAX_AGE: i32 = 7;

/// The `age` property declaration.
pub fn age_property() -> Property {
    Property::int(AGE, 0, MAX_AGE, 0)
}

/// A crop planted on a solid block.
///
/// Each random tick advances the age by one with probability
/// `1 / growth_odds`. Fertilizer adds two to five stages at once.
#[derive(Clone, Copy, Debug)]
pub struct Crop {
    growth_odds: u32,
}

impl Crop {
    /// A crop that grows on one random tick in `growth_odds`.
    pub fn new(growth_odds: u32) -> Self {
        Self {
            growth_odds: growth_odds.max(1),
        }
    }

    /// Whether `state` is fully grown.
    pub fn is_mature(state: &BlockState) -> bool {
        state.get_int(AGE) >= MAX_AGE
    }
}

impl Default for Crop {
    fn default() -> Self {
        Self::new(5)
    }
}

impl BlockBehavior for Crop {
    fn can_survive(&self, ctx: &ShapeContext<'_>, _state: &BlockState, pos: BlockPos) -> bool {
        ctx.is_solid(pos.below())
    }

    fn random_tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        if ctx.rng().gen_range(0..self.growth_odds) == 0 {
            ctx.set_state(pos, state.with(AGE, state.get_int(AGE) + 1));
        }
    }

    fn is_randomly_ticking(&self, state: &BlockState) -> bool {
        !Crop::is_mature(state)
    }
}

impl Growable for Crop {
    fn is_valid_target(&self, _ctx: &ShapeContext<'_>, _pos: BlockPos, state: &BlockState) -> bool {
        !Crop::is_mature(state)
    }

    fn apply(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        let boost = ctx.rng().gen_range(2..=5);
        let age = (state.get_int(AGE) + boost).min(MAX_AGE);
        ctx.set_state(pos, state.with(AGE, age));
        ctx.emit(SideEffect::Particles {
            pos,
            name: "happy_villager",
            count: 15,
        });
    }
}
