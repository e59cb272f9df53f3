//! Waterloggable slabs: half blocks that can hold a water source.

use stratum_behavior::{FluidContainer, FluidSource};
use stratum_core::{BlockState, Fluid, FluidState, Property};

/// Slab half property.
pub const HALF: &str = "type";

/// Waterlogged property.
pub const WATERLOGGED: &str = "waterlogged";

/// The `type` property declaration.
pub fn half_property() -> Property {
    Property::enumeration(HALF, &["bottom", "top", "double"], "bottom")
}

/// The `waterlogged` property declaration.
pub fn waterlogged_property() -> Property {
    Property::boolean(WATERLOGGED, false)
}

/// Fluid capabilities of a slab.
///
/// Single slabs take a water source and give it back. Double slabs are
/// full blocks and hold nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Waterloggable;

impl FluidContainer for Waterloggable {
    fn can_place_fluid(&self, state: &BlockState, fluid: Fluid) -> bool {
        fluid == Fluid::Water && !state.get_bool(WATERLOGGED) && state.get_enum(HALF) != "double"
    }

    fn place_fluid(&self, state: &BlockState, fluid: FluidState) -> Option<BlockState> {
        if !fluid.is_source() || !self.can_place_fluid(state, fluid.fluid) {
            return None;
        }
        Some(state.with(WATERLOGGED, true))
    }
}

impl FluidSource for Waterloggable {
    fn pickup(&self, state: &BlockState) -> Option<(BlockState, Fluid)> {
        state
            .get_bool(WATERLOGGED)
            .then(|| (state.with(WATERLOGGED, false), Fluid::Water))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stratum_core::{BlockTypeId, StateSchema};

    fn slab() -> BlockState {
        let schema =
            Arc::new(StateSchema::new(vec![half_property(), waterlogged_property()]).unwrap());
        BlockState::create(BlockTypeId(1), schema)
    }

    #[test]
    fn water_round_trips_through_a_single_slab() {
        let dry = slab();
        let wet = Waterloggable
            .place_fluid(&dry, FluidState::source(Fluid::Water))
            .unwrap();
        assert!(wet.get_bool(WATERLOGGED));
        assert!(!Waterloggable.can_place_fluid(&wet, Fluid::Water));
        assert_eq!(Waterloggable.pickup(&wet), Some((dry.clone(), Fluid::Water)));
        assert_eq!(Waterloggable.pickup(&dry), None);
    }

    #[test]
    fn refuses_lava_flowing_water_and_double_slabs() {
        let dry = slab();
        assert!(!Waterloggable.can_place_fluid(&dry, Fluid::Lava));
        assert!(Waterloggable
            .place_fluid(&dry, FluidState::flowing(Fluid::Water, 3, false))
            .is_none());
        let double = dry.with(HALF, "double");
        assert!(!Waterloggable.can_place_fluid(&double, Fluid::Water));
    }
}
