//! Weathering metal: blocks that oxidize through four stages, faster
//! next to already oxidized neighbours.
//!
//! Every weathering type declares the same `oxidation` domain, so a
//! cut copper block and a plain copper block hold each other back or
//! pull each other along.

use stratum_behavior::ChangeOverTime;
use stratum_core::{BlockState, Property};

/// Oxidation-stage property.
pub const OXIDATION: &str = "oxidation";

/// Oxidation stages, youngest first.
pub const STAGES: [&str; 4] = ["unaffected", "exposed", "weathered", "oxidized"];

/// The `oxidation` property declaration.
pub fn oxidation_property() -> Property {
    Property::enumeration(OXIDATION, &STAGES, STAGES[0])
}

/// Change-over-time capability for oxidizing blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Weathering;

impl ChangeOverTime for Weathering {
    fn age_property(&self) -> &str {
        OXIDATION
    }

    fn next_state(&self, state: &BlockState) -> Option<BlockState> {
        let next = state.ordinal(OXIDATION) + 1;
        state.try_with_ordinal(OXIDATION, next).ok()
    }

    fn chance_modifier(&self, state: &BlockState) -> f64 {
        if state.ordinal(OXIDATION) == 0 {
            0.75
        } else {
            1.0
        }
    }
}
