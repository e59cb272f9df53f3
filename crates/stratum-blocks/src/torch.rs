//! Torches: decorations that need a solid block to hang on.

use stratum_behavior::{BlockBehavior, ShapeContext};
use stratum_core::{BlockPos, BlockState, Direction, Property};

/// Property naming the face the torch points out of: `up` for a floor
/// torch, a horizontal direction for a wall torch.
pub const FACING: &str = "facing";

const FACINGS: [&str; 5] = ["up", "north", "south", "west", "east"];

/// The `facing` property declaration.
pub fn facing_property() -> Property {
    Property::enumeration(FACING, &FACINGS, "up")
}

fn facing_direction(state: &BlockState) -> Direction {
    match state.get_enum(FACING) {
        "north" => Direction::North,
        "south" => Direction::South,
        "west" => Direction::West,
        "east" => Direction::East,
        _ => Direction::Up,
    }
}

/// A torch survives only while the block it is attached to is solid.
///
/// Breaking the support block removes the torch in the same cascade.
#[derive(Clone, Copy, Debug, Default)]
pub struct Torch;

impl Torch {
    /// The cell a torch in `state` at `pos` is attached to.
    pub fn support(state: &BlockState, pos: BlockPos) -> BlockPos {
        pos.relative(facing_direction(state).opposite())
    }
}

impl BlockBehavior for Torch {
    fn can_survive(&self, ctx: &ShapeContext<'_>, state: &BlockState, pos: BlockPos) -> bool {
        ctx.is_solid(Torch::support(state, pos))
    }
}
