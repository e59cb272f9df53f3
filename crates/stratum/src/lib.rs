//! Stratum: a block-behavior engine for voxel worlds.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Stratum sub-crates. For most users, adding `stratum` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use stratum::prelude::*;
//!
//! // A block that needs a solid floor.
//! struct Flower;
//! impl BlockBehavior for Flower {
//!     fn can_survive(&self, ctx: &ShapeContext<'_>, _: &BlockState, pos: BlockPos) -> bool {
//!         ctx.is_solid(pos.below())
//!     }
//! }
//!
//! let mut builder = Registry::builder();
//! let stone = builder.register(BlockDef::new("stone")).unwrap();
//! let flower = builder
//!     .register(
//!         BlockDef::new("flower")
//!             .behavior(Flower)
//!             .attributes(BlockAttributes::DECORATION),
//!     )
//!     .unwrap();
//! let registry = Arc::new(builder.build());
//!
//! let space = Cuboid::with_size(4, 4, 4).unwrap();
//! let mut grid = MemoryGrid::new(space, &registry, 42);
//! let mut engine = TickEngine::new(registry.clone(), EngineConfig::default()).unwrap();
//!
//! let floor = BlockPos::new(1, 0, 1);
//! engine.set_block(&mut grid, floor, registry.default_state(stone).unwrap(), true);
//! engine.set_block(&mut grid, floor.above(), registry.default_state(flower).unwrap(), true);
//!
//! // Breaking the floor takes the flower with it.
//! let report = engine.set_block(&mut grid, floor, registry.empty_state(), true);
//! assert_eq!(report.applied, 2);
//! assert!(grid.get_state(floor.above()).unwrap().is_empty());
//!
//! let metrics = engine.on_tick_step(&mut grid);
//! assert_eq!(metrics.tick, TickId(1));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stratum-core` | Positions, properties, block states, fluids, tick targets |
//! | [`space`] | `stratum-space` | Addressable spaces and canonical ordering |
//! | [`behavior`] | `stratum-behavior` | Behavior and capability traits, the type registry |
//! | [`engine`] | `stratum-engine` | Tick engine, cascades, scheduler, diffusion sampler |
//! | [`blocks`] | `stratum-blocks` | Reference block types |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`stratum-core`).
///
/// Contains positions and directions, the property model and
/// [`types::BlockState`], fluids, tick targets, the per-tick random
/// streams, and the grid traits ([`types::GridView`],
/// [`types::WorldGrid`]).
pub use stratum_core as types;

/// Addressable spaces (`stratum-space`).
///
/// Provides the [`space::Space`] trait with a dense [`space::Cuboid`]
/// and a sparse [`space::SectionSet`].
pub use stratum_space as space;

/// Behaviors, capabilities, and the type registry (`stratum-behavior`).
///
/// The [`behavior::BlockBehavior`] trait is the main extension point for
/// user-defined block logic.
pub use stratum_behavior as behavior;

/// The tick engine (`stratum-engine`).
///
/// [`engine::TickEngine`] drives neighbour-update cascades, scheduled
/// ticks, random ticks, and change-over-time diffusion over any
/// [`types::WorldGrid`]; [`engine::MemoryGrid`] is the in-memory grid.
pub use stratum_engine as engine;

/// Reference block types (`stratum-blocks`).
///
/// Torches, crops, weathering copper, falling blocks, a lever and lamp,
/// waterloggable slabs, and flowing water and lava.
pub use stratum_blocks as blocks;

/// Common imports for typical Stratum usage.
///
/// ```rust
/// use stratum::prelude::*;
/// ```
///
/// This imports the most frequently used types: positions and states, the
/// grid traits, the behavior traits and registry, spaces, and the engine.
pub mod prelude {
    // Core types and traits
    pub use stratum_core::{
        BlockPos, BlockState, BlockTypeId, Direction, Fluid, FluidState, GridView, Property,
        SectionPos, SideEffect, SideEffects, TickId, TickPriority, TickTarget, WorldGrid,
    };

    // Behaviors and registry
    pub use stratum_behavior::{
        BlockAttributes, BlockBehavior, BlockDef, Capabilities, FluidBehavior, Registry,
        ShapeContext, TickContext,
    };

    // Space
    pub use stratum_space::{Cuboid, SectionSet, Space};

    // Engine
    pub use stratum_engine::{
        CascadeReport, EngineConfig, GridSnapshot, MemoryGrid, StepMetrics, TickEngine,
    };
}
