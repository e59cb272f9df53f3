//! Fixture block behaviors for engine testing.
//!
//! - [`Flipper`]: flips its `on` property whenever a neighbour changes,
//!   so two adjacent flippers form a cycle.
//! - [`Spreader`]: copies itself into every empty neighbour on
//!   placement, filling whatever space it is given in one cascade.
//! - [`TickCounter`]: counts scheduled and random ticks delivered to it.
//! - [`Evictor`]: on a scheduled tick, clears its east neighbour and,
//!   while `refill` is set, puts a fresh block of the same type back.
//! - [`Pillar`]: a solid block that needs a solid block below it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stratum_behavior::{BlockBehavior, BlockDef, Registry, ShapeContext, TickContext};
use stratum_core::{BlockPos, BlockState, Direction, Property};

/// Name of the [`Flipper`] fixture type.
pub const FLIPPER: &str = "flipper";
/// Name of the [`Spreader`] fixture type.
pub const SPREADER: &str = "spreader";
/// Name of the [`TickCounter`] fixture type.
pub const COUNTER: &str = "counter";
/// Name of the [`Evictor`] fixture type.
pub const EVICTOR: &str = "evictor";
/// Name of the [`Pillar`] fixture type.
pub const PILLAR: &str = "pillar";
/// Name of the plain solid fixture type.
pub const STONE: &str = "stone";

/// Toggles `on` on every shape update.
pub struct Flipper;

impl BlockBehavior for Flipper {
    fn update_shape(
        &self,
        _ctx: &ShapeContext<'_>,
        state: &BlockState,
        _direction: Direction,
        _neighbor: &BlockState,
        _pos: BlockPos,
        _neighbor_pos: BlockPos,
    ) -> BlockState {
        state.cycle("on")
    }
}

/// Writes a copy of itself into each empty neighbour when placed.
pub struct Spreader;

impl BlockBehavior for Spreader {
    fn on_place(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState, _old: &BlockState) {
        for dir in Direction::ALL {
            let n = pos.relative(dir);
            if ctx.state_at(n).is_some_and(|s| s.is_empty()) {
                ctx.set_state(n, state.clone());
            }
        }
    }
}

/// Counts `tick` and `random_tick` deliveries.
#[derive(Clone, Default)]
pub struct TickCounter {
    pub ticks: Arc<AtomicUsize>,
    pub random_ticks: Arc<AtomicUsize>,
    pub randomly_ticking: bool,
}

impl TickCounter {
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn random_ticks(&self) -> usize {
        self.random_ticks.load(Ordering::SeqCst)
    }
}

impl BlockBehavior for TickCounter {
    fn tick(&self, _ctx: &mut TickContext<'_>, _pos: BlockPos, _state: &BlockState) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn random_tick(&self, _ctx: &mut TickContext<'_>, _pos: BlockPos, _state: &BlockState) {
        self.random_ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn is_randomly_ticking(&self, _state: &BlockState) -> bool {
        self.randomly_ticking
    }
}

/// Evicts its east neighbour when its scheduled tick fires.
#[derive(Clone, Default)]
pub struct Evictor {
    pub ticks: Arc<AtomicUsize>,
}

impl Evictor {
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl BlockBehavior for Evictor {
    fn tick(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
        let east = pos.relative(Direction::East);
        let Some(victim) = ctx.state_at(east).filter(|s| !s.is_empty()) else {
            return;
        };
        ctx.remove(east);
        if state.get_bool("refill") {
            if let Some(fresh) = ctx.registry().default_state(victim.type_id()) {
                ctx.set_state(east, fresh);
            }
        }
    }
}

/// Solid, and drops when the block below stops being solid.
pub struct Pillar;

impl BlockBehavior for Pillar {
    fn can_survive(&self, ctx: &ShapeContext<'_>, _state: &BlockState, pos: BlockPos) -> bool {
        ctx.is_solid(pos.below())
    }
}

/// A registry of the fixture types plus handles to the tick counters.
pub struct Fixtures {
    pub registry: Arc<Registry>,
    pub counter: TickCounter,
    pub evictor: Evictor,
}

impl Fixtures {
    pub fn state(&self, name: &str) -> BlockState {
        self.registry.by_name(name).unwrap().default_state()
    }
}

/// Registers [`STONE`], [`FLIPPER`], [`SPREADER`], [`EVICTOR`],
/// [`PILLAR`] and a [`COUNTER`] that is randomly ticking when
/// `counter_random` is set.
pub fn fixture_registry(counter_random: bool) -> Fixtures {
    let counter = TickCounter {
        randomly_ticking: counter_random,
        ..TickCounter::default()
    };
    let mut b = Registry::builder();
    b.register(BlockDef::new(STONE)).unwrap();
    b.register(
        BlockDef::new(FLIPPER)
            .property(Property::boolean("on", false))
            .behavior(Flipper),
    )
    .unwrap();
    b.register(BlockDef::new(SPREADER).behavior(Spreader)).unwrap();
    b.register(BlockDef::new(COUNTER).behavior(counter.clone()))
        .unwrap();
    let evictor = Evictor::default();
    b.register(
        BlockDef::new(EVICTOR)
            .property(Property::boolean("refill", true))
            .behavior(evictor.clone()),
    )
    .unwrap();
    b.register(BlockDef::new(PILLAR).behavior(Pillar)).unwrap();
    Fixtures {
        registry: Arc::new(b.build()),
        counter,
        evictor,
    }
}
