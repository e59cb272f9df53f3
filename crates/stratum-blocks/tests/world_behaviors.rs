//! Reference blocks driven through the tick engine.

use std::sync::Arc;

use stratum_behavior::{Registry, ShapeContext};
use stratum_blocks::redstone::{LIT, POWERED};
use stratum_blocks::{
    crop, reference_registry, torch, weathering, Lever, COPPER_BLOCK, CUT_COPPER, GRASS, LAMP,
    LEVER, OAK_SLAB, SAND, STONE, TORCH, WHEAT,
};
use stratum_core::{BlockPos, BlockState, Fluid, FluidState, GridView, SideEffect, WorldGrid};
use stratum_engine::{
    DiffusionConfig, DiffusionSampler, EngineConfig, MemoryGrid, ScanOutcome, TickEngine,
};
use stratum_test_utils::{slab_space, RecordingSideEffects};

struct World {
    registry: Arc<Registry>,
    grid: MemoryGrid,
    engine: TickEngine,
    effects: RecordingSideEffects,
}

impl World {
    /// A 16 × 4 × 16 world with a stone floor at `y = 0`.
    fn new(config: EngineConfig) -> Self {
        let registry = Arc::new(reference_registry());
        let mut grid = MemoryGrid::new(slab_space(16, 4, 16), &registry, 11);
        let stone = registry.by_name(STONE).unwrap().default_state();
        grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(15, 0, 15), &stone);
        let effects = RecordingSideEffects::new();
        let engine = TickEngine::new(registry.clone(), config)
            .unwrap()
            .with_side_effects(effects.clone());
        Self {
            registry,
            grid,
            engine,
            effects,
        }
    }

    fn quiet() -> Self {
        Self::new(EngineConfig {
            random_tick_speed: 0,
            ..EngineConfig::default()
        })
    }

    fn state(&self, name: &str) -> BlockState {
        self.registry.by_name(name).unwrap().default_state()
    }

    fn place(&mut self, pos: BlockPos, state: BlockState) {
        self.engine.set_block(&mut self.grid, pos, state, true);
    }

    fn at(&self, pos: BlockPos) -> BlockState {
        self.grid.get_state(pos).unwrap()
    }

    fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.engine.on_tick_step(&mut self.grid);
        }
    }
}

fn p(x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new(x, y, z)
}

// ── Support ────────────────────────────────────────────────────────

#[test]
fn torches_drop_with_their_support() {
    let mut w = World::quiet();
    let stone = w.state(STONE);
    let floor_torch = w.state(TORCH);
    let wall_torch = floor_torch.with(torch::FACING, "east");

    w.place(p(4, 1, 4), stone.clone());
    w.place(p(4, 2, 4), floor_torch.clone());
    w.place(p(5, 1, 4), wall_torch.clone());
    assert_eq!(w.at(p(4, 2, 4)), floor_torch);
    assert_eq!(w.at(p(5, 1, 4)), wall_torch);

    let report = w.engine.set_block(&mut w.grid, p(4, 1, 4), w.registry.empty_state(), true);
    assert!(w.at(p(4, 2, 4)).is_empty());
    assert!(w.at(p(5, 1, 4)).is_empty());
    assert_eq!(report.applied, 3);
    assert_eq!(report.max_depth, 1);
}

#[test]
fn unpropagated_removal_leaves_the_torch_hanging() {
    let mut w = World::quiet();
    w.place(p(4, 1, 4), w.state(STONE));
    w.place(p(4, 2, 4), w.state(TORCH));
    w.engine.set_block(&mut w.grid, p(4, 1, 4), w.registry.empty_state(), false);
    assert!(w.at(p(4, 2, 4)).is(w.registry.id_of(TORCH).unwrap()));
}

// ── Crops ──────────────────────────────────────────────────────────

#[test]
fn fertilizer_grows_wheat_and_stops_at_maturity() {
    let mut w = World::quiet();
    let pos = p(2, 1, 2);
    w.place(pos, w.state(WHEAT));

    assert!(w.engine.apply_growth(&mut w.grid, pos));
    let age = w.at(pos).get_int(crop::AGE);
    assert!((2..=5).contains(&age), "age {age}");
    assert!(matches!(
        w.effects.effects().last(),
        Some(SideEffect::Particles { name: "happy_villager", .. })
    ));

    w.place(pos, w.state(WHEAT).with(crop::AGE, crop::MAX_AGE));
    w.effects.clear();
    assert!(!w.engine.apply_growth(&mut w.grid, pos));
    assert!(w.effects.is_empty());
}

#[test]
fn wheat_grows_on_random_ticks() {
    let mut w = World::new(EngineConfig {
        random_tick_speed: 4096,
        ..EngineConfig::default()
    });
    let wheat = w.state(WHEAT);
    w.grid.fill(p(0, 1, 0), p(15, 1, 15), &wheat);
    w.steps(20);
    let grown = (0..16)
        .flat_map(|x| (0..16).map(move |z| p(x, 1, z)))
        .filter(|&pos| w.at(pos).get_int(crop::AGE) > 0)
        .count();
    assert!(grown > 0);
    let metrics = w.engine.metrics();
    assert!(metrics.random_ticks_delivered > 0);
}

#[test]
fn wheat_pops_off_when_the_floor_goes() {
    let mut w = World::quiet();
    w.place(p(3, 1, 3), w.state(WHEAT));
    w.engine.set_block(&mut w.grid, p(3, 0, 3), w.registry.empty_state(), true);
    assert!(w.at(p(3, 1, 3)).is_empty());
}

// ── Falling ────────────────────────────────────────────────────────

#[test]
fn sand_falls_to_the_floor_after_its_delay() {
    let mut w = World::quiet();
    let sand = w.state(SAND);
    w.place(p(6, 3, 6), sand.clone());
    assert_eq!(w.at(p(6, 3, 6)), sand);

    w.steps(1);
    assert_eq!(w.at(p(6, 3, 6)), sand);

    let metrics = w.engine.on_tick_step(&mut w.grid);
    assert_eq!(metrics.falls, 1);
    assert!(w.at(p(6, 3, 6)).is_empty());
    assert_eq!(w.at(p(6, 1, 6)), sand);
    assert!(w
        .effects
        .effects()
        .contains(&SideEffect::Sound { pos: p(6, 1, 6), name: "sand.fall" }));
}

#[test]
fn sand_replaces_grass_it_lands_on() {
    let mut w = World::quiet();
    w.place(p(6, 1, 6), w.state(GRASS));
    w.place(p(6, 3, 6), w.state(SAND));
    w.steps(2);
    assert!(w.at(p(6, 1, 6)).is(w.registry.id_of(SAND).unwrap()));
}

#[test]
fn sand_on_a_floor_stays_put() {
    let mut w = World::quiet();
    let sand = w.state(SAND);
    w.place(p(6, 1, 6), sand.clone());
    w.steps(4);
    assert_eq!(w.at(p(6, 1, 6)), sand);
    assert_eq!(w.engine.metrics().falls, 0);
}

// ── Signals ────────────────────────────────────────────────────────

#[test]
fn lever_lights_the_lamp_and_the_lamp_fades_late() {
    let mut w = World::quiet();
    let lever_pos = p(1, 1, 1);
    let lamp_pos = p(2, 1, 1);
    w.place(lamp_pos, w.state(LAMP));
    w.place(lever_pos, w.state(LEVER));
    assert!(!w.at(lamp_pos).get_bool(LIT));

    let on = Lever::toggled(&w.at(lever_pos));
    assert!(on.get_bool(POWERED));
    w.place(lever_pos, on);
    assert_eq!(w.engine.best_neighbor_signal(&w.grid, lamp_pos), 15);
    assert!(w.at(lamp_pos).get_bool(LIT));

    let off = Lever::toggled(&w.at(lever_pos));
    w.place(lever_pos, off);
    assert_eq!(w.engine.best_neighbor_signal(&w.grid, lamp_pos), 0);
    w.steps(3);
    assert!(w.at(lamp_pos).get_bool(LIT));
    w.steps(1);
    assert!(!w.at(lamp_pos).get_bool(LIT));
}

#[test]
fn lamp_placed_next_to_a_live_lever_lights_at_once() {
    let mut w = World::quiet();
    let lever = w.state(LEVER).with(POWERED, true);
    w.place(p(1, 1, 1), lever);
    w.place(p(1, 1, 2), w.state(LAMP));
    assert!(w.at(p(1, 1, 2)).get_bool(LIT));
}

// ── Fluids ─────────────────────────────────────────────────────────

#[test]
fn slab_holds_and_returns_water() {
    let mut w = World::quiet();
    let pos = p(3, 1, 3);
    w.place(pos, w.state(OAK_SLAB));

    assert!(!w.engine.place_fluid(&mut w.grid, pos, Fluid::Lava));
    assert!(w.engine.place_fluid(&mut w.grid, pos, Fluid::Water));
    assert!(w.at(pos).get_bool(stratum_blocks::slab::WATERLOGGED));
    assert_eq!(w.grid.get_fluid(pos), FluidState::source(Fluid::Water));

    assert_eq!(w.engine.pickup_fluid(&mut w.grid, pos), Some(Fluid::Water));
    assert!(!w.at(pos).get_bool(stratum_blocks::slab::WATERLOGGED));
    assert!(w.grid.get_fluid(pos).is_empty());
    assert_eq!(w.engine.pickup_fluid(&mut w.grid, pos), None);
}

#[test]
fn water_spreads_one_level_per_cell() {
    let mut w = World::quiet();
    let source = p(8, 1, 8);
    assert!(w.engine.place_fluid(&mut w.grid, source, Fluid::Water));

    w.steps(5);
    assert_eq!(w.grid.get_fluid(p(9, 1, 8)), FluidState::flowing(Fluid::Water, 7, false));
    assert!(w.grid.get_fluid(p(9, 1, 9)).is_empty());

    w.steps(60);
    assert_eq!(w.grid.get_fluid(source), FluidState::source(Fluid::Water));
    assert_eq!(w.grid.get_fluid(p(11, 1, 8)).level, 5);
    assert_eq!(w.grid.get_fluid(p(10, 1, 10)).level, 4);
    assert!(w.grid.get_fluid(p(8, 2, 8)).is_empty());
}

#[test]
fn water_washes_away_grass() {
    let mut w = World::quiet();
    w.place(p(9, 1, 8), w.state(GRASS));
    w.engine.place_fluid(&mut w.grid, p(8, 1, 8), Fluid::Water);
    w.steps(5);
    assert!(w.at(p(9, 1, 8)).is_empty());
    assert_eq!(w.grid.get_fluid(p(9, 1, 8)).level, 7);
}

#[test]
fn water_falls_before_it_spreads() {
    let mut w = World::quiet();
    w.engine.place_fluid(&mut w.grid, p(8, 3, 8), Fluid::Water);
    w.steps(5);
    assert_eq!(w.grid.get_fluid(p(8, 2, 8)), FluidState::flowing(Fluid::Water, 8, true));
    assert_eq!(w.grid.get_fluid(p(9, 3, 8)).level, 7);
    assert!(w.grid.get_fluid(p(8, 1, 8)).is_empty());
    w.steps(5);
    assert!(w.grid.get_fluid(p(8, 1, 8)).falling);
    assert!(w.grid.get_fluid(p(9, 2, 8)).falling);
}

#[test]
fn two_water_sources_renew_the_gap() {
    let mut w = World::quiet();
    w.engine.place_fluid(&mut w.grid, p(4, 1, 8), Fluid::Water);
    w.engine.place_fluid(&mut w.grid, p(6, 1, 8), Fluid::Water);
    w.steps(20);
    assert!(w.grid.get_fluid(p(5, 1, 8)).is_source());
}

#[test]
fn lava_never_renews() {
    let mut w = World::quiet();
    w.engine.place_fluid(&mut w.grid, p(4, 1, 8), Fluid::Lava);
    w.engine.place_fluid(&mut w.grid, p(6, 1, 8), Fluid::Lava);
    w.steps(120);
    let gap = w.grid.get_fluid(p(5, 1, 8));
    assert_eq!(gap, FluidState::flowing(Fluid::Lava, 6, false));
}

#[test]
fn placing_stone_in_water_displaces_it() {
    let mut w = World::quiet();
    w.engine.place_fluid(&mut w.grid, p(8, 1, 8), Fluid::Water);
    w.place(p(8, 1, 8), w.state(STONE));
    assert!(w.grid.get_fluid(p(8, 1, 8)).is_empty());
}

// ── Weathering ─────────────────────────────────────────────────────

#[test]
fn copper_types_share_one_oxidation_domain() {
    let w = World::quiet();
    let mut grid = MemoryGrid::new(slab_space(4, 1, 1), &w.registry, 0);
    let young = w.state(COPPER_BLOCK);
    let older = w.state(CUT_COPPER).with(weathering::OXIDATION, "exposed");
    grid.set_state(p(0, 0, 0), young.clone());
    grid.set_state(p(1, 0, 0), older.clone());

    let sampler = DiffusionSampler::new(&DiffusionConfig::default());
    let ctx = ShapeContext::new(&grid, &w.registry);
    assert_eq!(
        sampler.scan(&ctx, p(1, 0, 0), &older, weathering::OXIDATION),
        ScanOutcome::Laggard
    );
    match sampler.scan(&ctx, p(0, 0, 0), &young, weathering::OXIDATION) {
        ScanOutcome::Tally(t) => assert_eq!((t.more, t.peers), (1, 0)),
        ScanOutcome::Laggard => panic!("unaffected copper cannot lag"),
    }
}
