//! Scheduled ticks: rescheduling, staleness, purging, and the per-step budget.

use stratum_core::{BlockPos, Direction, Fluid, GridView, TargetKind, TickTarget, WorldGrid};
use stratum_engine::{EngineConfig, MemoryGrid, TickEngine};
use stratum_test_utils::{cube, fixture_registry, Fixtures, COUNTER, EVICTOR, FLIPPER, STONE};

fn setup(config: EngineConfig) -> (Fixtures, MemoryGrid, TickEngine) {
    let fx = fixture_registry(false);
    let grid = MemoryGrid::new(cube(4), &fx.registry, 3);
    let config = EngineConfig {
        random_tick_speed: 0,
        ..config
    };
    let engine = TickEngine::new(fx.registry.clone(), config).unwrap();
    (fx, grid, engine)
}

fn counter_target(fx: &Fixtures) -> TickTarget {
    TickTarget::Block(fx.registry.id_of(COUNTER).unwrap())
}

fn evictor_target(fx: &Fixtures) -> TickTarget {
    TickTarget::Block(fx.registry.id_of(EVICTOR).unwrap())
}

#[test]
fn rescheduling_keeps_only_the_latest_deadline() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(1, 1, 1);
    grid.set_state(pos, fx.state(COUNTER));

    engine.schedule_tick(pos, counter_target(&fx), 5);
    engine.schedule_tick(pos, counter_target(&fx), 2);
    assert_eq!(engine.pending_len(), 1);

    engine.on_tick_step(&mut grid);
    assert_eq!(fx.counter.ticks(), 0);
    let metrics = engine.on_tick_step(&mut grid);
    assert_eq!(metrics.scheduled_ticks_fired, 1);
    assert_eq!(fx.counter.ticks(), 1);

    for _ in 0..6 {
        engine.on_tick_step(&mut grid);
    }
    assert_eq!(fx.counter.ticks(), 1);
    assert!(!engine.is_tick_scheduled(pos, TargetKind::Block));
}

#[test]
fn tick_for_a_replaced_type_is_a_counted_no_op() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(1, 1, 1);
    grid.set_state(pos, fx.state(COUNTER));
    // Scheduled for a flipper, but the cell holds a counter.
    engine.schedule_tick(pos, TickTarget::Block(fx.registry.id_of(FLIPPER).unwrap()), 1);

    let metrics = engine.on_tick_step(&mut grid);
    assert_eq!(metrics.stale_scheduled_ticks, 1);
    assert_eq!(metrics.scheduled_ticks_fired, 0);
    assert_eq!(fx.counter.ticks(), 0);
    assert_eq!(engine.pending_len(), 0);
}

#[test]
fn replacing_the_block_purges_its_tick() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(1, 1, 1);
    engine.set_block(&mut grid, pos, fx.state(COUNTER), true);
    engine.schedule_tick(pos, counter_target(&fx), 1);
    assert!(engine.is_tick_scheduled(pos, TargetKind::Block));

    engine.set_block(&mut grid, pos, fx.registry.empty_state(), true);
    assert!(!engine.is_tick_scheduled(pos, TargetKind::Block));
    // The new type has a tick handler of its own; it must not be reached.
    let evictor = fx.state(EVICTOR);
    engine.set_block(&mut grid, pos, evictor.clone(), true);

    let metrics = engine.on_tick_step(&mut grid);
    assert_eq!(metrics.scheduled_ticks_fired, 0);
    assert_eq!(metrics.stale_scheduled_ticks, 0);
    assert_eq!(fx.evictor.ticks(), 0);
    assert_eq!(fx.counter.ticks(), 0);
    assert_eq!(grid.get_state(pos), Some(evictor));
}

#[test]
fn tick_purged_earlier_in_the_step_never_fires() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let a = BlockPos::new(1, 1, 1);
    let b = a.relative(Direction::East);
    grid.set_state(a, fx.state(EVICTOR));
    grid.set_state(b, fx.state(COUNTER));
    // Same deadline; the evictor was scheduled first and fires first.
    engine.schedule_tick(a, evictor_target(&fx), 1);
    engine.schedule_tick(b, counter_target(&fx), 1);

    let metrics = engine.on_tick_step(&mut grid);
    assert_eq!(fx.evictor.ticks(), 1);
    // b was removed and a fresh counter put back: its old tick is gone.
    assert_eq!(fx.counter.ticks(), 0);
    assert_eq!(metrics.scheduled_ticks_fired, 1);
    assert_eq!(metrics.stale_scheduled_ticks, 0);
    assert!(grid.get_state(b).unwrap().is(fx.registry.id_of(COUNTER).unwrap()));
    assert_eq!(engine.pending_len(), 0);
}

#[test]
fn tick_of_a_block_removed_earlier_in_the_step_is_not_stale() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let a = BlockPos::new(1, 1, 1);
    let b = a.relative(Direction::East);
    grid.set_state(a, fx.state(EVICTOR).with("refill", false));
    grid.set_state(b, fx.state(COUNTER));
    engine.schedule_tick(a, evictor_target(&fx), 1);
    engine.schedule_tick(b, counter_target(&fx), 1);

    let metrics = engine.on_tick_step(&mut grid);
    assert!(grid.get_state(b).unwrap().is_empty());
    assert_eq!(metrics.scheduled_ticks_fired, 1);
    assert_eq!(metrics.stale_scheduled_ticks, 0);
    assert_eq!(fx.counter.ticks(), 0);
}

#[test]
fn external_write_settles_through_on_cell_changed() {
    let (fx, mut grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(2, 2, 2);
    engine.set_block(&mut grid, pos, fx.state(COUNTER), true);
    engine.schedule_tick(pos, counter_target(&fx), 1);

    let old = fx.state(COUNTER);
    let new = fx.state(STONE);
    grid.set_state(pos, new.clone());
    let report = engine.on_cell_changed(&mut grid, pos, &old, &new, true);
    assert_eq!(report.applied, 0);
    assert!(!engine.is_tick_scheduled(pos, TargetKind::Block));
}

#[test]
fn per_step_budget_defers_the_rest() {
    let (fx, mut grid, mut engine) = setup(EngineConfig {
        max_scheduled_ticks_per_step: 2,
        ..EngineConfig::default()
    });
    for x in 0..4 {
        let pos = BlockPos::new(x, 0, 0);
        grid.set_state(pos, fx.state(COUNTER));
        engine.schedule_tick(pos, counter_target(&fx), 1);
    }
    let pos = BlockPos::new(0, 1, 0);
    grid.set_state(pos, fx.state(COUNTER));
    engine.schedule_tick(pos, counter_target(&fx), 1);

    let fired: Vec<_> = (0..3)
        .map(|_| {
            let m = engine.on_tick_step(&mut grid);
            (m.scheduled_ticks_fired, m.deferred_scheduled_ticks)
        })
        .collect();
    assert_eq!(fired, vec![(2, 3), (2, 1), (1, 0)]);
    assert_eq!(fx.counter.ticks(), 5);
}

#[test]
fn purge_pending_drops_only_the_named_kind() {
    let (fx, _grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(0, 0, 0);
    engine.schedule_tick(pos, counter_target(&fx), 3);
    engine.schedule_tick(pos, TickTarget::Fluid(Fluid::Water), 3);
    assert_eq!(engine.pending_len(), 2);

    assert!(engine.purge_pending(pos, TargetKind::Block));
    assert!(!engine.purge_pending(pos, TargetKind::Block));
    assert!(!engine.is_tick_scheduled(pos, TargetKind::Block));
    assert!(engine.is_tick_scheduled(pos, TargetKind::Fluid));
    assert_eq!(engine.pending_len(), 1);
}

#[test]
fn purge_all_pending_drops_both_kinds() {
    let (fx, _grid, mut engine) = setup(EngineConfig::default());
    let pos = BlockPos::new(0, 0, 0);
    engine.schedule_tick(pos, counter_target(&fx), 3);
    engine.schedule_tick(pos, TickTarget::Fluid(Fluid::Water), 3);
    assert_eq!(engine.purge_all_pending(pos), 2);
    assert_eq!(engine.pending_len(), 0);
}
