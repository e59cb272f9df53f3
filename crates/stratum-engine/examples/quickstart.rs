//! Stratum quickstart: a small garden from scratch.
//!
//! Demonstrates:
//!   1. Building a registry from the reference block set
//!   2. Creating a grid over a cuboid space
//!   3. Placing blocks through the engine so neighbours react
//!   4. Stepping the clock and reading per-step metrics
//!   5. Fertilizing a crop and placing water
//!
//! Run with:
//!   cargo run --example quickstart

use std::sync::Arc;

use stratum_blocks::{crop, reference_registry, SAND, STONE, TORCH, WHEAT};
use stratum_core::{BlockPos, Fluid, GridView};
use stratum_engine::{EngineConfig, MemoryGrid, TickEngine};
use stratum_space::Cuboid;
use stratum_test_utils::RecordingSideEffects;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(reference_registry());
    let state = |name: &str| registry.by_name(name).map(|t| t.default_state());

    // ─── World ──────────────────────────────────────────────────

    let space = Cuboid::with_size(16, 8, 16)?;
    let mut grid = MemoryGrid::new(space, &registry, 2024);
    let stone = state(STONE).ok_or("no stone")?;
    grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(15, 0, 15), &stone);

    let effects = RecordingSideEffects::new();
    let mut engine = TickEngine::new(registry.clone(), EngineConfig::default())?
        .with_side_effects(effects.clone());

    // ─── Placement ──────────────────────────────────────────────

    let wheat_pos = BlockPos::new(3, 1, 3);
    engine.set_block(&mut grid, wheat_pos, state(WHEAT).ok_or("no wheat")?, true);
    engine.set_block(&mut grid, BlockPos::new(5, 1, 5), state(TORCH).ok_or("no torch")?, true);
    engine.set_block(&mut grid, BlockPos::new(8, 6, 8), state(SAND).ok_or("no sand")?, true);
    engine.place_fluid(&mut grid, BlockPos::new(12, 1, 12), Fluid::Water);

    // ─── Stepping ───────────────────────────────────────────────

    for _ in 0..20 {
        let m = engine.on_tick_step(&mut grid);
        if m.scheduled_ticks_fired > 0 || m.falls > 0 {
            println!(
                "tick {:>3}: {} scheduled, {} falls, {} writes",
                m.tick.0, m.scheduled_ticks_fired, m.falls, m.cascade_updates
            );
        }
    }

    // ─── Growth ─────────────────────────────────────────────────

    engine.apply_growth(&mut grid, wheat_pos);
    let age = grid.get_state(wheat_pos).map(|s| s.get_int(crop::AGE));
    println!("wheat age after fertilizer: {age:?}");
    let landed = grid.get_state(BlockPos::new(8, 1, 8)).is_some_and(|s| !s.is_empty());
    println!("sand landed on the floor: {landed}");
    println!("side effects: {:?}", effects.effects());
    println!("occupied cells: {}", grid.occupied());
    Ok(())
}
