//! Benchmark worlds and utilities for the Stratum block-behavior engine.
//!
//! Provides pre-built worlds over the reference block set:
//!
//! - [`reference_world`]: 32x16x32 (16K cells) garden with crops, copper,
//!   torches, and water
//! - [`stress_world`]: 128x32x128 (~524K cells), same layout, spread wider
//! - [`scatter_positions`]: deterministic cell placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;
use std::sync::Arc;

use stratum_behavior::Registry;
use stratum_blocks::{reference_registry, COPPER_BLOCK, STONE, TORCH, WHEAT};
use stratum_core::{BlockPos, Fluid, WorldGrid};
use stratum_engine::{EngineConfig, MemoryGrid, TickEngine};
use stratum_space::Cuboid;

/// A ready-to-step world: registry, grid, and engine.
pub struct BenchWorld {
    /// The reference registry.
    pub registry: Arc<Registry>,
    /// World contents.
    pub grid: MemoryGrid,
    /// Engine driving `grid`.
    pub engine: TickEngine,
}

/// Build the reference benchmark world: 32x16x32 (16K cells).
///
/// Stone floor at `y = 0`, a wheat field on one half, copper scattered
/// over the other half, a row of torches, and one water source.
pub fn reference_world(seed: u64) -> BenchWorld {
    build_world(32, 16, 32, seed)
}

/// Build the stress benchmark world: 128x32x128 (~524K cells).
///
/// Same layout as [`reference_world`] at 32x the cell count.
pub fn stress_world(seed: u64) -> BenchWorld {
    build_world(128, 32, 128, seed)
}

fn build_world(sx: u32, sy: u32, sz: u32, seed: u64) -> BenchWorld {
    let registry = Arc::new(reference_registry());
    let space = Cuboid::with_size(sx, sy, sz).unwrap();
    let mut grid = MemoryGrid::new(space, &registry, seed);
    let state = |name: &str| registry.by_name(name).unwrap().default_state();
    let (x, z) = (sx as i32 - 1, sz as i32 - 1);
    let half = sx as i32 / 2;

    grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(x, 0, z), &state(STONE));
    grid.fill(BlockPos::new(0, 1, 0), BlockPos::new(half - 1, 1, z), &state(WHEAT));
    grid.fill(BlockPos::new(half, 1, 0), BlockPos::new(half, 1, z), &state(TORCH));

    let copper_area = ((sx as usize) / 2 - 1) * (sy as usize - 2) * sz as usize;
    let copper = state(COPPER_BLOCK);
    for (_, rank) in scatter_positions(copper_area, (copper_area / 8) as u32, seed) {
        let w = sx as usize / 2 - 1;
        let h = sy as usize - 2;
        let pos = BlockPos::new(
            half + 1 + (rank % w) as i32,
            2 + ((rank / w) % h) as i32,
            (rank / (w * h)) as i32,
        );
        grid.set_state(pos, copper.clone());
    }

    let mut engine = TickEngine::new(registry.clone(), EngineConfig::default()).unwrap();
    engine.place_fluid(&mut grid, BlockPos::new(half / 2, 3, sz as i32 / 2), Fluid::Water);
    BenchWorld {
        registry,
        grid,
        engine,
    }
}

/// Deterministically scatter `n` distinct ranks over `0..cell_count`.
///
/// Returns `(index, rank)` pairs. Panics if `n > cell_count`.
pub fn scatter_positions(cell_count: usize, n: u32, seed: u64) -> Vec<(u32, usize)> {
    assert!(n as usize <= cell_count, "cannot place {n} cells in {cell_count}");
    let mut positions = Vec::with_capacity(n as usize);
    let mut occupied = HashSet::new();

    for i in 0..n {
        let mut rank = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(u64::from(i).wrapping_mul(1442695040888963407))
            % cell_count as u64) as usize;

        // Linear probe to avoid collisions
        while occupied.contains(&rank) {
            rank = (rank + 1) % cell_count;
        }
        occupied.insert(rank);
        positions.push((i, rank));
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::GridView;

    #[test]
    fn scatter_is_distinct_and_deterministic() {
        let a = scatter_positions(100, 40, 7);
        let b = scatter_positions(100, 40, 7);
        assert_eq!(a, b);
        let ranks: HashSet<_> = a.iter().map(|&(_, r)| r).collect();
        assert_eq!(ranks.len(), 40);
        assert!(ranks.iter().all(|&r| r < 100));
    }

    #[test]
    fn reference_world_is_populated() {
        let w = reference_world(1);
        let wheat = w.registry.id_of(WHEAT).unwrap();
        assert!(w.grid.get_state(BlockPos::new(0, 1, 0)).unwrap().is(wheat));
        assert!(w.grid.occupied() > 32 * 32 * 2);
        assert!(w.engine.pending_len() > 0);
    }
}
