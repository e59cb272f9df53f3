//! In-memory world storage and immutable snapshots.
//!
//! [`MemoryGrid`] stores one block state and one fluid per addressable
//! cell of a [`Space`], densely indexed by canonical rank. Cell storage
//! is copy-on-write behind an `Arc`, so [`snapshot()`](MemoryGrid::snapshot)
//! is O(1) and the first write after a snapshot pays for the copy.

use std::sync::Arc;

use stratum_behavior::Registry;
use stratum_core::{BlockPos, BlockState, FluidState, GridView, SectionPos, WorldGrid};
use stratum_space::Space;

/// Dense, single-owner world storage over a [`Space`].
///
/// # Examples
///
/// ```
/// use stratum_behavior::Registry;
/// use stratum_core::{BlockPos, GridView, WorldGrid};
/// use stratum_engine::MemoryGrid;
/// use stratum_space::Cuboid;
///
/// let registry = Registry::builder().build();
/// let space = Cuboid::with_size(4, 4, 4).unwrap();
/// let mut grid = MemoryGrid::new(space, &registry, 42);
///
/// assert!(grid.get_state(BlockPos::new(3, 3, 3)).unwrap().is_empty());
/// assert!(grid.get_state(BlockPos::new(4, 0, 0)).is_none());
///
/// let before = grid.snapshot();
/// assert!(!grid.set_state(BlockPos::new(0, 0, 0), registry.empty_state()));
/// assert_eq!(before, grid.snapshot());
/// ```
pub struct MemoryGrid {
    space: Arc<dyn Space>,
    blocks: Arc<Vec<BlockState>>,
    fluids: Arc<Vec<FluidState>>,
    seed: u64,
    client_side: bool,
}

impl MemoryGrid {
    /// A grid covering `space`, every cell empty.
    pub fn new(space: impl Space, registry: &Registry, seed: u64) -> Self {
        Self::from_shared(Arc::new(space), registry, seed)
    }

    /// A grid over an already shared space.
    pub fn from_shared(space: Arc<dyn Space>, registry: &Registry, seed: u64) -> Self {
        let n = space.cell_count();
        Self {
            space,
            blocks: Arc::new(vec![registry.empty_state(); n]),
            fluids: Arc::new(vec![FluidState::EMPTY; n]),
            seed,
            client_side: false,
        }
    }

    /// Mark this grid as a client-side replica (side effects suppressed).
    pub fn with_client_side(mut self, client_side: bool) -> Self {
        self.client_side = client_side;
        self
    }

    /// The space this grid covers.
    pub fn space(&self) -> &dyn Space {
        self.space.as_ref()
    }

    /// Write `state` into every addressable cell of the box `min..=max`,
    /// without notifying anyone. Returns the number of cells written.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, state: &BlockState) -> usize {
        let mut written = 0;
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    if self.set_state(BlockPos::new(x, y, z), state.clone()) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Number of cells holding a non-empty block.
    pub fn occupied(&self) -> usize {
        self.blocks.iter().filter(|s| !s.is_empty()).count()
    }

    /// Immutable copy of the current contents.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            space: Arc::clone(&self.space),
            blocks: Arc::clone(&self.blocks),
            fluids: Arc::clone(&self.fluids),
        }
    }
}

impl GridView for MemoryGrid {
    fn get_state(&self, pos: BlockPos) -> Option<BlockState> {
        let rank = self.space.canonical_rank(pos)?;
        self.blocks.get(rank).cloned()
    }

    fn get_fluid(&self, pos: BlockPos) -> FluidState {
        self.space
            .canonical_rank(pos)
            .and_then(|rank| self.fluids.get(rank).copied())
            .unwrap_or(FluidState::EMPTY)
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        self.space.contains(pos)
    }
}

impl WorldGrid for MemoryGrid {
    fn set_state(&mut self, pos: BlockPos, state: BlockState) -> bool {
        let Some(rank) = self.space.canonical_rank(pos) else {
            return false;
        };
        if self.blocks[rank] == state {
            return false;
        }
        Arc::make_mut(&mut self.blocks)[rank] = state;
        true
    }

    fn set_fluid(&mut self, pos: BlockPos, fluid: FluidState) -> bool {
        let Some(rank) = self.space.canonical_rank(pos) else {
            return false;
        };
        if self.fluids[rank] == fluid {
            return false;
        }
        Arc::make_mut(&mut self.fluids)[rank] = fluid;
        true
    }

    fn is_client_side(&self) -> bool {
        self.client_side
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn loaded_sections(&self) -> Vec<SectionPos> {
        self.space.sections()
    }
}

// ── GridSnapshot ───────────────────────────────────────────────────

/// An immutable, thread-shareable view of a [`MemoryGrid`] at one moment.
///
/// Equality compares cell contents only.
#[derive(Clone)]
pub struct GridSnapshot {
    space: Arc<dyn Space>,
    blocks: Arc<Vec<BlockState>>,
    fluids: Arc<Vec<FluidState>>,
}

impl GridSnapshot {
    /// The space the snapshot covers.
    pub fn space(&self) -> &dyn Space {
        self.space.as_ref()
    }

    /// Every addressable cell with its block and fluid, in canonical order.
    pub fn cells(&self) -> impl Iterator<Item = (BlockPos, &BlockState, FluidState)> + '_ {
        self.space
            .canonical_ordering()
            .into_iter()
            .zip(self.blocks.iter().zip(self.fluids.iter()))
            .map(|(pos, (b, &f))| (pos, b, f))
    }
}

impl GridView for GridSnapshot {
    fn get_state(&self, pos: BlockPos) -> Option<BlockState> {
        let rank = self.space.canonical_rank(pos)?;
        self.blocks.get(rank).cloned()
    }

    fn get_fluid(&self, pos: BlockPos) -> FluidState {
        self.space
            .canonical_rank(pos)
            .and_then(|rank| self.fluids.get(rank).copied())
            .unwrap_or(FluidState::EMPTY)
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        self.space.contains(pos)
    }
}

impl PartialEq for GridSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks && self.fluids == other.fluids
    }
}

impl Eq for GridSnapshot {}

impl std::fmt::Debug for GridSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSnapshot")
            .field("cells", &self.blocks.len())
            .field("occupied", &self.blocks.iter().filter(|s| !s.is_empty()).count())
            .finish()
    }
}
