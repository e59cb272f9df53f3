//! The core `Space` trait.

use stratum_core::{BlockPos, SectionPos};

/// The addressable region of a voxel world.
///
/// A space decides which cells exist. Cells outside it are
/// unaddressable: neighbour notification skips them and reads of them
/// return nothing. Concrete backends ([`Cuboid`](crate::Cuboid),
/// [`SectionSet`](crate::SectionSet)) define the shape.
///
/// Grids hold their space as `Arc<dyn Space>` and index cell storage by
/// [`canonical_rank`](Space::canonical_rank).
pub trait Space: Send + Sync + 'static {
    /// Whether `pos` is an addressable cell.
    fn contains(&self, pos: BlockPos) -> bool;

    /// Total number of cells in the space.
    fn cell_count(&self) -> usize;

    /// Sections that contain at least one addressable cell, ascending.
    fn sections(&self) -> Vec<SectionPos>;

    /// All cells in deterministic canonical order.
    ///
    /// Two calls on the same space instance must return the same sequence.
    fn canonical_ordering(&self) -> Vec<BlockPos>;

    /// Position of a cell in the canonical ordering, or `None` if the
    /// cell is not addressable.
    ///
    /// Default implementation performs a linear search; backends should
    /// override with O(1) arithmetic.
    fn canonical_rank(&self, pos: BlockPos) -> Option<usize> {
        self.canonical_ordering().iter().position(|&p| p == pos)
    }
}
