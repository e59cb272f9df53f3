//! Axis-aligned box of cells.

use crate::error::SpaceError;
use crate::space::Space;
use stratum_core::{BlockPos, SectionPos};

/// A bounded, axis-aligned box of cells, corners inclusive.
///
/// Canonical order is ascending [`BlockPos`] order (x outermost, z
/// innermost), so [`canonical_rank`](Space::canonical_rank) is plain
/// mixed-radix arithmetic. Every cell of the box is addressable; cells
/// outside it are not.
///
/// # Examples
///
/// ```
/// use stratum_core::BlockPos;
/// use stratum_space::{Cuboid, Space};
///
/// let space = Cuboid::new(BlockPos::new(0, 0, 0), BlockPos::new(3, 1, 2)).unwrap();
/// assert_eq!(space.cell_count(), 4 * 2 * 3);
/// assert!(space.contains(BlockPos::new(3, 1, 2)));
/// assert!(!space.contains(BlockPos::new(0, 2, 0)));
/// assert_eq!(space.canonical_rank(BlockPos::new(0, 0, 1)), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Cuboid {
    min: BlockPos,
    max: BlockPos,
    /// Extent along each axis, in cells.
    dims: [usize; 3],
}

impl Cuboid {
    /// Create a box spanning `min..=max` on every axis.
    ///
    /// Returns `Err(SpaceError::InvertedBounds)` if `min` exceeds `max` on
    /// any axis, or `Err(SpaceError::TooManyCells)` if the volume
    /// overflows `usize`.
    pub fn new(min: BlockPos, max: BlockPos) -> Result<Self, SpaceError> {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(SpaceError::InvertedBounds { min, max });
        }
        let extent = |lo: i32, hi: i32| -> Result<usize, SpaceError> {
            usize::try_from(i64::from(hi) - i64::from(lo) + 1).map_err(|_| SpaceError::TooManyCells)
        };
        let dims = [
            extent(min.x, max.x)?,
            extent(min.y, max.y)?,
            extent(min.z, max.z)?,
        ];
        dims[0]
            .checked_mul(dims[1])
            .and_then(|v| v.checked_mul(dims[2]))
            .ok_or(SpaceError::TooManyCells)?;
        Ok(Self { min, max, dims })
    }

    /// A box of `sx * sy * sz` cells with its minimum corner at the origin.
    pub fn with_size(sx: u32, sy: u32, sz: u32) -> Result<Self, SpaceError> {
        if sx == 0 || sy == 0 || sz == 0 {
            return Err(SpaceError::EmptySpace);
        }
        let axis = |s: u32| i32::try_from(s - 1).map_err(|_| SpaceError::TooManyCells);
        Self::new(BlockPos::ORIGIN, BlockPos::new(axis(sx)?, axis(sy)?, axis(sz)?))
    }

    /// Minimum corner (inclusive).
    pub fn min(&self) -> BlockPos {
        self.min
    }

    /// Maximum corner (inclusive).
    pub fn max(&self) -> BlockPos {
        self.max
    }

    /// Always returns `false`; construction rejects empty boxes.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Space for Cuboid {
    fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    fn cell_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    fn sections(&self) -> Vec<SectionPos> {
        let lo = self.min.section();
        let hi = self.max.section();
        let mut out = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    out.push(SectionPos::new(x, y, z));
                }
            }
        }
        out
    }

    fn canonical_ordering(&self) -> Vec<BlockPos> {
        let mut out = Vec::with_capacity(self.cell_count());
        for x in self.min.x..=self.max.x {
            for y in self.min.y..=self.max.y {
                for z in self.min.z..=self.max.z {
                    out.push(BlockPos::new(x, y, z));
                }
            }
        }
        out
    }

    fn canonical_rank(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let dx = (i64::from(pos.x) - i64::from(self.min.x)) as usize;
        let dy = (i64::from(pos.y) - i64::from(self.min.y)) as usize;
        let dz = (i64::from(pos.z) - i64::from(self.min.z)) as usize;
        Some((dx * self.dims[1] + dy) * self.dims[2] + dz)
    }
}
