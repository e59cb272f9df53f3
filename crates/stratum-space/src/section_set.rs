//! Sparse set of loaded 16³ sections.

use std::collections::BTreeSet;

use crate::error::SpaceError;
use crate::space::Space;
use stratum_core::{BlockPos, SectionPos};

const SIZE: usize = SectionPos::SIZE as usize;

/// An unbounded world in which only some sections are loaded.
///
/// A cell is addressable iff its section is in the set. Canonical order
/// walks sections in ascending order and, within a section, local
/// offsets in `(x, y, z)` order.
#[derive(Debug, Clone)]
pub struct SectionSet {
    /// Sorted, deduplicated.
    sections: Vec<SectionPos>,
}

impl SectionSet {
    /// Build from any collection of sections; duplicates are ignored.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if no section is given.
    pub fn new(sections: impl IntoIterator<Item = SectionPos>) -> Result<Self, SpaceError> {
        let sections: Vec<SectionPos> = sections
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if sections.is_empty() {
            return Err(SpaceError::EmptySpace);
        }
        sections
            .len()
            .checked_mul(SectionPos::VOLUME)
            .ok_or(SpaceError::TooManyCells)?;
        Ok(Self { sections })
    }

    /// Number of loaded sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always returns `false`; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `section` is loaded.
    pub fn is_loaded(&self, section: SectionPos) -> bool {
        self.sections.binary_search(&section).is_ok()
    }
}

fn local_index(pos: BlockPos) -> usize {
    let lx = pos.x.rem_euclid(SectionPos::SIZE) as usize;
    let ly = pos.y.rem_euclid(SectionPos::SIZE) as usize;
    let lz = pos.z.rem_euclid(SectionPos::SIZE) as usize;
    (lx * SIZE + ly) * SIZE + lz
}

impl Space for SectionSet {
    fn contains(&self, pos: BlockPos) -> bool {
        self.is_loaded(pos.section())
    }

    fn cell_count(&self) -> usize {
        self.sections.len() * SectionPos::VOLUME
    }

    fn sections(&self) -> Vec<SectionPos> {
        self.sections.clone()
    }

    fn canonical_ordering(&self) -> Vec<BlockPos> {
        let mut out = Vec::with_capacity(self.cell_count());
        for section in &self.sections {
            for lx in 0..SectionPos::SIZE {
                for ly in 0..SectionPos::SIZE {
                    for lz in 0..SectionPos::SIZE {
                        out.push(section.cell(lx, ly, lz));
                    }
                }
            }
        }
        out
    }

    fn canonical_rank(&self, pos: BlockPos) -> Option<usize> {
        let idx = self.sections.binary_search(&pos.section()).ok()?;
        Some(idx * SectionPos::VOLUME + local_index(pos))
    }
}
