//! Uniform cell sampling for random ticks.

use rand::Rng;

use stratum_core::{BlockPos, SectionPos, TickRng};

/// Draw `count` cells of `section` uniformly, with replacement.
///
/// Draws exactly `count` values from `rng`, so the stream position after
/// sampling depends only on `count`.
pub fn sample_positions(rng: &mut TickRng, section: SectionPos, count: u32) -> Vec<BlockPos> {
    let size = SectionPos::SIZE;
    (0..count)
        .map(|_| {
            let local = rng.gen_range(0..SectionPos::VOLUME) as i32;
            section.cell(local / (size * size), (local / size) % size, local % size)
        })
        .collect()
}
