//! Deterministic, tick- and region-scoped random streams.
//!
//! Every stream is a ChaCha8 generator seeded from
//! `(world seed, tick, section)`, so the same edits replayed over the
//! same tick count draw the same numbers.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::id::{SectionPos, TickId};

/// The generator handed to tick handlers.
pub type TickRng = ChaCha8Rng;

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive the 64-bit seed of the stream for `(tick, region)`.
pub fn stream_seed(world_seed: u64, tick: TickId, region: SectionPos) -> u64 {
    let mut h = mix(world_seed);
    h = mix(h ^ tick.0);
    h = mix(h ^ u64::from(region.x as u32));
    h = mix(h ^ u64::from(region.y as u32));
    mix(h ^ u64::from(region.z as u32))
}

/// Build the random stream for `(tick, region)`.
pub fn random_stream(world_seed: u64, tick: TickId, region: SectionPos) -> TickRng {
    ChaCha8Rng::seed_from_u64(stream_seed(world_seed, tick, region))
}

/// Build the stream for the `sequence`-th engine operation within `tick`.
///
/// Used where randomness is not tied to a region: scheduled-tick firing
/// and externally triggered edits. Disjoint from every region stream of
/// the same tick.
pub fn sequence_stream(world_seed: u64, tick: TickId, sequence: u64) -> TickRng {
    let h = mix(mix(world_seed ^ 0x5EC0_E11C_E000_0000) ^ tick.0);
    ChaCha8Rng::seed_from_u64(mix(h ^ sequence))
}
