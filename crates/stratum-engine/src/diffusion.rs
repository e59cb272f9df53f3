//! Change-over-time diffusion: aging that spreads from older neighbours.
//!
//! A sampled cell whose type implements
//! [`ChangeOverTime`](stratum_behavior::ChangeOverTime) is first gated by
//! a fixed probability. If it passes, every cell within the configured
//! Manhattan radius is scanned. Neighbours whose age property shares the
//! cell's domain are compared by age ordinal: any younger neighbour
//! blocks the cell outright, otherwise older neighbours (`more`) and
//! same-age neighbours (`peers`) are tallied and the cell advances with
//! probability `((more + 1) / (more + peers + 1))² × chance_modifier`.

use rand::Rng;

use stratum_behavior::{ChangeOverTime, ShapeContext};
use stratum_core::{BlockPos, BlockState, TickRng};

use crate::config::DiffusionConfig;

/// Older and same-age neighbour counts of one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffusionTally {
    /// Same-domain neighbours at a strictly greater age.
    pub more: u32,
    /// Same-domain neighbours at the same age.
    pub peers: u32,
}

impl DiffusionTally {
    /// Advancement probability for this tally, scaled by `modifier`.
    ///
    /// ```
    /// use stratum_engine::DiffusionTally;
    ///
    /// let alone = DiffusionTally { more: 0, peers: 0 };
    /// assert_eq!(alone.advance_probability(0.75), 0.75);
    /// let crowded = DiffusionTally { more: 0, peers: 3 };
    /// assert_eq!(crowded.advance_probability(1.0), 1.0 / 16.0);
    /// ```
    pub fn advance_probability(&self, modifier: f64) -> f64 {
        let frac = f64::from(self.more + 1) / f64::from(self.more + self.peers + 1);
        frac * frac * modifier
    }
}

/// Result of scanning a cell's neighbourhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A same-domain neighbour is younger; the cell may not advance.
    Laggard,
    /// No younger neighbour; the counts to roll against.
    Tally(DiffusionTally),
}

/// Result of one diffusion evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffusionOutcome {
    /// The cell has no change-over-time capability or failed the gate.
    NotEvaluated,
    /// A younger neighbour blocked the cell.
    Blocked,
    /// Evaluated, and the roll or the final stage kept the cell as is.
    Stayed,
    /// The cell advances to this state.
    Advanced(BlockState),
}

/// Evaluates change-over-time cells against their neighbourhood.
///
/// Scan offsets are precomputed once per radius, in ascending
/// `(dx, dy, dz)` order.
#[derive(Clone, Debug)]
pub struct DiffusionSampler {
    gate_probability: f64,
    radius: u32,
    offsets: Vec<(i32, i32, i32)>,
}

impl DiffusionSampler {
    /// Build a sampler from validated configuration.
    pub fn new(config: &DiffusionConfig) -> Self {
        let r = config.radius as i32;
        let mut offsets = Vec::new();
        for dx in -r..=r {
            let ry = r - dx.abs();
            for dy in -ry..=ry {
                let rz = ry - dy.abs();
                for dz in -rz..=rz {
                    if (dx, dy, dz) != (0, 0, 0) {
                        offsets.push((dx, dy, dz));
                    }
                }
            }
        }
        Self {
            gate_probability: config.gate_probability,
            radius: config.radius,
            offsets,
        }
    }

    /// Manhattan scan radius.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of cells inspected per scan.
    pub fn scan_len(&self) -> usize {
        self.offsets.len()
    }

    /// Scan the neighbourhood of `state` at `pos`, whose age lives in the
    /// property named `age`.
    ///
    /// Unaddressable cells and cells of other age domains are ignored.
    pub fn scan(&self, ctx: &ShapeContext<'_>, pos: BlockPos, state: &BlockState, age: &str) -> ScanOutcome {
        let Some(domain) = state.schema().property(age).map(|p| p.domain()) else {
            return ScanOutcome::Tally(DiffusionTally::default());
        };
        let own = state.ordinal(age);
        let registry = ctx.registry();
        let mut tally = DiffusionTally::default();

        for &(dx, dy, dz) in &self.offsets {
            let npos = BlockPos::new(pos.x.wrapping_add(dx), pos.y.wrapping_add(dy), pos.z.wrapping_add(dz));
            let Some(neighbor) = ctx.state_at(npos) else {
                continue;
            };
            let Some(other) = registry.change_over_time(neighbor.type_id()) else {
                continue;
            };
            let other_age = other.age_property();
            let same_domain = neighbor
                .schema()
                .property(other_age)
                .is_some_and(|p| p.domain() == domain);
            if !same_domain {
                continue;
            }
            let theirs = neighbor.ordinal(other_age);
            if theirs < own {
                return ScanOutcome::Laggard;
            }
            if theirs > own {
                tally.more += 1;
            } else {
                tally.peers += 1;
            }
        }
        ScanOutcome::Tally(tally)
    }

    /// Run the gate, the scan, and the advancement roll for `state` at `pos`.
    ///
    /// Draws from `rng` only for types with the capability: once for the
    /// gate and, if the scan tallies, once for the roll.
    pub fn evaluate(
        &self,
        ctx: &ShapeContext<'_>,
        pos: BlockPos,
        state: &BlockState,
        rng: &mut TickRng,
    ) -> DiffusionOutcome {
        let Some(cot) = ctx.registry().change_over_time(state.type_id()) else {
            return DiffusionOutcome::NotEvaluated;
        };
        if rng.gen::<f64>() >= self.gate_probability {
            return DiffusionOutcome::NotEvaluated;
        }
        self.advance(ctx, cot, pos, state, rng)
    }

    /// The post-gate part of [`evaluate`](Self::evaluate).
    fn advance(
        &self,
        ctx: &ShapeContext<'_>,
        cot: &dyn ChangeOverTime,
        pos: BlockPos,
        state: &BlockState,
        rng: &mut TickRng,
    ) -> DiffusionOutcome {
        let tally = match self.scan(ctx, pos, state, cot.age_property()) {
            ScanOutcome::Laggard => return DiffusionOutcome::Blocked,
            ScanOutcome::Tally(t) => t,
        };
        let p = tally.advance_probability(cot.chance_modifier(state));
        if rng.gen::<f64>() >= p {
            return DiffusionOutcome::Stayed;
        }
        match cot.next_state(state) {
            Some(next) => DiffusionOutcome::Advanced(next),
            None => DiffusionOutcome::Stayed,
        }
    }
}
