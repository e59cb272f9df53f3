//! Per-step metrics for the tick engine.
//!
//! [`StepMetrics`] captures timing and counters for a single step,
//! including any edits applied through the engine since the previous
//! step.

use stratum_core::TickId;

/// Timing and counters collected during a single step.
///
/// All durations are in microseconds. Counters cover the step itself
/// plus every engine call made between the previous step and this one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// The tick this step advanced to.
    pub tick: TickId,
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent firing scheduled ticks, in microseconds.
    pub scheduled_us: u64,
    /// Time spent on random-tick sampling and diffusion, in microseconds.
    pub random_us: u64,
    /// Scheduled ticks whose handler ran.
    pub scheduled_ticks_fired: u32,
    /// Scheduled ticks that fired against a cell whose contents no longer
    /// matched; dropped without running a handler.
    pub stale_scheduled_ticks: u32,
    /// Due scheduled ticks left queued by the per-step budget.
    pub deferred_scheduled_ticks: u32,
    /// Falls resolved for fallable blocks.
    pub falls: u32,
    /// Cells drawn by random-tick sampling.
    pub random_samples: u32,
    /// `random_tick` handler invocations.
    pub random_ticks_delivered: u32,
    /// Diffusion evaluations that passed the gate.
    pub diffusion_evaluations: u32,
    /// Diffusion evaluations that advanced a cell.
    pub diffusion_advances: u32,
    /// Block and fluid writes applied, cascades included.
    pub cascade_updates: u64,
    /// Top-level edits whose cascade hit a cap.
    pub cascades_truncated: u32,
    /// Side effects forwarded to the sink.
    pub side_effects_emitted: u32,
    /// Side effects dropped because the grid is client-side.
    pub side_effects_suppressed: u32,
}
