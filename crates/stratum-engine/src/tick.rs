//! Tick engine: the single-threaded block-behavior loop.
//!
//! [`TickEngine`] owns the pending-tick queues, the side-effect sink,
//! and the clock. It never owns the world: every entry point takes the
//! grid it acts on. Each [`on_tick_step()`](TickEngine::on_tick_step)
//! advances the clock by one and runs two phases:
//!
//! 1. **Scheduled.** Due block ticks fire, then due fluid ticks, in
//!    `(deadline, priority, insertion)` order, up to the per-step budget.
//! 2. **Random.** Every loaded section is sampled `random_tick_speed`
//!    times; randomly ticking cells get `random_tick` and change-over-time
//!    cells are run through the diffusion sampler.
//!
//! Every world edit, whether external or requested by a handler, is
//! resolved through a cascade before the call returns.

use std::sync::Arc;
use std::time::Instant;

use stratum_behavior::{Registry, ShapeContext};
use stratum_core::{
    sequence_stream, BlockPos, BlockState, Direction, Fluid, FluidState, SideEffects, TargetKind,
    TickId, TickPriority, TickRng, TickTarget, WorldGrid,
};

use crate::cascade::{Cascade, CascadeReport};
use crate::config::{ConfigError, EngineConfig};
use crate::diffusion::{DiffusionOutcome, DiffusionSampler};
use crate::metrics::StepMetrics;
use crate::random_tick::sample_positions;
use crate::schedule::{ScheduledTick, TickScheduler};

/// Single-threaded block-behavior engine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stratum_behavior::{BlockAttributes, BlockDef, Registry};
/// use stratum_core::{BlockPos, GridView};
/// use stratum_engine::{EngineConfig, MemoryGrid, TickEngine};
/// use stratum_space::Cuboid;
///
/// let mut builder = Registry::builder();
/// let stone = builder
///     .register(BlockDef::new("stone").attributes(BlockAttributes::SOLID))
///     .unwrap();
/// let registry = Arc::new(builder.build());
///
/// let mut grid = MemoryGrid::new(Cuboid::with_size(8, 8, 8).unwrap(), &registry, 7);
/// let mut engine = TickEngine::new(registry.clone(), EngineConfig::default()).unwrap();
///
/// let pos = BlockPos::new(1, 1, 1);
/// let report = engine.set_block(&mut grid, pos, registry.default_state(stone).unwrap(), true);
/// assert_eq!(report.applied, 1);
/// assert!(grid.get_state(pos).unwrap().is(stone));
///
/// let metrics = engine.on_tick_step(&mut grid);
/// assert_eq!(metrics.tick.0, 1);
/// assert_eq!(metrics.cascade_updates, 1);
/// ```
pub struct TickEngine {
    registry: Arc<Registry>,
    config: EngineConfig,
    scheduler: TickScheduler,
    sampler: DiffusionSampler,
    sink: Box<dyn SideEffects + Send>,
    current_tick: TickId,
    op_seq: u64,
    pending: StepMetrics,
    last_metrics: StepMetrics,
}

impl TickEngine {
    /// Construct an engine over `registry`.
    ///
    /// Validates `config`. Side effects are dropped until a sink is
    /// installed with [`with_side_effects`](Self::with_side_effects).
    pub fn new(registry: Arc<Registry>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = DiffusionSampler::new(&config.diffusion);
        Ok(Self {
            registry,
            config,
            scheduler: TickScheduler::new(),
            sampler,
            sink: Box::new(()),
            current_tick: TickId(0),
            op_seq: 0,
            pending: StepMetrics::default(),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Install the side-effect sink.
    pub fn with_side_effects(mut self, sink: impl SideEffects + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Random stream for the next externally triggered operation.
    fn next_rng<G: WorldGrid>(&mut self, grid: &G) -> TickRng {
        let rng = sequence_stream(grid.seed(), self.current_tick, self.op_seq);
        self.op_seq += 1;
        rng
    }

    fn cascade<'a>(&'a mut self, registry: &'a Registry, rng: &'a mut TickRng) -> Cascade<'a> {
        Cascade::new(
            registry,
            &mut self.scheduler,
            self.sink.as_mut(),
            &mut self.pending,
            rng,
            self.current_tick,
            &self.config,
        )
    }

    // ── Edits ──────────────────────────────────────────────────────

    /// Settle a change the caller already wrote into `grid`.
    ///
    /// If the block type changed, pending block ticks at `pos` are purged
    /// and the `on_remove` and `on_place` hooks run. With `propagate`,
    /// the six face neighbours are then updated, recursively.
    pub fn on_cell_changed<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        old: &BlockState,
        new: &BlockState,
        propagate: bool,
    ) -> CascadeReport {
        let registry = Arc::clone(&self.registry);
        let mut rng = self.next_rng(grid);
        let mut c = self.cascade(&registry, &mut rng);
        c.settle_external(grid, pos, old, new, propagate);
        c.run(grid);
        c.finish()
    }

    /// Write `state` at `pos` and resolve the consequences.
    ///
    /// Writing the state a cell already holds, or writing outside the
    /// grid, does nothing.
    pub fn set_block<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        state: BlockState,
        propagate: bool,
    ) -> CascadeReport {
        let registry = Arc::clone(&self.registry);
        let mut rng = self.next_rng(grid);
        let mut c = self.cascade(&registry, &mut rng);
        c.push_write(pos, state, propagate, 0);
        c.run(grid);
        c.finish()
    }

    /// Write `fluid` at `pos` and resolve the consequences.
    ///
    /// A non-empty fluid is only accepted into a cell holding the empty
    /// block or a fluid container.
    pub fn set_fluid<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos, fluid: FluidState) -> CascadeReport {
        let registry = Arc::clone(&self.registry);
        let mut rng = self.next_rng(grid);
        let mut c = self.cascade(&registry, &mut rng);
        c.push_fluid(pos, fluid, 0);
        c.run(grid);
        c.finish()
    }

    // ── Scheduling ─────────────────────────────────────────────────

    /// Schedule `target` at `pos`, `delay` ticks from now, at normal priority.
    ///
    /// Overwrites any pending tick of the same kind at `pos`.
    pub fn schedule_tick(&mut self, pos: BlockPos, target: TickTarget, delay: u64) {
        self.schedule_tick_with_priority(pos, target, delay, TickPriority::Normal);
    }

    /// [`schedule_tick`](Self::schedule_tick) with an explicit priority.
    pub fn schedule_tick_with_priority(
        &mut self,
        pos: BlockPos,
        target: TickTarget,
        delay: u64,
        priority: TickPriority,
    ) {
        self.scheduler
            .schedule(pos, target, self.current_tick.after(delay), priority);
    }

    /// Drop the pending tick of `kind` at `pos`. Returns whether one was
    /// pending.
    ///
    /// Takes effect immediately, including for a tick due later in the
    /// step currently firing.
    pub fn purge_pending(&mut self, pos: BlockPos, kind: TargetKind) -> bool {
        self.scheduler.purge(pos, kind).is_some()
    }

    /// Drop every pending tick at `pos`. Returns how many were dropped.
    pub fn purge_all_pending(&mut self, pos: BlockPos) -> usize {
        self.scheduler.purge_all(pos)
    }

    /// Whether a tick of `kind` is pending at `pos`.
    pub fn is_tick_scheduled(&self, pos: BlockPos, kind: TargetKind) -> bool {
        self.scheduler.is_scheduled(pos, kind)
    }

    /// The pending tick of `kind` at `pos`.
    pub fn pending_tick(&self, pos: BlockPos, kind: TargetKind) -> Option<&ScheduledTick> {
        self.scheduler.get(pos, kind)
    }

    /// Number of pending ticks of both kinds.
    pub fn pending_len(&self) -> usize {
        self.scheduler.len()
    }

    // ── Step ───────────────────────────────────────────────────────

    /// Advance the clock by one tick and run the scheduled and random phases.
    ///
    /// The returned metrics also cover every edit made through this
    /// engine since the previous step.
    pub fn on_tick_step<G: WorldGrid>(&mut self, grid: &mut G) -> StepMetrics {
        let step_start = Instant::now();
        self.current_tick = self.current_tick.after(1);
        self.op_seq = 0;
        let registry = Arc::clone(&self.registry);

        let scheduled_start = Instant::now();
        self.run_scheduled(grid, &registry);
        let scheduled_us = scheduled_start.elapsed().as_micros() as u64;

        let random_start = Instant::now();
        self.run_random(grid, &registry);
        let random_us = random_start.elapsed().as_micros() as u64;

        let mut metrics = std::mem::take(&mut self.pending);
        metrics.tick = self.current_tick;
        metrics.scheduled_us = scheduled_us;
        metrics.random_us = random_us;
        metrics.total_us = step_start.elapsed().as_micros() as u64;
        log::trace!(
            "tick {}: {} scheduled fired, {} random delivered, {} writes",
            metrics.tick.0,
            metrics.scheduled_ticks_fired,
            metrics.random_ticks_delivered,
            metrics.cascade_updates
        );
        self.last_metrics = metrics.clone();
        metrics
    }

    /// Fire due entries one at a time, so a tick that purges a later
    /// entry of the same step keeps it from firing. Entries scheduled
    /// while firing wait for the next step.
    fn run_scheduled<G: WorldGrid>(&mut self, grid: &mut G, registry: &Registry) {
        let now = self.current_tick;
        let mark = self.scheduler.mark();
        let mut budget = self.config.max_scheduled_ticks_per_step as usize;
        let mut rng = self.next_rng(grid);
        for kind in [TargetKind::Block, TargetKind::Fluid] {
            while budget > 0 {
                let Some(entry) = self.scheduler.pop_due(kind, now, mark) else {
                    break;
                };
                budget -= 1;
                self.fire(grid, registry, &entry, &mut rng);
            }
        }

        let deferred = self.scheduler.due_len(now, mark);
        if deferred > 0 {
            log::debug!("tick {}: {deferred} due scheduled ticks deferred", now.0);
        }
        self.pending.deferred_scheduled_ticks += deferred as u32;
    }

    fn fire<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        registry: &Registry,
        entry: &ScheduledTick,
        rng: &mut TickRng,
    ) {
        let pos = entry.pos;
        match entry.target {
            TickTarget::Block(type_id) => {
                let Some(state) = grid.get_state(pos).filter(|s| s.is(type_id)) else {
                    self.stale(entry);
                    return;
                };
                self.pending.scheduled_ticks_fired += 1;
                let falls = registry.fallable(type_id).is_some()
                    && ShapeContext::new(&*grid, registry).is_free(pos.below());
                if falls {
                    self.fall(grid, registry, pos, &state, rng);
                    return;
                }
                let mut c = self.cascade(registry, rng);
                c.invoke(grid, 0, |ctx| registry.behavior(type_id).tick(ctx, pos, &state));
                c.run(grid);
                c.finish();
            }
            TickTarget::Fluid(fluid) => {
                let current = grid.get_fluid(pos);
                if current.is_empty() || current.fluid != fluid {
                    self.stale(entry);
                    return;
                }
                self.pending.scheduled_ticks_fired += 1;
                let Some(behavior) = registry.fluid_behavior(fluid) else {
                    return;
                };
                let mut c = self.cascade(registry, rng);
                c.invoke(grid, 0, |ctx| behavior.tick(ctx, pos, current));
                c.run(grid);
                c.finish();
            }
        }
    }

    fn stale(&mut self, entry: &ScheduledTick) {
        self.pending.stale_scheduled_ticks += 1;
        log::debug!(
            "stale {} tick at {} (scheduled for {:?}) dropped",
            entry.target.kind(),
            entry.pos,
            entry.target
        );
    }

    /// Drop a fallable block straight down to the lowest free cell.
    fn fall<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        registry: &Registry,
        pos: BlockPos,
        state: &BlockState,
        rng: &mut TickRng,
    ) {
        let landing = {
            let ctx = ShapeContext::new(&*grid, registry);
            let mut at = pos.below();
            while ctx.is_free(at.below()) {
                at = at.below();
            }
            at
        };
        let Some(replaced) = grid.get_state(landing) else {
            return;
        };
        self.pending.falls += 1;

        let mut c = self.cascade(registry, rng);
        c.push_write(pos, registry.empty_state(), true, 0);
        c.push_write(landing, state.clone(), true, 0);
        c.run(grid);
        if grid.get_state(landing).as_ref() == Some(state) {
            if let Some(fallable) = registry.fallable(state.type_id()) {
                c.invoke(grid, 0, |ctx| fallable.on_land(ctx, landing, state, &replaced));
                c.run(grid);
            }
        }
        c.finish();
    }

    fn run_random<G: WorldGrid>(&mut self, grid: &mut G, registry: &Registry) {
        let speed = self.config.random_tick_speed;
        if speed == 0 {
            return;
        }
        let now = self.current_tick;
        for section in grid.loaded_sections() {
            let mut rng = grid.random_stream(now, section);
            for pos in sample_positions(&mut rng, section, speed) {
                self.pending.random_samples += 1;
                let Some(state) = grid.get_state(pos) else {
                    continue;
                };
                let behavior = registry.behavior(state.type_id());
                if behavior.is_randomly_ticking(&state) {
                    self.pending.random_ticks_delivered += 1;
                    let mut c = self.cascade(registry, &mut rng);
                    c.invoke(grid, 0, |ctx| behavior.random_tick(ctx, pos, &state));
                    c.run(grid);
                    c.finish();
                }
                self.diffuse(grid, registry, pos, &mut rng);
            }
        }
    }

    /// Run the diffusion sampler on the cell at `pos`, as it stands now.
    fn diffuse<G: WorldGrid>(&mut self, grid: &mut G, registry: &Registry, pos: BlockPos, rng: &mut TickRng) {
        let Some(state) = grid.get_state(pos) else {
            return;
        };
        let outcome = {
            let ctx = ShapeContext::new(&*grid, registry);
            self.sampler.evaluate(&ctx, pos, &state, rng)
        };
        match outcome {
            DiffusionOutcome::NotEvaluated => {}
            DiffusionOutcome::Blocked | DiffusionOutcome::Stayed => {
                self.pending.diffusion_evaluations += 1;
            }
            DiffusionOutcome::Advanced(next) => {
                self.pending.diffusion_evaluations += 1;
                self.pending.diffusion_advances += 1;
                let mut c = self.cascade(registry, rng);
                c.push_write(pos, next, true, 0);
                c.run(grid);
                c.finish();
            }
        }
    }

    // ── Capabilities ───────────────────────────────────────────────

    /// Apply growth (fertilizer) to the cell at `pos`.
    ///
    /// Returns `true` if the cell is a valid growth target, whether or
    /// not the success roll passed.
    pub fn apply_growth<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos) -> bool {
        let registry = Arc::clone(&self.registry);
        let Some(state) = grid.get_state(pos) else {
            return false;
        };
        let Some(growable) = registry.growable(state.type_id()) else {
            return false;
        };
        if !growable.is_valid_target(&ShapeContext::new(&*grid, &registry), pos, &state) {
            return false;
        }
        let mut rng = self.next_rng(grid);
        if growable.try_succeed(&mut rng, pos, &state) {
            let mut c = self.cascade(&registry, &mut rng);
            c.invoke(grid, 0, |ctx| growable.apply(ctx, pos, &state));
            c.run(grid);
            c.finish();
        }
        true
    }

    /// Place a source of `fluid` at `pos`.
    ///
    /// Fluid containers take the fluid through their capability. Cells
    /// holding the empty block, or a replaceable one, are filled
    /// directly. Returns whether the fluid was placed.
    pub fn place_fluid<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos, fluid: Fluid) -> bool {
        if fluid == Fluid::Empty {
            return false;
        }
        let registry = Arc::clone(&self.registry);
        let Some(state) = grid.get_state(pos) else {
            return false;
        };
        let source = FluidState::source(fluid);
        let contained = match registry.fluid_container(state.type_id()) {
            Some(container) => {
                if !container.can_place_fluid(&state, fluid) {
                    return false;
                }
                let Some(filled) = container.place_fluid(&state, source) else {
                    return false;
                };
                Some(filled)
            }
            None if state.is_empty() => None,
            None if registry.attributes(state.type_id()).replaceable => Some(registry.empty_state()),
            None => return false,
        };
        let mut rng = self.next_rng(grid);
        let mut c = self.cascade(&registry, &mut rng);
        if let Some(block) = contained {
            c.push_write(pos, block, true, 0);
        }
        c.push_fluid(pos, source, 0);
        c.run(grid);
        c.finish();
        grid.get_fluid(pos) == source
    }

    /// Pick up the fluid at `pos`, leaving the cell drained.
    ///
    /// Fluid sources give up their fluid through their capability; an
    /// open source fluid is taken directly. Flowing fluid cannot be
    /// picked up.
    pub fn pickup_fluid<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos) -> Option<Fluid> {
        let registry = Arc::clone(&self.registry);
        let state = grid.get_state(pos)?;
        let (drained, fluid) = match registry.fluid_source(state.type_id()) {
            Some(source) => {
                let (drained, fluid) = source.pickup(&state)?;
                (Some(drained), fluid)
            }
            None => {
                let held = grid.get_fluid(pos);
                if !held.is_source() {
                    return None;
                }
                (None, held.fluid)
            }
        };
        let mut rng = self.next_rng(grid);
        let mut c = self.cascade(&registry, &mut rng);
        if let Some(block) = drained {
            c.push_write(pos, block, true, 0);
        }
        c.push_fluid(pos, FluidState::EMPTY, 0);
        c.run(grid);
        c.finish();
        Some(fluid)
    }

    /// Signal the block at `pos` emits out of its face pointing in `direction`.
    pub fn signal<G: WorldGrid>(&self, grid: &G, pos: BlockPos, direction: Direction) -> u8 {
        ShapeContext::new(grid, &self.registry).signal(pos, direction)
    }

    /// Strongest signal any face neighbour emits toward `pos`.
    pub fn best_neighbor_signal<G: WorldGrid>(&self, grid: &G, pos: BlockPos) -> u8 {
        ShapeContext::new(grid, &self.registry).best_neighbor_signal(pos)
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The tick most recently stepped to.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Metrics of the most recent step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// The block registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
