//! Neighbour-update propagation: the cascade work queue.
//!
//! A [`Cascade`] resolves one top-level edit against a [`WorldGrid`]. It
//! runs a FIFO queue of writes, fluid writes, scheduling requests, side
//! effects, and neighbour notifications until the queue is empty or a
//! cap is hit. Handler callbacks never touch the grid: their recorded
//! edits are appended to the queue in recording order.
//!
//! # Caps
//!
//! - `max_cascade_updates` bounds the block and fluid writes applied.
//! - `max_cascade_depth` bounds the update chain length from the root.
//! - A `(position, state)` pair is written at most once per cascade;
//!   repeats are suppressed.
//!
//! Hitting a cap drops the rest of the queue. Everything applied so far
//! stays applied.

use std::collections::{HashSet, VecDeque};

use stratum_behavior::{Edit, EditBuffer, Registry, ShapeContext, TickContext};
use stratum_core::{
    BlockPos, BlockState, Direction, FluidState, SideEffect, SideEffects, TargetKind, TickId,
    TickPriority, TickRng, TickTarget, WorldGrid,
};

use crate::config::EngineConfig;
use crate::metrics::StepMetrics;
use crate::schedule::TickScheduler;

/// Outcome of one top-level edit and its cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Block and fluid writes applied, the root edit included.
    pub applied: u32,
    /// Longest update chain reached, in hops from the root.
    pub max_depth: u32,
    /// Whether a cap cut the cascade short.
    pub truncated: bool,
    /// Writes skipped because the same `(position, state)` was already
    /// written in this cascade.
    pub suppressed: u32,
}

enum Work {
    Write {
        pos: BlockPos,
        state: BlockState,
        propagate: bool,
        depth: u32,
    },
    Fluid {
        pos: BlockPos,
        fluid: FluidState,
        depth: u32,
    },
    Schedule {
        pos: BlockPos,
        target: TickTarget,
        delay: u64,
        priority: TickPriority,
    },
    Effect(SideEffect),
    Notify {
        pos: BlockPos,
        state: BlockState,
        depth: u32,
    },
}

/// Resolution state of one top-level edit.
pub(crate) struct Cascade<'a> {
    registry: &'a Registry,
    scheduler: &'a mut TickScheduler,
    sink: &'a mut dyn SideEffects,
    metrics: &'a mut StepMetrics,
    rng: &'a mut TickRng,
    tick: TickId,
    max_updates: u32,
    max_depth: u32,
    queue: VecDeque<Work>,
    seen: HashSet<(BlockPos, BlockState)>,
    scratch: EditBuffer,
    report: CascadeReport,
}

impl<'a> Cascade<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        scheduler: &'a mut TickScheduler,
        sink: &'a mut dyn SideEffects,
        metrics: &'a mut StepMetrics,
        rng: &'a mut TickRng,
        tick: TickId,
        config: &EngineConfig,
    ) -> Self {
        Self {
            registry,
            scheduler,
            sink,
            metrics,
            rng,
            tick,
            max_updates: config.max_cascade_updates,
            max_depth: config.max_cascade_depth,
            queue: VecDeque::new(),
            seen: HashSet::new(),
            scratch: EditBuffer::new(),
            report: CascadeReport::default(),
        }
    }

    /// Queue a block write.
    pub(crate) fn push_write(&mut self, pos: BlockPos, state: BlockState, propagate: bool, depth: u32) {
        self.queue.push_back(Work::Write {
            pos,
            state,
            propagate,
            depth,
        });
    }

    /// Queue a fluid write.
    pub(crate) fn push_fluid(&mut self, pos: BlockPos, fluid: FluidState, depth: u32) {
        self.queue.push_back(Work::Fluid { pos, fluid, depth });
    }

    /// Settle a change the grid already holds: purge, hooks, and (if
    /// `propagate`) neighbour notification.
    pub(crate) fn settle_external<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        old: &BlockState,
        new: &BlockState,
        propagate: bool,
    ) {
        if old == new {
            return;
        }
        self.seen.insert((pos, new.clone()));
        self.settle(grid, pos, old, new, propagate, 0, false);
    }

    /// Run a handler with a [`TickContext`] over `grid` and queue the
    /// edits it records at `depth`.
    pub(crate) fn invoke<G: WorldGrid>(
        &mut self,
        grid: &G,
        depth: u32,
        f: impl FnOnce(&mut TickContext<'_>),
    ) {
        let mut edits = std::mem::take(&mut self.scratch);
        {
            let mut ctx = TickContext::new(grid, self.registry, self.tick, &mut *self.rng, &mut edits);
            f(&mut ctx);
        }
        for edit in edits.drain() {
            if self.report.truncated {
                continue;
            }
            self.queue.push_back(match edit {
                Edit::SetState { pos, state } => Work::Write {
                    pos,
                    state,
                    propagate: true,
                    depth,
                },
                Edit::SetFluid { pos, fluid } => Work::Fluid { pos, fluid, depth },
                Edit::Schedule {
                    pos,
                    target,
                    delay,
                    priority,
                } => Work::Schedule {
                    pos,
                    target,
                    delay,
                    priority,
                },
                Edit::Effect(effect) => Work::Effect(effect),
            });
        }
        self.scratch = edits;
    }

    /// Drain the queue against `grid`.
    pub(crate) fn run<G: WorldGrid>(&mut self, grid: &mut G) {
        while let Some(work) = self.queue.pop_front() {
            match work {
                Work::Write {
                    pos,
                    state,
                    propagate,
                    depth,
                } => self.write_block(grid, pos, state, propagate, depth),
                Work::Fluid { pos, fluid, depth } => self.write_fluid(grid, pos, fluid, depth),
                Work::Schedule {
                    pos,
                    target,
                    delay,
                    priority,
                } => {
                    self.scheduler
                        .schedule(pos, target, self.tick.after(delay), priority);
                }
                Work::Effect(effect) => {
                    if grid.is_client_side() {
                        self.metrics.side_effects_suppressed += 1;
                    } else {
                        self.metrics.side_effects_emitted += 1;
                        self.sink.emit(effect);
                    }
                }
                Work::Notify { pos, state, depth } => self.notify(grid, pos, &state, depth),
            }
            if self.report.truncated {
                self.queue.clear();
            }
        }
    }

    /// Fold the report into the step metrics and return it.
    pub(crate) fn finish(self) -> CascadeReport {
        self.metrics.cascade_updates += u64::from(self.report.applied);
        if self.report.truncated {
            self.metrics.cascades_truncated += 1;
            log::warn!(
                "cascade truncated at tick {} after {} writes (depth {})",
                self.tick.0,
                self.report.applied,
                self.report.max_depth
            );
        }
        self.report
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Check the caps for one more write at `depth`. Marks the cascade
    /// truncated and returns `false` when a cap is hit.
    fn admit(&mut self, depth: u32) -> bool {
        if self.report.truncated {
            return false;
        }
        if depth > self.max_depth || self.report.applied >= self.max_updates {
            self.report.truncated = true;
            return false;
        }
        true
    }

    fn record(&mut self, depth: u32) {
        self.report.applied += 1;
        self.report.max_depth = self.report.max_depth.max(depth);
    }

    fn write_block<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        state: BlockState,
        propagate: bool,
        depth: u32,
    ) {
        let Some(old) = grid.get_state(pos) else {
            return;
        };
        if old == state {
            return;
        }
        if self.seen.contains(&(pos, state.clone())) {
            self.report.suppressed += 1;
            return;
        }
        if !self.admit(depth) {
            return;
        }
        self.seen.insert((pos, state.clone()));
        self.settle(grid, pos, &old, &state, propagate, depth, true);
    }

    /// Apply `old -> new` at `pos`: purge and `on_remove` on a type
    /// change, the write itself (unless already written), `on_place`,
    /// fluid displacement, and the neighbour notification.
    #[allow(clippy::too_many_arguments)]
    fn settle<G: WorldGrid>(
        &mut self,
        grid: &mut G,
        pos: BlockPos,
        old: &BlockState,
        new: &BlockState,
        propagate: bool,
        depth: u32,
        write: bool,
    ) {
        let registry = self.registry;
        let type_changed = old.type_id() != new.type_id();
        if type_changed {
            self.scheduler.purge(pos, TargetKind::Block);
            self.invoke(grid, depth + 1, |ctx| {
                registry.behavior(old.type_id()).on_remove(ctx, pos, old, new);
            });
        }
        if write {
            grid.set_state(pos, new.clone());
            self.record(depth);
        }
        if type_changed {
            self.invoke(grid, depth + 1, |ctx| {
                registry.behavior(new.type_id()).on_place(ctx, pos, new, old);
            });
            let displaces = !new.is_empty() && registry.fluid_container(new.type_id()).is_none();
            if displaces && grid.set_fluid(pos, FluidState::EMPTY) {
                self.scheduler.purge(pos, TargetKind::Fluid);
                self.record(depth);
            }
        }
        if propagate {
            self.queue.push_back(Work::Notify {
                pos,
                state: new.clone(),
                depth,
            });
        }
    }

    fn write_fluid<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos, fluid: FluidState, depth: u32) {
        let Some(block) = grid.get_state(pos) else {
            return;
        };
        let old = grid.get_fluid(pos);
        if old == fluid {
            return;
        }
        // Fluids only share a cell with the empty block or a container.
        if !fluid.is_empty()
            && !block.is_empty()
            && self.registry.fluid_container(block.type_id()).is_none()
        {
            return;
        }
        if !self.admit(depth) {
            return;
        }
        if old.fluid != fluid.fluid {
            self.scheduler.purge(pos, TargetKind::Fluid);
        }
        grid.set_fluid(pos, fluid);
        self.record(depth);
        self.wake_fluid(pos, fluid);
        self.queue.push_back(Work::Notify {
            pos,
            state: block,
            depth,
        });
    }

    /// Schedule a fluid tick at `pos` unless one is already pending.
    fn wake_fluid(&mut self, pos: BlockPos, fluid: FluidState) {
        if fluid.is_empty() || self.scheduler.is_scheduled(pos, TargetKind::Fluid) {
            return;
        }
        if let Some(behavior) = self.registry.fluid_behavior(fluid.fluid) {
            self.scheduler.schedule(
                pos,
                TickTarget::Fluid(fluid.fluid),
                self.tick.after(behavior.tick_delay()),
                TickPriority::Normal,
            );
        }
    }

    // ── Propagation ────────────────────────────────────────────────

    /// Tell the six face neighbours of `pos` that it became `state`.
    fn notify<G: WorldGrid>(&mut self, grid: &mut G, pos: BlockPos, state: &BlockState, depth: u32) {
        let registry = self.registry;
        self.wake_fluid(pos, grid.get_fluid(pos));
        for dir in Direction::ALL {
            if self.report.truncated {
                return;
            }
            let npos = pos.relative(dir);
            let Some(neighbor) = grid.get_state(npos) else {
                continue;
            };
            let updated = {
                let ctx = ShapeContext::new(&*grid, registry);
                let shaped = registry.behavior(neighbor.type_id()).update_shape(
                    &ctx,
                    &neighbor,
                    dir.opposite(),
                    state,
                    npos,
                    pos,
                );
                if registry.behavior(shaped.type_id()).can_survive(&ctx, &shaped, npos) {
                    shaped
                } else {
                    registry.empty_state()
                }
            };
            if updated != neighbor {
                self.write_block(grid, npos, updated, true, depth + 1);
            } else {
                self.invoke(grid, depth + 1, |ctx| {
                    registry
                        .behavior(neighbor.type_id())
                        .neighbor_changed(ctx, npos, &neighbor, pos);
                });
            }
            self.wake_fluid(npos, grid.get_fluid(npos));
        }
    }
}
