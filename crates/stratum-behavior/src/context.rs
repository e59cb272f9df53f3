//! Execution contexts passed to behavior handlers.
//!
//! [`ShapeContext`] is the read-only view handed to the pure shape and
//! survival channels. [`TickContext`] adds the tick clock, a random
//! stream, and an [`EditBuffer`] that records every world edit a handler
//! requests; the engine drains that buffer after the handler returns.

use crate::registry::{BlockAttributes, Registry};
use stratum_core::{
    BlockPos, BlockState, BlockTypeId, Direction, Fluid, FluidState, GridView, SideEffect,
    TickId, TickPriority, TickRng, TickTarget,
};

// ── ShapeContext ───────────────────────────────────────────────────

/// Read-only world access for [`update_shape`](crate::BlockBehavior::update_shape)
/// and [`can_survive`](crate::BlockBehavior::can_survive).
#[derive(Clone, Copy)]
pub struct ShapeContext<'a> {
    view: &'a dyn GridView,
    registry: &'a Registry,
}

impl<'a> ShapeContext<'a> {
    /// Construct a shape context. Typically called by the engine.
    pub fn new(view: &'a dyn GridView, registry: &'a Registry) -> Self {
        Self { view, registry }
    }

    /// The underlying grid view.
    pub fn view(&self) -> &'a dyn GridView {
        self.view
    }

    /// The block registry.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Block state at `pos`, or `None` if unaddressable.
    pub fn state_at(&self, pos: BlockPos) -> Option<BlockState> {
        self.view.get_state(pos)
    }

    /// Fluid at `pos`.
    pub fn fluid_at(&self, pos: BlockPos) -> FluidState {
        self.view.get_fluid(pos)
    }

    /// Static attributes of the block at `pos`. Unaddressable cells read
    /// as the empty block.
    pub fn attributes_at(&self, pos: BlockPos) -> BlockAttributes {
        self.view
            .get_state(pos)
            .map(|s| self.registry.attributes(s.type_id()))
            .unwrap_or(BlockAttributes::AIR)
    }

    /// Whether the block at `pos` is solid.
    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.attributes_at(pos).solid
    }

    /// Whether `pos` is addressable and free for a falling or flowing
    /// occupant: its block is replaceable.
    pub fn is_free(&self, pos: BlockPos) -> bool {
        self.view.is_loaded(pos) && self.attributes_at(pos).replaceable
    }

    /// Signal emitted by the block at `pos` out of its face pointing in
    /// `direction`; `0` if it is not a power source.
    pub fn signal(&self, pos: BlockPos, direction: Direction) -> u8 {
        let Some(state) = self.view.get_state(pos) else {
            return 0;
        };
        self.registry
            .power_source(state.type_id())
            .map_or(0, |p| p.signal(&state, direction).min(MAX_SIGNAL))
    }

    /// Strongest signal any face neighbour emits toward `pos`.
    pub fn best_neighbor_signal(&self, pos: BlockPos) -> u8 {
        Direction::ALL
            .iter()
            .map(|&dir| self.signal(pos.relative(dir), dir.opposite()))
            .max()
            .unwrap_or(0)
    }
}

/// Highest signal strength a power source can emit.
pub const MAX_SIGNAL: u8 = 15;

// ── EditBuffer ─────────────────────────────────────────────────────

/// One world edit requested by a handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    /// Write a block state, with neighbour propagation.
    SetState {
        /// Target cell.
        pos: BlockPos,
        /// New state.
        state: BlockState,
    },
    /// Write a fluid.
    SetFluid {
        /// Target cell.
        pos: BlockPos,
        /// New fluid.
        fluid: FluidState,
    },
    /// Schedule a deferred tick (overwriting any pending one of the same kind).
    Schedule {
        /// Target cell.
        pos: BlockPos,
        /// What the tick is for.
        target: TickTarget,
        /// Ticks from now.
        delay: u64,
        /// Tie-break among equal deadlines.
        priority: TickPriority,
    },
    /// Forward a presentation side effect.
    Effect(SideEffect),
}

/// Ordered list of edits recorded during one handler call.
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    edits: Vec<Edit>,
}

impl EditBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Number of recorded edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Recorded edits in order.
    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Remove and return all edits in recording order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Edit> {
        self.edits.drain(..)
    }
}

// ── TickContext ────────────────────────────────────────────────────

/// Execution context for side-effecting behavior channels.
///
/// Reads see the world as it was when the handler was invoked; edits
/// recorded here become visible only once the engine applies them.
pub struct TickContext<'a> {
    shape: ShapeContext<'a>,
    tick: TickId,
    rng: &'a mut TickRng,
    edits: &'a mut EditBuffer,
}

impl<'a> TickContext<'a> {
    /// Construct a tick context.
    ///
    /// Typically called by the engine, not by behaviors directly.
    pub fn new(
        view: &'a dyn GridView,
        registry: &'a Registry,
        tick: TickId,
        rng: &'a mut TickRng,
        edits: &'a mut EditBuffer,
    ) -> Self {
        Self {
            shape: ShapeContext::new(view, registry),
            tick,
            rng,
            edits,
        }
    }

    /// Read-only view of the world, usable for shape-style queries.
    pub fn shape(&self) -> ShapeContext<'a> {
        self.shape
    }

    /// The block registry.
    pub fn registry(&self) -> &'a Registry {
        self.shape.registry()
    }

    /// Current tick.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Deterministic random stream for this call.
    pub fn rng(&mut self) -> &mut TickRng {
        self.rng
    }

    /// Block state at `pos`, or `None` if unaddressable.
    pub fn state_at(&self, pos: BlockPos) -> Option<BlockState> {
        self.shape.state_at(pos)
    }

    /// Fluid at `pos`.
    pub fn fluid_at(&self, pos: BlockPos) -> FluidState {
        self.shape.fluid_at(pos)
    }

    /// Request a block write at `pos`, propagated to its neighbours.
    pub fn set_state(&mut self, pos: BlockPos, state: BlockState) {
        self.edits.push(Edit::SetState { pos, state });
    }

    /// Request the empty block at `pos`.
    pub fn remove(&mut self, pos: BlockPos) {
        let empty = self.registry().empty_state();
        self.set_state(pos, empty);
    }

    /// Request a fluid write at `pos`.
    pub fn set_fluid(&mut self, pos: BlockPos, fluid: FluidState) {
        self.edits.push(Edit::SetFluid { pos, fluid });
    }

    /// Schedule a block tick for `type_id` at `pos`, `delay` ticks from now.
    pub fn schedule_block(&mut self, pos: BlockPos, type_id: BlockTypeId, delay: u64) {
        self.schedule_block_with_priority(pos, type_id, delay, TickPriority::Normal);
    }

    /// [`schedule_block`](Self::schedule_block) with an explicit priority.
    pub fn schedule_block_with_priority(
        &mut self,
        pos: BlockPos,
        type_id: BlockTypeId,
        delay: u64,
        priority: TickPriority,
    ) {
        self.edits.push(Edit::Schedule {
            pos,
            target: TickTarget::Block(type_id),
            delay,
            priority,
        });
    }

    /// Schedule a fluid tick for `fluid` at `pos`, `delay` ticks from now.
    pub fn schedule_fluid(&mut self, pos: BlockPos, fluid: Fluid, delay: u64) {
        self.edits.push(Edit::Schedule {
            pos,
            target: TickTarget::Fluid(fluid),
            delay,
            priority: TickPriority::Normal,
        });
    }

    /// Emit a presentation side effect.
    pub fn emit(&mut self, effect: SideEffect) {
        self.edits.push(Edit::Effect(effect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BlockDef, Registry};
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapView {
        cells: HashMap<BlockPos, BlockState>,
    }

    impl GridView for MapView {
        fn get_state(&self, pos: BlockPos) -> Option<BlockState> {
            self.cells.get(&pos).cloned()
        }

        fn get_fluid(&self, _pos: BlockPos) -> FluidState {
            FluidState::EMPTY
        }
    }

    fn registry() -> Registry {
        let mut b = Registry::builder();
        b.register(BlockDef::new("stone").attributes(BlockAttributes::SOLID))
            .unwrap();
        b.build()
    }

    #[test]
    fn shape_context_reads_attributes() {
        let reg = registry();
        let stone = reg.id_of("stone").unwrap();
        let mut view = MapView::default();
        view.cells
            .insert(BlockPos::ORIGIN, reg.default_state(stone).unwrap());
        view.cells
            .insert(BlockPos::new(1, 0, 0), reg.empty_state());

        let ctx = ShapeContext::new(&view, &reg);
        assert!(ctx.is_solid(BlockPos::ORIGIN));
        assert!(!ctx.is_solid(BlockPos::new(1, 0, 0)));
        assert!(ctx.is_free(BlockPos::new(1, 0, 0)));
        // Unaddressable reads as air but is never free.
        assert!(!ctx.is_solid(BlockPos::new(9, 9, 9)));
        assert!(!ctx.is_free(BlockPos::new(9, 9, 9)));
    }

    #[test]
    fn tick_context_records_edits_in_order() {
        let reg = registry();
        let stone = reg.id_of("stone").unwrap();
        let view = MapView::default();
        let mut rng = TickRng::seed_from_u64(1);
        let mut edits = EditBuffer::new();
        {
            let mut ctx = TickContext::new(&view, &reg, TickId(4), &mut rng, &mut edits);
            ctx.schedule_block(BlockPos::ORIGIN, stone, 3);
            ctx.remove(BlockPos::ORIGIN);
            ctx.emit(SideEffect::Sound {
                pos: BlockPos::ORIGIN,
                name: "break",
            });
            assert_eq!(ctx.tick(), TickId(4));
        }
        let got: Vec<Edit> = edits.drain().collect();
        assert_eq!(got.len(), 3);
        assert!(matches!(
            got[0],
            Edit::Schedule {
                target: TickTarget::Block(id),
                delay: 3,
                priority: TickPriority::Normal,
                ..
            } if id == stone
        ));
        assert!(matches!(&got[1], Edit::SetState { state, .. } if state.is_empty()));
        assert!(matches!(got[2], Edit::Effect(SideEffect::Sound { .. })));
        assert!(edits.is_empty());
    }
}
