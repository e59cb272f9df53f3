//! Pending scheduled ticks, ordered by deadline.
//!
//! One queue per [`TargetKind`]. Each queue holds at most one entry per
//! position: scheduling an occupied `(position, kind)` key overwrites the
//! old entry, deadline and all. Entries fire in ascending
//! `(deadline, priority, insertion sequence)` order.

use std::collections::{BTreeMap, HashMap};

use stratum_core::{BlockPos, TargetKind, TickId, TickPriority, TickTarget};

/// Total firing order among entries of one queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    deadline: TickId,
    priority: TickPriority,
    seq: u64,
}

/// A pending deferred update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    /// Cell the tick is for.
    pub pos: BlockPos,
    /// What the tick was scheduled for; checked again on firing.
    pub target: TickTarget,
    /// Absolute tick at which the entry becomes due.
    pub deadline: TickId,
    /// Tie-break among equal deadlines.
    pub priority: TickPriority,
    /// Insertion sequence; breaks remaining ties.
    pub seq: u64,
}

impl ScheduledTick {
    fn key(&self) -> OrderKey {
        OrderKey {
            deadline: self.deadline,
            priority: self.priority,
            seq: self.seq,
        }
    }
}

// ── TickQueue ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct TickQueue {
    by_pos: HashMap<BlockPos, ScheduledTick>,
    order: BTreeMap<OrderKey, BlockPos>,
}

impl TickQueue {
    fn insert(&mut self, entry: ScheduledTick) -> Option<ScheduledTick> {
        let old = self.remove(entry.pos);
        self.order.insert(entry.key(), entry.pos);
        self.by_pos.insert(entry.pos, entry);
        old
    }

    fn remove(&mut self, pos: BlockPos) -> Option<ScheduledTick> {
        let old = self.by_pos.remove(&pos)?;
        self.order.remove(&old.key());
        Some(old)
    }

    /// First due entry inserted before sequence `before`.
    fn pop_due(&mut self, now: TickId, before: u64) -> Option<ScheduledTick> {
        let key = *self
            .order
            .keys()
            .take_while(|k| k.deadline <= now)
            .find(|k| k.seq < before)?;
        let pos = self.order.remove(&key)?;
        self.by_pos.remove(&pos)
    }

    fn due_len(&self, now: TickId, before: u64) -> usize {
        self.order
            .keys()
            .take_while(|k| k.deadline <= now)
            .filter(|k| k.seq < before)
            .count()
    }

    fn len(&self) -> usize {
        self.by_pos.len()
    }
}

// ── TickScheduler ──────────────────────────────────────────────────

/// Block and fluid tick queues with a shared insertion counter.
///
/// # Examples
///
/// ```
/// use stratum_core::{BlockPos, BlockTypeId, TargetKind, TickId, TickPriority, TickTarget};
/// use stratum_engine::TickScheduler;
///
/// let mut s = TickScheduler::new();
/// let pos = BlockPos::new(0, 0, 0);
/// let target = TickTarget::Block(BlockTypeId(1));
/// s.schedule(pos, target, TickId(5), TickPriority::Normal);
/// s.schedule(pos, target, TickId(2), TickPriority::Normal); // overwrites
///
/// assert!(s.drain_due(TargetKind::Block, TickId(1), usize::MAX).is_empty());
/// let fired = s.drain_due(TargetKind::Block, TickId(2), usize::MAX);
/// assert_eq!(fired.len(), 1);
/// assert!(s.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TickScheduler {
    block: TickQueue,
    fluid: TickQueue,
    next_seq: u64,
}

impl TickScheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, kind: TargetKind) -> &TickQueue {
        match kind {
            TargetKind::Block => &self.block,
            TargetKind::Fluid => &self.fluid,
        }
    }

    fn queue_mut(&mut self, kind: TargetKind) -> &mut TickQueue {
        match kind {
            TargetKind::Block => &mut self.block,
            TargetKind::Fluid => &mut self.fluid,
        }
    }

    /// Schedule `target` at `pos` to fire at `deadline`.
    ///
    /// Returns the entry it replaced, if the `(pos, kind)` key was
    /// already pending.
    pub fn schedule(
        &mut self,
        pos: BlockPos,
        target: TickTarget,
        deadline: TickId,
        priority: TickPriority,
    ) -> Option<ScheduledTick> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue_mut(target.kind()).insert(ScheduledTick {
            pos,
            target,
            deadline,
            priority,
            seq,
        })
    }

    /// Drop the pending entry of `kind` at `pos`, if any.
    pub fn purge(&mut self, pos: BlockPos, kind: TargetKind) -> Option<ScheduledTick> {
        self.queue_mut(kind).remove(pos)
    }

    /// Drop every pending entry at `pos`. Returns how many were dropped.
    pub fn purge_all(&mut self, pos: BlockPos) -> usize {
        usize::from(self.block.remove(pos).is_some()) + usize::from(self.fluid.remove(pos).is_some())
    }

    /// The pending entry of `kind` at `pos`.
    pub fn get(&self, pos: BlockPos, kind: TargetKind) -> Option<&ScheduledTick> {
        self.queue(kind).by_pos.get(&pos)
    }

    /// Whether an entry of `kind` is pending at `pos`.
    pub fn is_scheduled(&self, pos: BlockPos, kind: TargetKind) -> bool {
        self.get(pos, kind).is_some()
    }

    /// The insertion sequence the next scheduled entry will receive.
    ///
    /// Entries pending now all compare below it; pass it to
    /// [`pop_due`](Self::pop_due) to leave later insertions for a later
    /// step.
    pub fn mark(&self) -> u64 {
        self.next_seq
    }

    /// Remove and return the next entry of `kind`, in firing order, whose
    /// deadline is at or before `now` and which was inserted before
    /// `mark`.
    ///
    /// Entries stay queued until popped, so a purge issued between pops
    /// removes them.
    pub fn pop_due(&mut self, kind: TargetKind, now: TickId, mark: u64) -> Option<ScheduledTick> {
        self.queue_mut(kind).pop_due(now, mark)
    }

    /// Remove and return, in firing order, up to `limit` entries of
    /// `kind` whose deadline is at or before `now`.
    pub fn drain_due(&mut self, kind: TargetKind, now: TickId, limit: usize) -> Vec<ScheduledTick> {
        let mark = self.mark();
        let mut out = Vec::new();
        while out.len() < limit {
            match self.pop_due(kind, now, mark) {
                Some(entry) => out.push(entry),
                None => break,
            }
        }
        out
    }

    /// Number of entries, of both kinds, due at or before `now` and
    /// inserted before `mark`.
    pub fn due_len(&self, now: TickId, mark: u64) -> usize {
        self.block.due_len(now, mark) + self.fluid.due_len(now, mark)
    }

    /// Number of pending entries of both kinds.
    pub fn len(&self) -> usize {
        self.block.len() + self.fluid.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stratum_core::{BlockTypeId, Fluid};

    const STONE: TickTarget = TickTarget::Block(BlockTypeId(1));
    const WATER: TickTarget = TickTarget::Fluid(Fluid::Water);

    fn p(x: i32) -> BlockPos {
        BlockPos::new(x, 0, 0)
    }

    #[test]
    fn reschedule_overwrites_deadline() {
        let mut s = TickScheduler::new();
        assert!(s.schedule(p(0), STONE, TickId(5), TickPriority::Normal).is_none());
        let old = s.schedule(p(0), STONE, TickId(2), TickPriority::Normal).unwrap();
        assert_eq!(old.deadline, TickId(5));
        assert_eq!(s.len(), 1);
        assert_eq!(s.drain_due(TargetKind::Block, TickId(2), usize::MAX).len(), 1);
        assert!(s.drain_due(TargetKind::Block, TickId(5), usize::MAX).is_empty());
    }

    #[test]
    fn block_and_fluid_keys_are_independent() {
        let mut s = TickScheduler::new();
        s.schedule(p(0), STONE, TickId(1), TickPriority::Normal);
        s.schedule(p(0), WATER, TickId(1), TickPriority::Normal);
        assert_eq!(s.len(), 2);
        assert!(s.purge(p(0), TargetKind::Block).is_some());
        assert!(!s.is_scheduled(p(0), TargetKind::Block));
        assert!(s.is_scheduled(p(0), TargetKind::Fluid));
        assert_eq!(s.purge_all(p(0)), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn order_is_deadline_then_priority_then_insertion() {
        let mut s = TickScheduler::new();
        s.schedule(p(0), STONE, TickId(3), TickPriority::Normal);
        s.schedule(p(1), STONE, TickId(2), TickPriority::Low);
        s.schedule(p(2), STONE, TickId(2), TickPriority::Normal);
        s.schedule(p(3), STONE, TickId(2), TickPriority::High);
        s.schedule(p(4), STONE, TickId(2), TickPriority::Normal);
        let order: Vec<i32> = s
            .drain_due(TargetKind::Block, TickId(3), usize::MAX)
            .iter()
            .map(|e| e.pos.x)
            .collect();
        assert_eq!(order, vec![3, 2, 4, 1, 0]);
    }

    #[test]
    fn drain_respects_limit_and_deadline() {
        let mut s = TickScheduler::new();
        for x in 0..5 {
            s.schedule(p(x), STONE, TickId(1), TickPriority::Normal);
        }
        s.schedule(p(9), STONE, TickId(4), TickPriority::Normal);
        assert_eq!(s.due_len(TickId(1), s.mark()), 5);
        assert_eq!(s.drain_due(TargetKind::Block, TickId(1), 3).len(), 3);
        assert_eq!(s.due_len(TickId(1), s.mark()), 2);
        assert_eq!(s.drain_due(TargetKind::Block, TickId(1), 10).len(), 2);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn pop_skips_entries_inserted_after_the_mark() {
        let mut s = TickScheduler::new();
        s.schedule(p(0), STONE, TickId(1), TickPriority::Normal);
        s.schedule(p(1), STONE, TickId(1), TickPriority::Normal);
        let mark = s.mark();
        // Due now and first in order, but inserted after the mark.
        s.schedule(p(2), STONE, TickId(1), TickPriority::ExtremelyHigh);

        assert_eq!(s.pop_due(TargetKind::Block, TickId(1), mark).unwrap().pos, p(0));
        assert!(s.purge(p(1), TargetKind::Block).is_some());
        assert!(s.pop_due(TargetKind::Block, TickId(1), mark).is_none());
        assert_eq!(s.due_len(TickId(1), mark), 0);
        assert_eq!(s.due_len(TickId(1), s.mark()), 1);
        assert_eq!(s.pop_due(TargetKind::Block, TickId(1), s.mark()).unwrap().pos, p(2));
    }

    proptest! {
        #[test]
        fn drained_entries_are_sorted_and_unique(
            ops in prop::collection::vec((0i32..8, 0u64..10, 0usize..7), 1..64),
        ) {
            let priorities = [
                TickPriority::ExtremelyHigh,
                TickPriority::VeryHigh,
                TickPriority::High,
                TickPriority::Normal,
                TickPriority::Low,
                TickPriority::VeryLow,
                TickPriority::ExtremelyLow,
            ];
            let mut s = TickScheduler::new();
            let mut last = HashMap::new();
            for (x, deadline, pri) in ops {
                s.schedule(p(x), STONE, TickId(deadline), priorities[pri]);
                last.insert(x, (deadline, priorities[pri]));
            }
            prop_assert_eq!(s.len(), last.len());
            let drained = s.drain_due(TargetKind::Block, TickId(u64::MAX), usize::MAX);
            prop_assert_eq!(drained.len(), last.len());
            for w in drained.windows(2) {
                prop_assert!(w[0].key() < w[1].key());
            }
            for e in &drained {
                let (deadline, pri) = last[&e.pos.x];
                prop_assert_eq!(e.deadline, TickId(deadline));
                prop_assert_eq!(e.priority, pri);
            }
            prop_assert!(s.is_empty());
        }
    }
}
