//! Optional capabilities a block type may implement.
//!
//! A type's capabilities are fixed when it is registered. Callers look a
//! capability up through the registry (`Registry::growable(id)`, ...)
//! and treat absence as a no-op.

use std::fmt;

use crate::context::{ShapeContext, TickContext};
use stratum_core::{BlockPos, BlockState, Direction, Fluid, FluidState, TickRng};

/// Blocks that can be grown by an external agent (fertilizer and the like).
pub trait Growable: Send + Sync + 'static {
    /// Whether growth can be applied to `state` at `pos` at all.
    fn is_valid_target(&self, ctx: &ShapeContext<'_>, pos: BlockPos, state: &BlockState) -> bool;

    /// Roll whether this growth attempt succeeds. Default: always.
    fn try_succeed(&self, rng: &mut TickRng, pos: BlockPos, state: &BlockState) -> bool {
        let _ = (rng, pos, state);
        true
    }

    /// Perform the growth.
    fn apply(&self, ctx: &mut TickContext<'_>, pos: BlockPos, state: &BlockState);
}

/// Blocks that can hold a fluid alongside their own state.
pub trait FluidContainer: Send + Sync + 'static {
    /// Whether `fluid` may be placed into `state`.
    fn can_place_fluid(&self, state: &BlockState, fluid: Fluid) -> bool;

    /// The state to store once `fluid` has been placed, or `None` if the
    /// placement is refused.
    fn place_fluid(&self, state: &BlockState, fluid: FluidState) -> Option<BlockState>;
}

/// Blocks from which a held fluid can be picked up.
pub trait FluidSource: Send + Sync + 'static {
    /// The drained state and the fluid taken, or `None` if there is
    /// nothing to pick up.
    fn pickup(&self, state: &BlockState) -> Option<(BlockState, Fluid)>;
}

/// Blocks that emit a signal strength to their neighbours.
pub trait PowerSource: Send + Sync + 'static {
    /// Signal strength `0..=15` emitted out of the face pointing in
    /// `direction`.
    fn signal(&self, state: &BlockState, direction: Direction) -> u8;
}

/// Blocks that age through discrete stages under spatial diffusion.
pub trait ChangeOverTime: Send + Sync + 'static {
    /// The property holding the age stage. Types whose age properties
    /// share a domain influence each other.
    fn age_property(&self) -> &str;

    /// The next stage after `state`, or `None` at the final stage.
    fn next_state(&self, state: &BlockState) -> Option<BlockState>;

    /// Multiplier applied to the advancement probability. Default: 1.
    fn chance_modifier(&self, state: &BlockState) -> f64 {
        let _ = state;
        1.0
    }
}

/// Blocks that fall when unsupported.
pub trait Fallable: Send + Sync + 'static {
    /// Ticks between losing support and falling. Default: 2.
    fn fall_delay(&self) -> u64 {
        2
    }

    /// The block came to rest at `pos`, replacing `replaced`.
    fn on_land(
        &self,
        ctx: &mut TickContext<'_>,
        pos: BlockPos,
        state: &BlockState,
        replaced: &BlockState,
    ) {
        let _ = (ctx, pos, state, replaced);
    }
}

// ── Capabilities ───────────────────────────────────────────────────

/// Tag naming one capability, for membership queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// [`Growable`].
    Growable,
    /// [`FluidContainer`].
    FluidContainer,
    /// [`FluidSource`].
    FluidSource,
    /// [`PowerSource`].
    PowerSource,
    /// [`ChangeOverTime`].
    ChangeOverTime,
    /// [`Fallable`].
    Fallable,
}

impl CapabilityKind {
    /// Every capability, in declaration order.
    pub const ALL: [CapabilityKind; 6] = [
        Self::Growable,
        Self::FluidContainer,
        Self::FluidSource,
        Self::PowerSource,
        Self::ChangeOverTime,
        Self::Fallable,
    ];
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Growable => "growable",
            Self::FluidContainer => "fluid_container",
            Self::FluidSource => "fluid_source",
            Self::PowerSource => "power_source",
            Self::ChangeOverTime => "change_over_time",
            Self::Fallable => "fallable",
        };
        f.write_str(name)
    }
}

/// The flat capability set of one block type.
///
/// # Examples
///
/// ```
/// use stratum_behavior::{Capabilities, CapabilityKind, PowerSource};
/// use stratum_core::{BlockState, Direction};
///
/// struct AlwaysOn;
/// impl PowerSource for AlwaysOn {
///     fn signal(&self, _: &BlockState, _: Direction) -> u8 { 15 }
/// }
///
/// let caps = Capabilities::new().power_source(AlwaysOn);
/// assert!(caps.implements(CapabilityKind::PowerSource));
/// assert!(!caps.implements(CapabilityKind::Fallable));
/// ```
#[derive(Default)]
pub struct Capabilities {
    growable: Option<Box<dyn Growable>>,
    fluid_container: Option<Box<dyn FluidContainer>>,
    fluid_source: Option<Box<dyn FluidSource>>,
    power_source: Option<Box<dyn PowerSource>>,
    change_over_time: Option<Box<dyn ChangeOverTime>>,
    fallable: Option<Box<dyn Fallable>>,
}

impl Capabilities {
    /// An empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add [`Growable`].
    pub fn growable(mut self, cap: impl Growable) -> Self {
        self.growable = Some(Box::new(cap));
        self
    }

    /// Add [`FluidContainer`].
    pub fn fluid_container(mut self, cap: impl FluidContainer) -> Self {
        self.fluid_container = Some(Box::new(cap));
        self
    }

    /// Add [`FluidSource`].
    pub fn fluid_source(mut self, cap: impl FluidSource) -> Self {
        self.fluid_source = Some(Box::new(cap));
        self
    }

    /// Add [`PowerSource`].
    pub fn power_source(mut self, cap: impl PowerSource) -> Self {
        self.power_source = Some(Box::new(cap));
        self
    }

    /// Add [`ChangeOverTime`].
    pub fn change_over_time(mut self, cap: impl ChangeOverTime) -> Self {
        self.change_over_time = Some(Box::new(cap));
        self
    }

    /// Add [`Fallable`].
    pub fn fallable(mut self, cap: impl Fallable) -> Self {
        self.fallable = Some(Box::new(cap));
        self
    }

    /// The [`Growable`] handler, if any.
    pub fn as_growable(&self) -> Option<&dyn Growable> {
        self.growable.as_deref()
    }

    /// The [`FluidContainer`] handler, if any.
    pub fn as_fluid_container(&self) -> Option<&dyn FluidContainer> {
        self.fluid_container.as_deref()
    }

    /// The [`FluidSource`] handler, if any.
    pub fn as_fluid_source(&self) -> Option<&dyn FluidSource> {
        self.fluid_source.as_deref()
    }

    /// The [`PowerSource`] handler, if any.
    pub fn as_power_source(&self) -> Option<&dyn PowerSource> {
        self.power_source.as_deref()
    }

    /// The [`ChangeOverTime`] handler, if any.
    pub fn as_change_over_time(&self) -> Option<&dyn ChangeOverTime> {
        self.change_over_time.as_deref()
    }

    /// The [`Fallable`] handler, if any.
    pub fn as_fallable(&self) -> Option<&dyn Fallable> {
        self.fallable.as_deref()
    }

    /// Whether the set contains `kind`.
    pub fn implements(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Growable => self.growable.is_some(),
            CapabilityKind::FluidContainer => self.fluid_container.is_some(),
            CapabilityKind::FluidSource => self.fluid_source.is_some(),
            CapabilityKind::PowerSource => self.power_source.is_some(),
            CapabilityKind::ChangeOverTime => self.change_over_time.is_some(),
            CapabilityKind::Fallable => self.fallable.is_some(),
        }
    }

    /// Every capability present, in [`CapabilityKind::ALL`] order.
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(|&k| self.implements(k))
            .collect()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
