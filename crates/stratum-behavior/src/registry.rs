//! The immutable block-type registry and its builder.
//!
//! Types are declared with [`BlockDef`], validated and numbered by
//! [`RegistryBuilder::register`], and frozen into a [`Registry`] that is
//! shared read-only (typically as `Arc<Registry>`) for the rest of the
//! run. Type id 0 is always the empty block `"air"`.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::behavior::{BlockBehavior, FluidBehavior, Inert};
use crate::capability::{
    Capabilities, CapabilityKind, ChangeOverTime, Fallable, FluidContainer, FluidSource, Growable,
    PowerSource,
};
use stratum_core::{BlockState, BlockTypeId, Fluid, Property, SchemaError, StateSchema};

/// Name of the automatically registered empty block.
pub const EMPTY_BLOCK_NAME: &str = "air";

static INERT: Inert = Inert;

// ── BlockAttributes ────────────────────────────────────────────────

/// Static physical attributes of a block type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockAttributes {
    /// Supports attached blocks and stops falling ones.
    pub solid: bool,
    /// Blocks light and sight.
    pub opaque: bool,
    /// Can be overwritten by placement, falling blocks, and fluids.
    pub replaceable: bool,
}

impl BlockAttributes {
    /// The empty block.
    pub const AIR: BlockAttributes = BlockAttributes {
        solid: false,
        opaque: false,
        replaceable: true,
    };

    /// A full, solid cube.
    pub const SOLID: BlockAttributes = BlockAttributes {
        solid: true,
        opaque: true,
        replaceable: false,
    };

    /// A small non-solid decoration (torches, crops, levers).
    pub const DECORATION: BlockAttributes = BlockAttributes {
        solid: false,
        opaque: false,
        replaceable: false,
    };
}

impl Default for BlockAttributes {
    fn default() -> Self {
        Self::SOLID
    }
}

// ── BlockDef / BlockType ───────────────────────────────────────────

/// Declaration of a block type, consumed by [`RegistryBuilder::register`].
pub struct BlockDef {
    name: String,
    properties: Vec<Property>,
    behavior: Box<dyn BlockBehavior>,
    capabilities: Capabilities,
    attributes: BlockAttributes,
}

impl BlockDef {
    /// A solid block with no properties, behavior, or capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            behavior: Box::new(Inert),
            capabilities: Capabilities::new(),
            attributes: BlockAttributes::default(),
        }
    }

    /// Append a property to the schema.
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Set the behavior handler.
    pub fn behavior(mut self, behavior: impl BlockBehavior) -> Self {
        self.behavior = Box::new(behavior);
        self
    }

    /// Set the capability set.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the static attributes.
    pub fn attributes(mut self, attributes: BlockAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A registered, immutable block type.
pub struct BlockType {
    id: BlockTypeId,
    name: String,
    schema: Arc<StateSchema>,
    behavior: Box<dyn BlockBehavior>,
    capabilities: Capabilities,
    attributes: BlockAttributes,
}

impl BlockType {
    /// Registry-assigned id.
    pub fn id(&self) -> BlockTypeId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// State schema.
    pub fn schema(&self) -> &Arc<StateSchema> {
        &self.schema
    }

    /// The state with every property at its default.
    pub fn default_state(&self) -> BlockState {
        BlockState::create(self.id, Arc::clone(&self.schema))
    }

    /// Behavior handler.
    pub fn behavior(&self) -> &dyn BlockBehavior {
        self.behavior.as_ref()
    }

    /// Capability set.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Static attributes.
    pub fn attributes(&self) -> BlockAttributes {
        self.attributes
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("states", &self.schema.state_count())
            .field("capabilities", &self.capabilities)
            .field("attributes", &self.attributes)
            .finish()
    }
}

// ── RegistryError ──────────────────────────────────────────────────

/// Errors detected while registering block types or fluid behaviors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type with this name is already registered.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// The type's property declarations are invalid.
    Schema {
        /// The type being registered.
        name: String,
        /// What was wrong with its schema.
        error: SchemaError,
    },
    /// A change-over-time type names an age property its schema lacks.
    MissingAgeProperty {
        /// The type being registered.
        name: String,
        /// The undeclared age property.
        property: String,
    },
    /// More types than a [`BlockTypeId`] can number.
    TooManyTypes,
    /// A fluid behavior was registered for [`Fluid::Empty`].
    EmptyFluidBehavior,
    /// A fluid behavior is already registered for this fluid.
    DuplicateFluidBehavior {
        /// The fluid.
        fluid: Fluid,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "block type '{name}' registered twice"),
            Self::Schema { name, error } => write!(f, "block type '{name}': {error}"),
            Self::MissingAgeProperty { name, property } => write!(
                f,
                "block type '{name}' ages by property '{property}', which its schema does not declare"
            ),
            Self::TooManyTypes => write!(f, "block type ids exhausted"),
            Self::EmptyFluidBehavior => write!(f, "cannot register a behavior for the empty fluid"),
            Self::DuplicateFluidBehavior { fluid } => {
                write!(f, "fluid '{fluid}' already has a behavior")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ── RegistryBuilder ────────────────────────────────────────────────

/// Collects block types and fluid behaviors, then freezes them.
pub struct RegistryBuilder {
    types: Vec<BlockType>,
    by_name: IndexMap<String, BlockTypeId>,
    fluids: IndexMap<Fluid, Box<dyn FluidBehavior>>,
}

impl RegistryBuilder {
    /// A builder holding only the empty block.
    pub fn new() -> Self {
        let air = BlockType {
            id: BlockTypeId::EMPTY,
            name: EMPTY_BLOCK_NAME.to_string(),
            schema: Arc::new(StateSchema::empty()),
            behavior: Box::new(Inert),
            capabilities: Capabilities::new(),
            attributes: BlockAttributes::AIR,
        };
        let mut by_name = IndexMap::new();
        by_name.insert(air.name.clone(), air.id);
        Self {
            types: vec![air],
            by_name,
            fluids: IndexMap::new(),
        }
    }

    /// Validate and register a block type, returning its id.
    ///
    /// Ids are assigned sequentially in registration order.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockTypeId, RegistryError> {
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName { name: def.name });
        }
        let schema = StateSchema::new(def.properties).map_err(|error| RegistryError::Schema {
            name: def.name.clone(),
            error,
        })?;
        if let Some(cot) = def.capabilities.as_change_over_time() {
            let property = cot.age_property();
            if schema.property(property).is_none() {
                return Err(RegistryError::MissingAgeProperty {
                    name: def.name,
                    property: property.to_string(),
                });
            }
        }
        let id = BlockTypeId(u32::try_from(self.types.len()).map_err(|_| RegistryError::TooManyTypes)?);
        self.by_name.insert(def.name.clone(), id);
        self.types.push(BlockType {
            id,
            name: def.name,
            schema: Arc::new(schema),
            behavior: def.behavior,
            capabilities: def.capabilities,
            attributes: def.attributes,
        });
        Ok(id)
    }

    /// Register the behavior that handles scheduled ticks of `fluid`.
    pub fn register_fluid(
        &mut self,
        fluid: Fluid,
        behavior: impl FluidBehavior,
    ) -> Result<(), RegistryError> {
        if fluid == Fluid::Empty {
            return Err(RegistryError::EmptyFluidBehavior);
        }
        if self.fluids.contains_key(&fluid) {
            return Err(RegistryError::DuplicateFluidBehavior { fluid });
        }
        self.fluids.insert(fluid, Box::new(behavior));
        Ok(())
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        Registry {
            types: self.types,
            by_name: self.by_name,
            fluids: self.fluids,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Immutable table of block types and fluid behaviors.
///
/// Lookups by id are O(1). Unknown ids behave like the empty block:
/// no behavior, no capabilities, [`BlockAttributes::AIR`].
///
/// # Examples
///
/// ```
/// use stratum_behavior::{BlockDef, Registry};
/// use stratum_core::{BlockTypeId, Property};
///
/// let mut builder = Registry::builder();
/// let crop = builder
///     .register(BlockDef::new("crop").property(Property::int("age", 0, 7, 0)))
///     .unwrap();
/// let registry = builder.build();
///
/// assert_eq!(registry.id_of("air"), Some(BlockTypeId::EMPTY));
/// assert_eq!(registry.default_state(crop).unwrap().get_int("age"), 0);
/// ```
pub struct Registry {
    types: Vec<BlockType>,
    by_name: IndexMap<String, BlockTypeId>,
    fluids: IndexMap<Fluid, Box<dyn FluidBehavior>>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Number of registered types, the empty block included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`; the empty block is always registered.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter()
    }

    /// Look up a type by id.
    pub fn get(&self, id: BlockTypeId) -> Option<&BlockType> {
        self.types.get(id.0 as usize)
    }

    /// Look up a type by name.
    pub fn by_name(&self, name: &str) -> Option<&BlockType> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Id of the type named `name`.
    pub fn id_of(&self, name: &str) -> Option<BlockTypeId> {
        self.by_name.get(name).copied()
    }

    /// Default state of a type.
    pub fn default_state(&self, id: BlockTypeId) -> Option<BlockState> {
        self.get(id).map(BlockType::default_state)
    }

    /// The (only) state of the empty block.
    pub fn empty_state(&self) -> BlockState {
        self.types[0].default_state()
    }

    /// Behavior handler of a type; a no-op handler for unknown ids.
    pub fn behavior(&self, id: BlockTypeId) -> &dyn BlockBehavior {
        match self.get(id) {
            Some(t) => t.behavior(),
            None => &INERT,
        }
    }

    /// Static attributes of a type; [`BlockAttributes::AIR`] for unknown ids.
    pub fn attributes(&self, id: BlockTypeId) -> BlockAttributes {
        self.get(id).map_or(BlockAttributes::AIR, BlockType::attributes)
    }

    /// Whether a type implements `kind`.
    pub fn implements(&self, id: BlockTypeId, kind: CapabilityKind) -> bool {
        self.get(id)
            .is_some_and(|t| t.capabilities.implements(kind))
    }

    /// [`Growable`] handler of a type.
    pub fn growable(&self, id: BlockTypeId) -> Option<&dyn Growable> {
        self.get(id)?.capabilities.as_growable()
    }

    /// [`FluidContainer`] handler of a type.
    pub fn fluid_container(&self, id: BlockTypeId) -> Option<&dyn FluidContainer> {
        self.get(id)?.capabilities.as_fluid_container()
    }

    /// [`FluidSource`] handler of a type.
    pub fn fluid_source(&self, id: BlockTypeId) -> Option<&dyn FluidSource> {
        self.get(id)?.capabilities.as_fluid_source()
    }

    /// [`PowerSource`] handler of a type.
    pub fn power_source(&self, id: BlockTypeId) -> Option<&dyn PowerSource> {
        self.get(id)?.capabilities.as_power_source()
    }

    /// [`ChangeOverTime`] handler of a type.
    pub fn change_over_time(&self, id: BlockTypeId) -> Option<&dyn ChangeOverTime> {
        self.get(id)?.capabilities.as_change_over_time()
    }

    /// [`Fallable`] handler of a type.
    pub fn fallable(&self, id: BlockTypeId) -> Option<&dyn Fallable> {
        self.get(id)?.capabilities.as_fallable()
    }

    /// Behavior registered for `fluid`.
    pub fn fluid_behavior(&self, fluid: Fluid) -> Option<&dyn FluidBehavior> {
        self.fluids.get(&fluid).map(|b| b.as_ref())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types)
            .field("fluids", &self.fluids.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TickContext;
    use stratum_core::{BlockPos, Direction, FluidState};

    struct Aging;
    impl ChangeOverTime for Aging {
        fn age_property(&self) -> &str {
            "stage"
        }
        fn next_state(&self, _state: &BlockState) -> Option<BlockState> {
            None
        }
    }

    struct Lit;
    impl PowerSource for Lit {
        fn signal(&self, _state: &BlockState, _direction: Direction) -> u8 {
            15
        }
    }

    struct Still;
    impl FluidBehavior for Still {
        fn tick(&self, _ctx: &mut TickContext<'_>, _pos: BlockPos, _fluid: FluidState) {}
        fn tick_delay(&self) -> u64 {
            5
        }
    }

    #[test]
    fn air_is_type_zero() {
        let reg = Registry::builder().build();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.id_of(EMPTY_BLOCK_NAME), Some(BlockTypeId::EMPTY));
        assert!(reg.empty_state().is_empty());
        assert_eq!(reg.attributes(BlockTypeId::EMPTY), BlockAttributes::AIR);
    }

    #[test]
    fn ids_are_sequential() {
        let mut b = Registry::builder();
        let a = b.register(BlockDef::new("a")).unwrap();
        let c = b.register(BlockDef::new("c")).unwrap();
        assert_eq!((a, c), (BlockTypeId(1), BlockTypeId(2)));
        let reg = b.build();
        assert_eq!(reg.by_name("c").unwrap().id(), c);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut b = Registry::builder();
        b.register(BlockDef::new("stone")).unwrap();
        assert_eq!(
            b.register(BlockDef::new("stone")).unwrap_err(),
            RegistryError::DuplicateName {
                name: "stone".into()
            }
        );
        assert!(matches!(
            b.register(BlockDef::new("air")),
            Err(RegistryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn schema_error_is_wrapped() {
        let mut b = Registry::builder();
        let err = b
            .register(BlockDef::new("bad").property(Property::int("age", 0, 3, 9)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Schema { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn age_property_must_be_declared() {
        let mut b = Registry::builder();
        let err = b
            .register(BlockDef::new("rock").capabilities(Capabilities::new().change_over_time(Aging)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingAgeProperty { .. }));
        b.register(
            BlockDef::new("rock")
                .property(Property::int("stage", 0, 3, 0))
                .capabilities(Capabilities::new().change_over_time(Aging)),
        )
        .unwrap();
    }

    #[test]
    fn capability_lookup_is_typed() {
        let mut b = Registry::builder();
        let lamp = b
            .register(BlockDef::new("beacon").capabilities(Capabilities::new().power_source(Lit)))
            .unwrap();
        let reg = b.build();
        assert!(reg.implements(lamp, CapabilityKind::PowerSource));
        assert!(!reg.implements(lamp, CapabilityKind::Growable));
        assert!(reg.growable(lamp).is_none());
        let state = reg.default_state(lamp).unwrap();
        assert_eq!(reg.power_source(lamp).unwrap().signal(&state, Direction::Up), 15);
        // Unknown ids are inert.
        assert!(!reg.implements(BlockTypeId(99), CapabilityKind::PowerSource));
        assert_eq!(reg.attributes(BlockTypeId(99)), BlockAttributes::AIR);
    }

    #[test]
    fn fluid_behavior_registration() {
        let mut b = Registry::builder();
        assert_eq!(
            b.register_fluid(Fluid::Empty, Still).unwrap_err(),
            RegistryError::EmptyFluidBehavior
        );
        b.register_fluid(Fluid::Water, Still).unwrap();
        assert_eq!(
            b.register_fluid(Fluid::Water, Still).unwrap_err(),
            RegistryError::DuplicateFluidBehavior {
                fluid: Fluid::Water
            }
        );
        let reg = b.build();
        assert_eq!(reg.fluid_behavior(Fluid::Water).unwrap().tick_delay(), 5);
        assert!(reg.fluid_behavior(Fluid::Lava).is_none());
    }
}
