//! Immutable, schema-validated block states.
//!
//! A [`StateSchema`] is the ordered property list of one block type. A
//! [`BlockState`] pairs a type with one ordinal per schema property.
//! States are plain values: equality and hashing look only at the type
//! and the ordinals, and every state of a type has a dense
//! [`state_index`](BlockState::state_index) so the whole state space can
//! be enumerated or palette-encoded.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::{SchemaError, StateError};
use crate::id::BlockTypeId;
use crate::property::{Property, PropertyDomain, PropertyValue};

type Ordinals = SmallVec<[u16; 4]>;

// ── StateSchema ────────────────────────────────────────────────────

/// Ordered property declarations of a block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSchema {
    properties: IndexMap<String, Property>,
    defaults: Ordinals,
    /// Mixed-radix strides; `strides[i]` is the product of domain sizes after `i`.
    strides: SmallVec<[u32; 4]>,
    state_count: u32,
}

impl StateSchema {
    /// A schema with no properties (exactly one state).
    pub fn empty() -> Self {
        Self {
            properties: IndexMap::new(),
            defaults: SmallVec::new(),
            strides: SmallVec::new(),
            state_count: 1,
        }
    }

    /// Validate and build a schema from property declarations.
    ///
    /// # Errors
    ///
    /// Rejects duplicate property names, empty or oversized domains,
    /// out-of-domain defaults, and schemas with more than `u32::MAX` states.
    pub fn new(properties: Vec<Property>) -> Result<Self, SchemaError> {
        let mut map = IndexMap::with_capacity(properties.len());
        let mut defaults = Ordinals::with_capacity(properties.len());
        let mut sizes: SmallVec<[u32; 4]> = SmallVec::with_capacity(properties.len());

        for prop in properties {
            let len = prop.domain().len();
            if len == 0 {
                return Err(SchemaError::EmptyDomain {
                    property: prop.name().to_string(),
                });
            }
            if len > usize::from(u16::MAX) {
                return Err(SchemaError::DomainTooLarge {
                    property: prop.name().to_string(),
                    size: len,
                });
            }
            if let PropertyDomain::Enum(variants) = prop.domain() {
                for (i, v) in variants.iter().enumerate() {
                    if variants[..i].contains(v) {
                        return Err(SchemaError::DuplicateVariant {
                            property: prop.name().to_string(),
                            variant: v.clone(),
                        });
                    }
                }
            }
            let Some(default) = prop.domain().ordinal_of(prop.default_value()) else {
                return Err(SchemaError::DefaultOutOfDomain {
                    property: prop.name().to_string(),
                    value: prop.default_value().to_string(),
                });
            };
            if map.contains_key(prop.name()) {
                return Err(SchemaError::DuplicateProperty {
                    property: prop.name().to_string(),
                });
            }
            defaults.push(default);
            sizes.push(len as u32);
            map.insert(prop.name().to_string(), prop);
        }

        let mut strides: SmallVec<[u32; 4]> = SmallVec::from_elem(1, sizes.len());
        let mut count: u64 = 1;
        for i in (0..sizes.len()).rev() {
            strides[i] = u32::try_from(count).map_err(|_| SchemaError::TooManyStates)?;
            count = count
                .checked_mul(u64::from(sizes[i]))
                .ok_or(SchemaError::TooManyStates)?;
        }
        let state_count = u32::try_from(count).map_err(|_| SchemaError::TooManyStates)?;

        Ok(Self {
            properties: map,
            defaults,
            strides,
            state_count,
        })
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the schema declares no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Position of a property in declaration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.get_index_of(name)
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Total number of distinct states this schema admits.
    pub fn state_count(&self) -> u32 {
        self.state_count
    }
}

// ── BlockState ─────────────────────────────────────────────────────

/// An immutable block state: a type plus one value per schema property.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stratum_core::{BlockState, BlockTypeId, Property, PropertyValue, StateSchema};
///
/// let schema = Arc::new(StateSchema::new(vec![
///     Property::int("age", 0, 7, 0),
///     Property::boolean("lit", false),
/// ]).unwrap());
/// let s = BlockState::create(BlockTypeId(3), schema);
/// let grown = s.with("age", 5);
/// assert_eq!(grown.get("age"), PropertyValue::Int(5));
/// assert_eq!(grown.get("lit"), s.get("lit"));
/// assert!(s.try_with("age", 9).is_err());
/// ```
#[derive(Clone)]
pub struct BlockState {
    type_id: BlockTypeId,
    schema: Arc<StateSchema>,
    values: Ordinals,
}

impl BlockState {
    /// The default state of a type: every property at its declared default.
    pub fn create(type_id: BlockTypeId, schema: Arc<StateSchema>) -> Self {
        let values = schema.defaults.clone();
        Self {
            type_id,
            schema,
            values,
        }
    }

    /// Rebuild the state with the given dense index, or `None` if the
    /// index is outside `0..schema.state_count()`.
    pub fn from_index(type_id: BlockTypeId, schema: Arc<StateSchema>, index: u32) -> Option<Self> {
        if index >= schema.state_count {
            return None;
        }
        let mut rest = index;
        let mut values = Ordinals::with_capacity(schema.len());
        for stride in &schema.strides {
            values.push((rest / stride) as u16);
            rest %= stride;
        }
        Some(Self {
            type_id,
            schema,
            values,
        })
    }

    /// The block type of this state.
    pub fn type_id(&self) -> BlockTypeId {
        self.type_id
    }

    /// Whether this state belongs to `type_id`.
    pub fn is(&self, type_id: BlockTypeId) -> bool {
        self.type_id == type_id
    }

    /// Whether this is a state of the empty block type.
    pub fn is_empty(&self) -> bool {
        self.type_id == BlockTypeId::EMPTY
    }

    /// The schema this state was built from.
    pub fn schema(&self) -> &Arc<StateSchema> {
        &self.schema
    }

    /// Whether the schema declares `property`.
    pub fn has_property(&self, property: &str) -> bool {
        self.schema.index_of(property).is_some()
    }

    /// Dense index of this state within its type's state space.
    pub fn state_index(&self) -> u32 {
        self.values
            .iter()
            .zip(&self.schema.strides)
            .map(|(&v, &stride)| u32::from(v) * stride)
            .sum()
    }

    fn slot(&self, property: &str) -> Result<usize, StateError> {
        self.schema
            .index_of(property)
            .ok_or_else(|| StateError::InvalidProperty {
                type_id: self.type_id,
                property: property.to_string(),
            })
    }

    /// Read a property value.
    pub fn try_get(&self, property: &str) -> Result<PropertyValue, StateError> {
        let slot = self.slot(property)?;
        let (_, prop) = self
            .schema
            .properties
            .get_index(slot)
            .expect("slot comes from index_of");
        Ok(prop
            .domain()
            .value_at(self.values[slot])
            .expect("stored ordinal is within domain"))
    }

    /// Read a property value.
    ///
    /// # Panics
    ///
    /// Panics if `property` is not declared by this state's type.
    pub fn get(&self, property: &str) -> PropertyValue {
        self.try_get(property).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Return a copy of this state with `property` set to `value`.
    pub fn try_with(
        &self,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<BlockState, StateError> {
        let value = value.into();
        let slot = self.slot(property)?;
        let (_, prop) = self
            .schema
            .properties
            .get_index(slot)
            .expect("slot comes from index_of");
        let ordinal = prop
            .domain()
            .ordinal_of(&value)
            .ok_or_else(|| StateError::InvalidValue {
                type_id: self.type_id,
                property: property.to_string(),
                value: value.to_string(),
            })?;
        let mut next = self.clone();
        next.values[slot] = ordinal;
        Ok(next)
    }

    /// Return a copy of this state with `property` set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the property is undeclared or the value is outside its
    /// domain; both are programming errors.
    pub fn with(&self, property: &str, value: impl Into<PropertyValue>) -> BlockState {
        self.try_with(property, value)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Dense ordinal of a property's current value.
    pub fn try_ordinal(&self, property: &str) -> Result<u16, StateError> {
        Ok(self.values[self.slot(property)?])
    }

    /// Dense ordinal of a property's current value.
    ///
    /// # Panics
    ///
    /// Panics if `property` is not declared.
    pub fn ordinal(&self, property: &str) -> u16 {
        self.try_ordinal(property).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Return a copy with `property` set by ordinal.
    pub fn try_with_ordinal(&self, property: &str, ordinal: u16) -> Result<BlockState, StateError> {
        let slot = self.slot(property)?;
        let (_, prop) = self
            .schema
            .properties
            .get_index(slot)
            .expect("slot comes from index_of");
        if usize::from(ordinal) >= prop.domain().len() {
            return Err(StateError::InvalidValue {
                type_id: self.type_id,
                property: property.to_string(),
                value: format!("ordinal {ordinal}"),
            });
        }
        let mut next = self.clone();
        next.values[slot] = ordinal;
        Ok(next)
    }

    /// Return a copy with `property` set by ordinal.
    ///
    /// # Panics
    ///
    /// Panics on an undeclared property or out-of-range ordinal.
    pub fn with_ordinal(&self, property: &str, ordinal: u16) -> BlockState {
        self.try_with_ordinal(property, ordinal)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Advance `property` to its next domain value, wrapping to the first.
    pub fn cycle(&self, property: &str) -> BlockState {
        let slot = self.slot(property).unwrap_or_else(|e| panic!("{e}"));
        let len = self.schema.properties[slot].domain().len();
        let mut next = self.clone();
        next.values[slot] = ((usize::from(self.values[slot]) + 1) % len) as u16;
        next
    }

    /// Boolean property value.
    ///
    /// # Panics
    ///
    /// Panics if the property is undeclared or not boolean.
    pub fn get_bool(&self, property: &str) -> bool {
        match self.get(property) {
            PropertyValue::Bool(b) => b,
            other => panic!("property '{property}' is not boolean (got {other})"),
        }
    }

    /// Integer property value.
    ///
    /// # Panics
    ///
    /// Panics if the property is undeclared or not an integer.
    pub fn get_int(&self, property: &str) -> i32 {
        match self.get(property) {
            PropertyValue::Int(v) => v,
            other => panic!("property '{property}' is not an integer (got {other})"),
        }
    }

    /// Enum variant name of a property.
    ///
    /// # Panics
    ///
    /// Panics if the property is undeclared or not an enum.
    pub fn get_enum(&self, property: &str) -> &str {
        let slot = self.slot(property).unwrap_or_else(|e| panic!("{e}"));
        self.schema.properties[slot]
            .domain()
            .variant(self.values[slot])
            .unwrap_or_else(|| panic!("property '{property}' is not an enum"))
    }

    /// `(name, value)` pairs in schema order.
    pub fn values(&self) -> impl Iterator<Item = (&str, PropertyValue)> + '_ {
        self.schema
            .properties
            .iter()
            .zip(&self.values)
            .map(|((name, prop), &ord)| {
                (
                    name.as_str(),
                    prop.domain()
                        .value_at(ord)
                        .expect("stored ordinal is within domain"),
                )
            })
    }
}

impl PartialEq for BlockState {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.values == other.values
    }
}

impl Eq for BlockState {}

impl Hash for BlockState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.values.hash(state);
    }
}

impl fmt::Debug for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.type_id)?;
        if self.schema.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (name, value)) in self.values().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn crop_schema() -> Arc<StateSchema> {
        Arc::new(
            StateSchema::new(vec![
                Property::int("age", 0, 7, 0),
                Property::boolean("watered", false),
                Property::enumeration("facing", &["north", "east", "south", "west"], "south"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn create_uses_declared_defaults() {
        let s = BlockState::create(BlockTypeId(4), crop_schema());
        let values: Vec<_> = s.values().collect();
        assert_eq!(
            values,
            vec![
                ("age", PropertyValue::Int(0)),
                ("watered", PropertyValue::Bool(false)),
                ("facing", PropertyValue::Enum("south".into())),
            ]
        );
    }

    #[test]
    fn undeclared_property_is_rejected() {
        let s = BlockState::create(BlockTypeId(4), crop_schema());
        assert!(matches!(
            s.try_get("power"),
            Err(StateError::InvalidProperty { .. })
        ));
        assert!(matches!(
            s.try_with("power", 3),
            Err(StateError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn out_of_domain_value_is_rejected() {
        let s = BlockState::create(BlockTypeId(4), crop_schema());
        assert!(matches!(
            s.try_with("age", 8),
            Err(StateError::InvalidValue { .. })
        ));
        assert!(matches!(
            s.try_with("facing", "up"),
            Err(StateError::InvalidValue { .. })
        ));
        assert!(matches!(
            s.try_with("watered", 1),
            Err(StateError::InvalidValue { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "not declared")]
    fn with_panics_on_undeclared_property() {
        let s = BlockState::create(BlockTypeId(4), crop_schema());
        let _ = s.with("missing", true);
    }

    #[test]
    fn equality_ignores_schema_identity() {
        let a = BlockState::create(BlockTypeId(4), crop_schema());
        let b = BlockState::create(BlockTypeId(4), crop_schema());
        assert_eq!(a, b);
        assert_ne!(a, BlockState::create(BlockTypeId(5), crop_schema()));
        assert_ne!(a, a.with("age", 1));
    }

    #[test]
    fn cycle_wraps() {
        let s = BlockState::create(BlockTypeId(4), crop_schema()).with("age", 7);
        assert_eq!(s.cycle("age").get_int("age"), 0);
        assert_eq!(s.cycle("facing").get_enum("facing"), "west");
    }

    #[test]
    fn state_index_enumerates_state_space() {
        let schema = crop_schema();
        assert_eq!(schema.state_count(), 8 * 2 * 4);
        let mut seen = std::collections::HashSet::new();
        for i in 0..schema.state_count() {
            let s = BlockState::from_index(BlockTypeId(4), schema.clone(), i).unwrap();
            assert_eq!(s.state_index(), i);
            assert!(seen.insert(s));
        }
        assert!(BlockState::from_index(BlockTypeId(4), schema.clone(), schema.state_count()).is_none());
    }

    #[test]
    fn schema_rejects_bad_declarations() {
        assert!(matches!(
            StateSchema::new(vec![Property::boolean("a", true), Property::boolean("a", false)]),
            Err(SchemaError::DuplicateProperty { .. })
        ));
        assert!(matches!(
            StateSchema::new(vec![Property::int("age", 0, 3, 4)]),
            Err(SchemaError::DefaultOutOfDomain { .. })
        ));
        assert!(matches!(
            StateSchema::new(vec![Property::int("age", 3, 0, 0)]),
            Err(SchemaError::EmptyDomain { .. })
        ));
        assert!(matches!(
            StateSchema::new(vec![Property::enumeration("e", &["x", "x"], "x")]),
            Err(SchemaError::DuplicateVariant { .. })
        ));
    }

    #[test]
    fn empty_schema_has_one_state() {
        let s = BlockState::create(BlockTypeId(1), Arc::new(StateSchema::empty()));
        assert_eq!(s.schema().state_count(), 1);
        assert_eq!(s.state_index(), 0);
        assert_eq!(s.to_string(), "#1");
    }

    // ── proptest ───────────────────────────────────────────────

    fn arb_assignment() -> impl Strategy<Value = (&'static str, PropertyValue)> {
        prop_oneof![
            (0i32..=7).prop_map(|v| ("age", PropertyValue::Int(v))),
            any::<bool>().prop_map(|b| ("watered", PropertyValue::Bool(b))),
            prop::sample::select(vec!["north", "east", "south", "west"])
                .prop_map(|v| ("facing", PropertyValue::Enum(v.to_string()))),
        ]
    }

    proptest! {
        #[test]
        fn with_then_get_roundtrips(
            setup in prop::collection::vec(arb_assignment(), 0..6),
            assignment in arb_assignment(),
        ) {
            let (prop_name, value) = assignment;
            let mut s = BlockState::create(BlockTypeId(4), crop_schema());
            for (p, v) in setup {
                s = s.with(p, v);
            }
            let next = s.with(prop_name, value.clone());
            prop_assert_eq!(next.get(prop_name), value);
            for other in ["age", "watered", "facing"] {
                if other != prop_name {
                    prop_assert_eq!(next.get(other), s.get(other));
                }
            }
        }

        #[test]
        fn state_index_roundtrips(index in 0u32..64) {
            let schema = crop_schema();
            let s = BlockState::from_index(BlockTypeId(4), schema.clone(), index).unwrap();
            prop_assert_eq!(s.state_index(), index);
        }
    }
}
