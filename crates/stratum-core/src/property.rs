//! Block properties: named, finite-domain value axes.
//!
//! Every domain value has a dense ordinal (`false = 0, true = 1`;
//! `min..=max` maps to `0..`; enum variants in declaration order).
//! Block states store ordinals, never raw values.

use std::fmt;

/// The finite set of values a [`Property`] may take.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyDomain {
    /// `false` or `true`.
    Bool,
    /// Every integer in `min..=max`.
    Int {
        /// Smallest allowed value (inclusive).
        min: i32,
        /// Largest allowed value (inclusive).
        max: i32,
    },
    /// One of a fixed list of named variants.
    Enum(Vec<String>),
}

impl PropertyDomain {
    /// Number of values in the domain.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool => 2,
            Self::Int { min, max } => {
                if max < min {
                    0
                } else {
                    (i64::from(*max) - i64::from(*min) + 1) as usize
                }
            }
            Self::Enum(variants) => variants.len(),
        }
    }

    /// Whether the domain has no values (never true for a registered property).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense ordinal of `value`, or `None` if it lies outside the domain.
    pub fn ordinal_of(&self, value: &PropertyValue) -> Option<u16> {
        match (self, value) {
            (Self::Bool, PropertyValue::Bool(b)) => Some(u16::from(*b)),
            (Self::Int { min, max }, PropertyValue::Int(v)) => {
                if v < min || v > max {
                    None
                } else {
                    u16::try_from(i64::from(*v) - i64::from(*min)).ok()
                }
            }
            (Self::Enum(variants), PropertyValue::Enum(name)) => variants
                .iter()
                .position(|v| v == name)
                .and_then(|i| u16::try_from(i).ok()),
            _ => None,
        }
    }

    /// The value with the given ordinal, or `None` if out of range.
    pub fn value_at(&self, ordinal: u16) -> Option<PropertyValue> {
        if usize::from(ordinal) >= self.len() {
            return None;
        }
        Some(match self {
            Self::Bool => PropertyValue::Bool(ordinal == 1),
            Self::Int { min, .. } => PropertyValue::Int(min + i32::from(ordinal)),
            Self::Enum(variants) => PropertyValue::Enum(variants[usize::from(ordinal)].clone()),
        })
    }

    /// Name of an enum variant by ordinal. `None` for non-enum domains.
    pub fn variant(&self, ordinal: u16) -> Option<&str> {
        match self {
            Self::Enum(variants) => variants.get(usize::from(ordinal)).map(String::as_str),
            _ => None,
        }
    }
}

/// A concrete property value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// Enum variant name.
    Enum(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Enum(name) => f.write_str(name),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Enum(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Enum(v)
    }
}

/// A named value axis declared by a block type.
///
/// Properties are declared once when a type is registered. Construction
/// is infallible; [`StateSchema::new`](crate::StateSchema::new) validates
/// the domain and default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    name: String,
    domain: PropertyDomain,
    default: PropertyValue,
}

impl Property {
    /// A boolean property.
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            domain: PropertyDomain::Bool,
            default: PropertyValue::Bool(default),
        }
    }

    /// A bounded integer property over `min..=max`.
    pub fn int(name: impl Into<String>, min: i32, max: i32, default: i32) -> Self {
        Self {
            name: name.into(),
            domain: PropertyDomain::Int { min, max },
            default: PropertyValue::Int(default),
        }
    }

    /// An enumerated property over `variants`.
    pub fn enumeration(name: impl Into<String>, variants: &[&str], default: &str) -> Self {
        Self {
            name: name.into(),
            domain: PropertyDomain::Enum(variants.iter().map(|v| v.to_string()).collect()),
            default: PropertyValue::Enum(default.to_string()),
        }
    }

    /// Property name, unique within its schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property's value domain.
    pub fn domain(&self) -> &PropertyDomain {
        &self.domain
    }

    /// The declared default value.
    pub fn default_value(&self) -> &PropertyValue {
        &self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_domain_ordinals() {
        let d = PropertyDomain::Int { min: -2, max: 3 };
        assert_eq!(d.len(), 6);
        assert_eq!(d.ordinal_of(&PropertyValue::Int(-2)), Some(0));
        assert_eq!(d.ordinal_of(&PropertyValue::Int(3)), Some(5));
        assert_eq!(d.ordinal_of(&PropertyValue::Int(4)), None);
        assert_eq!(d.value_at(5), Some(PropertyValue::Int(3)));
        assert_eq!(d.value_at(6), None);
    }

    #[test]
    fn enum_domain_ordinals_follow_declaration_order() {
        let d = PropertyDomain::Enum(vec!["low".into(), "mid".into(), "high".into()]);
        assert_eq!(d.ordinal_of(&"mid".into()), Some(1));
        assert_eq!(d.ordinal_of(&"top".into()), None);
        assert_eq!(d.variant(2), Some("high"));
        assert_eq!(d.value_at(0), Some(PropertyValue::Enum("low".into())));
    }

    #[test]
    fn mismatched_value_kind_is_out_of_domain() {
        assert_eq!(PropertyDomain::Bool.ordinal_of(&PropertyValue::Int(1)), None);
        let d = PropertyDomain::Int { min: 0, max: 1 };
        assert_eq!(d.ordinal_of(&PropertyValue::Bool(true)), None);
    }

    #[test]
    fn inverted_int_domain_is_empty() {
        assert!(PropertyDomain::Int { min: 3, max: 2 }.is_empty());
    }
}
