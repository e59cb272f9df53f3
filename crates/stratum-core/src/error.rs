//! Error types for the block-state model.
//!
//! Organized by subsystem: state access ([`StateError`]) and schema
//! declaration ([`SchemaError`]). Registry, space, and engine
//! configuration errors live in their own crates.

use std::error::Error;
use std::fmt;

use crate::id::BlockTypeId;

/// Errors from reading or writing a [`BlockState`](crate::BlockState).
///
/// Both variants are programming errors: the panicking accessors
/// (`get`, `with`) turn them into assertion failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The property is not part of the type's schema.
    InvalidProperty {
        /// Type of the state being accessed.
        type_id: BlockTypeId,
        /// The undeclared property name.
        property: String,
    },
    /// The value lies outside the property's domain.
    InvalidValue {
        /// Type of the state being accessed.
        type_id: BlockTypeId,
        /// The property being written.
        property: String,
        /// The rejected value, rendered for diagnostics.
        value: String,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProperty { type_id, property } => {
                write!(
                    f,
                    "property '{property}' is not declared by block type {type_id}"
                )
            }
            Self::InvalidValue {
                type_id,
                property,
                value,
            } => {
                write!(
                    f,
                    "value {value} is outside the domain of property '{property}' \
                     on block type {type_id}"
                )
            }
        }
    }
}

impl Error for StateError {}

/// Errors from declaring a [`StateSchema`](crate::StateSchema).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two properties share a name.
    DuplicateProperty {
        /// The repeated name.
        property: String,
    },
    /// A property's domain has no values.
    EmptyDomain {
        /// The offending property.
        property: String,
    },
    /// A property's domain has more values than an ordinal can address.
    DomainTooLarge {
        /// The offending property.
        property: String,
        /// Number of values declared.
        size: usize,
    },
    /// An enum property lists the same variant twice.
    DuplicateVariant {
        /// The offending property.
        property: String,
        /// The repeated variant.
        variant: String,
    },
    /// The declared default is not in the domain.
    DefaultOutOfDomain {
        /// The offending property.
        property: String,
        /// The rejected default, rendered for diagnostics.
        value: String,
    },
    /// The product of all domain sizes exceeds `u32::MAX`.
    TooManyStates,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateProperty { property } => {
                write!(f, "property '{property}' declared more than once")
            }
            Self::EmptyDomain { property } => {
                write!(f, "property '{property}' has an empty domain")
            }
            Self::DomainTooLarge { property, size } => {
                write!(
                    f,
                    "property '{property}' declares {size} values (max {})",
                    u16::MAX
                )
            }
            Self::DuplicateVariant { property, variant } => {
                write!(f, "property '{property}' repeats variant '{variant}'")
            }
            Self::DefaultOutOfDomain { property, value } => {
                write!(f, "default {value} of property '{property}' is outside its domain")
            }
            Self::TooManyStates => write!(f, "schema admits more than u32::MAX states"),
        }
    }
}

impl Error for SchemaError {}
