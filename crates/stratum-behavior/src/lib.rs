//! Block type registry and capability dispatch for Stratum.
//!
//! A block type is an immutable [`BlockType`]: a schema, one
//! [`BlockBehavior`] handler, a flat [`Capabilities`] set, and static
//! [`BlockAttributes`]. Handlers run inside a [`ShapeContext`] (pure
//! channels) or a [`TickContext`] (side-effecting channels, which record
//! into an [`EditBuffer`] rather than touching the world).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod capability;
pub mod context;
pub mod registry;

pub use behavior::{BlockBehavior, FluidBehavior, Inert};
pub use capability::{
    Capabilities, CapabilityKind, ChangeOverTime, Fallable, FluidContainer, FluidSource, Growable,
    PowerSource,
};
pub use context::{Edit, EditBuffer, ShapeContext, TickContext, MAX_SIGNAL};
pub use registry::{
    BlockAttributes, BlockDef, BlockType, Registry, RegistryBuilder, RegistryError,
    EMPTY_BLOCK_NAME,
};
