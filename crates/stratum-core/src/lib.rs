//! Core types and traits for the Stratum block-behavior engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! block-state model, grid geometry, fluids, scheduling keys, error
//! types, deterministic random streams, and the collaborator traits the
//! engine drives world storage through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod effect;
pub mod error;
pub mod fluid;
pub mod id;
pub mod property;
pub mod rng;
pub mod state;
pub mod tick;
pub mod traits;

pub use effect::SideEffect;
pub use error::{SchemaError, StateError};
pub use fluid::{Fluid, FluidState};
pub use id::{BlockPos, BlockTypeId, Direction, SectionPos, TickId};
pub use property::{Property, PropertyDomain, PropertyValue};
pub use rng::{random_stream, sequence_stream, stream_seed, TickRng};
pub use state::{BlockState, StateSchema};
pub use tick::{TargetKind, TickPriority, TickTarget};
pub use traits::{GridView, SideEffects, WorldGrid};
