//! Reference block types for the Stratum block-behavior engine.
//!
//! Each module implements one family of vanilla-style blocks on top of
//! the behavior and capability traits, so that every channel the
//! engine dispatches has at least one real consumer:
//!
//! | Block | Channels and capabilities |
//! |-------|---------------------------|
//! | [`TORCH`] | `can_survive` |
//! | [`WHEAT`] | `random_tick`, [`Growable`](stratum_behavior::Growable) |
//! | [`COPPER_BLOCK`], [`CUT_COPPER`] | [`ChangeOverTime`](stratum_behavior::ChangeOverTime) |
//! | [`SAND`], [`GRAVEL`] | `on_place`, `neighbor_changed`, [`Fallable`](stratum_behavior::Fallable) |
//! | [`LEVER`] | [`PowerSource`](stratum_behavior::PowerSource) |
//! | [`LAMP`] | `neighbor_changed`, `tick` |
//! | [`OAK_SLAB`] | [`FluidContainer`](stratum_behavior::FluidContainer), [`FluidSource`](stratum_behavior::FluidSource) |
//!
//! Water and lava are driven by [`FlowingFluid`].
//!
//! # Examples
//!
//! ```
//! use stratum_blocks::{reference_registry, WHEAT};
//! use stratum_behavior::CapabilityKind;
//!
//! let registry = reference_registry();
//! let wheat = registry.id_of(WHEAT).unwrap();
//! assert!(registry.implements(wheat, CapabilityKind::Growable));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod crop;
pub mod falling;
pub mod fluid;
pub mod redstone;
pub mod reference;
pub mod slab;
pub mod torch;
pub mod weathering;

pub use crop::Crop;
pub use falling::Falling;
pub use fluid::FlowingFluid;
pub use redstone::{Lamp, Lever};
pub use reference::{
    reference_registry, register_reference_blocks, COPPER_BLOCK, CUT_COPPER, GRASS, GRAVEL, LAMP,
    LEVER, OAK_SLAB, SAND, STONE, TORCH, WHEAT,
};
pub use slab::Waterloggable;
pub use torch::Torch;
pub use weathering::Weathering;
