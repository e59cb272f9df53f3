//! Addressable-space topologies for Stratum worlds.
//!
//! This crate defines the [`Space`] trait, which decides which cells of
//! the unbounded integer lattice exist, along with concrete backends.
//!
//! # Backends
//!
//! - [`Cuboid`]: bounded axis-aligned box
//! - [`SectionSet`]: sparse set of loaded 16³ sections

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cuboid;
pub mod error;
pub mod section_set;
pub mod space;

#[cfg(test)]
pub(crate) mod compliance;

pub use cuboid::Cuboid;
pub use error::SpaceError;
pub use section_set::SectionSet;
pub use space::Space;
