//! Test utilities and fixture block types for Stratum development.
//!
//! Provides a cloneable side-effect recorder ([`RecordingSideEffects`]),
//! small space constructors, and the fixture behaviors in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use stratum_core::{SideEffect, SideEffects};
use stratum_space::Cuboid;

pub use fixtures::{
    fixture_registry, Evictor, Fixtures, Flipper, Pillar, Spreader, TickCounter, COUNTER, EVICTOR,
    FLIPPER, PILLAR, SPREADER, STONE,
};

/// Side-effect sink whose clones share one log.
///
/// Hand one clone to the engine and keep the other to inspect what was
/// emitted.
#[derive(Clone, Default)]
pub struct RecordingSideEffects {
    log: Arc<Mutex<Vec<SideEffect>>>,
}

impl RecordingSideEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, in order.
    pub fn effects(&self) -> Vec<SideEffect> {
        self.log.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl SideEffects for RecordingSideEffects {
    fn emit(&mut self, effect: SideEffect) {
        self.log.lock().unwrap().push(effect);
    }
}

/// A `size`³ cuboid anchored at the origin.
pub fn cube(size: u32) -> Cuboid {
    Cuboid::with_size(size, size, size).unwrap()
}

/// A flat `sx` × `sy` × `sz` cuboid anchored at the origin.
pub fn slab_space(sx: u32, sy: u32, sz: u32) -> Cuboid {
    Cuboid::with_size(sx, sy, sz).unwrap()
}
