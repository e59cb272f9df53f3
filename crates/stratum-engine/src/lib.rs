//! Block-behavior engine for Stratum voxel worlds.
//!
//! Provides the [`TickEngine`] that drives neighbour-update cascades,
//! scheduled and random ticks, and change-over-time diffusion against a
//! [`WorldGrid`](stratum_core::WorldGrid), plus the in-memory
//! [`MemoryGrid`] collaborator and its immutable [`GridSnapshot`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cascade;
pub mod config;
pub mod diffusion;
pub mod grid;
pub mod metrics;
pub mod random_tick;
pub mod schedule;
pub mod tick;

pub use cascade::CascadeReport;
pub use config::{ConfigError, DiffusionConfig, EngineConfig};
pub use diffusion::{DiffusionOutcome, DiffusionSampler, DiffusionTally, ScanOutcome};
pub use grid::{GridSnapshot, MemoryGrid};
pub use metrics::StepMetrics;
pub use schedule::{ScheduledTick, TickScheduler};
pub use tick::TickEngine;
