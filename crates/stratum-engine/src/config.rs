//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for [`TickEngine`](crate::TickEngine).
//! [`validate()`](EngineConfig::validate) checks structural invariants at
//! construction; nothing is re-validated per tick.

use std::error::Error;
use std::fmt;

// ── DiffusionConfig ────────────────────────────────────────────────

/// Tuning of the change-over-time diffusion sampler.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionConfig {
    /// Probability that a sampled cell is evaluated at all. Default: 0.05688889.
    pub gate_probability: f64,
    /// Manhattan radius of the neighbourhood scan. Default: 4.
    pub radius: u32,
}

impl DiffusionConfig {
    /// Largest accepted scan radius.
    pub const MAX_RADIUS: u32 = 16;
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            gate_probability: 0.056_888_89,
            radius: 4,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `max_cascade_updates` is zero.
    ZeroCascadeUpdates,
    /// `max_cascade_depth` is zero.
    ZeroCascadeDepth,
    /// `max_scheduled_ticks_per_step` is zero.
    ZeroScheduledBudget,
    /// `random_tick_speed` exceeds one section's volume.
    RandomTickSpeedTooHigh {
        /// The configured value.
        value: u32,
    },
    /// The diffusion gate is NaN or outside `[0, 1]`.
    InvalidGateProbability {
        /// The configured value.
        value: f64,
    },
    /// The diffusion radius is zero or above [`DiffusionConfig::MAX_RADIUS`].
    InvalidDiffusionRadius {
        /// The configured value.
        value: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCascadeUpdates => write!(f, "max_cascade_updates must be at least 1"),
            Self::ZeroCascadeDepth => write!(f, "max_cascade_depth must be at least 1"),
            Self::ZeroScheduledBudget => {
                write!(f, "max_scheduled_ticks_per_step must be at least 1")
            }
            Self::RandomTickSpeedTooHigh { value } => write!(
                f,
                "random_tick_speed {value} exceeds the {} cells of a section",
                stratum_core::SectionPos::VOLUME
            ),
            Self::InvalidGateProbability { value } => {
                write!(f, "diffusion gate probability must lie in [0, 1], got {value}")
            }
            Self::InvalidDiffusionRadius { value } => write!(
                f,
                "diffusion radius must lie in 1..={}, got {value}",
                DiffusionConfig::MAX_RADIUS
            ),
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration of a [`TickEngine`](crate::TickEngine).
///
/// # Examples
///
/// ```
/// use stratum_engine::{ConfigError, EngineConfig};
///
/// let config = EngineConfig { random_tick_speed: 0, ..EngineConfig::default() };
/// assert!(config.validate().is_ok());
///
/// let bad = EngineConfig { max_cascade_depth: 0, ..EngineConfig::default() };
/// assert_eq!(bad.validate(), Err(ConfigError::ZeroCascadeDepth));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Cap on block and fluid writes applied by one top-level edit,
    /// cascade included. Default: 100 000.
    pub max_cascade_updates: u32,
    /// Cap on neighbour-update chain length from the originating edit.
    /// Default: 4096.
    pub max_cascade_depth: u32,
    /// Random-tick samples per loaded section per step. `0` disables
    /// random ticking. Default: 3.
    pub random_tick_speed: u32,
    /// Cap on scheduled ticks fired per step; the rest stay queued.
    /// Default: 65 536.
    pub max_scheduled_ticks_per_step: u32,
    /// Diffusion sampler tuning.
    pub diffusion: DiffusionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_updates: 100_000,
            max_cascade_depth: 4096,
            random_tick_speed: 3,
            max_scheduled_ticks_per_step: 65_536,
            diffusion: DiffusionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cascade_updates == 0 {
            return Err(ConfigError::ZeroCascadeUpdates);
        }
        if self.max_cascade_depth == 0 {
            return Err(ConfigError::ZeroCascadeDepth);
        }
        if self.max_scheduled_ticks_per_step == 0 {
            return Err(ConfigError::ZeroScheduledBudget);
        }
        if self.random_tick_speed as usize > stratum_core::SectionPos::VOLUME {
            return Err(ConfigError::RandomTickSpeedTooHigh {
                value: self.random_tick_speed,
            });
        }
        let gate = self.diffusion.gate_probability;
        if !(0.0..=1.0).contains(&gate) {
            // NaN fails `contains` as well.
            return Err(ConfigError::InvalidGateProbability { value: gate });
        }
        let radius = self.diffusion.radius;
        if radius == 0 || radius > DiffusionConfig::MAX_RADIUS {
            return Err(ConfigError::InvalidDiffusionRadius { value: radius });
        }
        Ok(())
    }
}
