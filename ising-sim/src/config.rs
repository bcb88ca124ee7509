use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::error::{Result, SimError};
use crate::geometry::MAX_SIZE;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

/// How the engine evaluates energies inside a step.
///
/// `Full` rescans the whole lattice before the proposal, after the trial flip
/// and after the decision. `LocalDelta` takes the energy change from the four
/// neighbors of the flipped site and carries a running total. Both draw random
/// numbers in the same order and record the same energies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyMode {
    #[default]
    Full,
    LocalDelta,
}

impl TryFrom<&str> for EnergyMode {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s {
            "full" => Ok(Self::Full),
            "local-delta" | "local_delta" | "delta" => Ok(Self::LocalDelta),
            _ => Err(format!(
                "unknown energy_mode '{s}', expected 'full' or 'local-delta'"
            )),
        }
    }
}

fn validate_simulation_config(
    cfg: &SimulationConfig,
) -> std::result::Result<(), ValidationError> {
    if cfg.size < 1 {
        return Err(ValidationError::new("size must be >= 1"));
    }
    if cfg.size > MAX_SIZE {
        return Err(ValidationError::new("size must be <= 65535"));
    }
    if !cfg.beta.is_finite() || cfg.beta < 0.0 {
        return Err(ValidationError::new("beta must be finite and >= 0"));
    }
    // NaN falls outside the range as well
    if !(0.0..=100.0).contains(&cfg.up_spin_percent) {
        return Err(ValidationError::new("up_spin_percent must be in [0, 100]"));
    }
    Ok(())
}

/// Parameters of one Metropolis run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Validate, Serialize)]
#[validate(schema(function = "validate_simulation_config"))]
pub struct SimulationConfig {
    /// Inverse temperature.
    pub beta: f64,
    /// Lattice side length `N`.
    pub size: usize,
    /// Percentage threshold `P` used when sampling the initial lattice.
    ///
    /// A cell becomes -1 when its uniform draw in `[0, 100)` falls below `P`,
    /// so `P` is the percentage of **-1** spins, not +1 spins as the name
    /// suggests. See [`LatticeState::create`](crate::spins::LatticeState::create).
    pub up_spin_percent: f64,
    /// Number of propose/accept steps. Zero is allowed.
    pub max_epochs: usize,
    pub energy_mode: EnergyMode,
    pub seed: u64,
}

impl SimulationConfig {
    pub fn new(beta: f64, size: usize, up_spin_percent: f64, max_epochs: usize) -> Self {
        Self {
            beta,
            size,
            up_spin_percent,
            max_epochs,
            energy_mode: EnergyMode::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_energy_mode(mut self, energy_mode: EnergyMode) -> Self {
        self.energy_mode = energy_mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the validator and convert its report into [`SimError::InvalidConfig`].
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| SimError::InvalidConfig(format!("{e}")))
    }
}
