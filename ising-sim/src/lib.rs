//! Single-spin-flip Metropolis simulation of the 2D Ising model.
//!
//! A run samples an `N × N` lattice of ±1 spins, then repeatedly proposes a
//! flip at a uniformly random site and keeps or reverts it with the Metropolis
//! rule, recording the total energy and average spin after every step. The
//! lattice has a fixed zero boundary (no wraparound) and unit ferromagnetic
//! coupling.
//!
//! ```no_run
//! use ising_sim::{run_metropolis, SimulationConfig};
//!
//! let config = SimulationConfig::new(0.44, 32, 50.0, 10_000);
//! let result = run_metropolis(&config, &|_: usize| {}).unwrap();
//! assert_eq!(result.trajectory.len(), 10_000);
//! ```
//!
//! Note the polarity of `up_spin_percent`: it is the percentage of **-1**
//! spins in the initial lattice (see [`LatticeState::create`]).

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{EnergyMode, SimulationConfig};
pub use error::SimError;
pub use geometry::Lattice;
pub use mcmc::{metropolis_accept, MetropolisEngine, StepOutcome};
pub use simulation::{
    run_chain, run_ensemble, run_metropolis, Chain, EnsembleResult, SimulationResult, Trajectory,
};
pub use spins::{total_energy, LatticeState};
pub use statistics::{summarize, TrajectorySummary};
