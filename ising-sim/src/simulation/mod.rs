pub mod chain;
pub mod trajectory;

pub use chain::Chain;
pub use trajectory::Trajectory;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::spins::LatticeState;
use crate::statistics::Statistics;

/// Output of one run: the trajectory and the lattice it ended in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub trajectory: Trajectory,
    pub final_lattice: LatticeState,
    /// Number of proposals that were kept.
    pub accepted_moves: usize,
}

impl SimulationResult {
    /// Fraction of proposals accepted, 0 for an empty run.
    pub fn acceptance_rate(&self) -> f64 {
        if self.trajectory.is_empty() {
            0.0
        } else {
            self.accepted_moves as f64 / self.trajectory.len() as f64
        }
    }
}

/// Run `n_steps` Metropolis steps on `chain`, recording one trajectory entry
/// per step.
///
/// `on_step(k)` is called after step `k` has been recorded (useful for
/// progress bars). It only sees the step index, never the lattice.
pub fn run_chain(
    mut chain: Chain,
    n_steps: usize,
    on_step: &(dyn Fn(usize) + Sync),
) -> Result<SimulationResult> {
    debug!(
        "chain seed={} size={} beta={} mode={:?}: {} steps",
        chain.seed,
        chain.state().size(),
        chain.engine.beta(),
        chain.engine.mode(),
        n_steps
    );

    let mut trajectory = Trajectory::with_capacity(n_steps);
    let mut accepted_moves = 0usize;

    for step in 0..n_steps {
        let outcome = chain.engine.step(&mut chain.rng)?;
        accepted_moves += outcome.accepted as usize;
        trajectory.push(step, outcome.energy, chain.engine.state().mean());
        on_step(step);
    }

    debug!(
        "chain seed={} done: accepted {accepted_moves}/{n_steps}, final energy {}",
        chain.seed,
        chain.engine.energy()
    );

    Ok(SimulationResult {
        seed: chain.seed,
        trajectory,
        final_lattice: chain.engine.into_state(),
        accepted_moves,
    })
}

/// Validate `config`, sample the initial lattice from `config.seed` and run
/// `config.max_epochs` steps.
///
/// Nothing is created when the config is invalid.
pub fn run_metropolis(
    config: &SimulationConfig,
    on_step: &(dyn Fn(usize) + Sync),
) -> Result<SimulationResult> {
    let chain = Chain::new(config, config.seed)?;
    run_chain(chain, config.max_epochs, on_step)
}

/// Independent chains with per-step moments across them.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleResult {
    pub runs: Vec<SimulationResult>,
    /// ⟨E⟩ at each step, averaged over chains.
    pub mean_energies: Vec<f64>,
    /// ⟨E²⟩ at each step.
    pub mean_sq_energies: Vec<f64>,
    /// ⟨|m|⟩ at each step.
    pub mean_abs_spins: Vec<f64>,
    /// ⟨m²⟩ at each step.
    pub mean_sq_spins: Vec<f64>,
}

impl EnsembleResult {
    fn aggregate(runs: Vec<SimulationResult>, n_steps: usize) -> Self {
        let mut energy_stat = Statistics::new(n_steps, 1);
        let mut energy2_stat = Statistics::new(n_steps, 2);
        let mut abs_spin_stat = Statistics::new(n_steps, 1);
        let mut spin2_stat = Statistics::new(n_steps, 2);

        for run in &runs {
            let t = &run.trajectory;
            energy_stat.update(t.energies().iter().copied());
            energy2_stat.update(t.energies().iter().copied());
            abs_spin_stat.update(t.average_spins().iter().map(|m| m.abs()));
            spin2_stat.update(t.average_spins().iter().copied());
        }

        Self {
            runs,
            mean_energies: energy_stat.average(),
            mean_sq_energies: energy2_stat.average(),
            mean_abs_spins: abs_spin_stat.average(),
            mean_sq_spins: spin2_stat.average(),
        }
    }

    /// Per-step energy variance across chains, `⟨E²⟩ − ⟨E⟩²`.
    pub fn energy_variance(&self) -> Vec<f64> {
        self.mean_sq_energies
            .iter()
            .zip(&self.mean_energies)
            .map(|(e2, e)| (e2 - e * e).max(0.0))
            .collect()
    }
}

/// Run `n_chains` independent chains seeded `config.seed, config.seed + 1, …`.
///
/// Each chain is its own serial Markov chain; only whole chains run in
/// parallel. With `sequential = true` (or a single chain) everything runs on
/// the current thread.
pub fn run_ensemble(
    config: &SimulationConfig,
    n_chains: usize,
    sequential: bool,
    on_step: &(dyn Fn(usize) + Sync),
) -> Result<EnsembleResult> {
    if n_chains < 1 {
        return Err(SimError::InvalidConfig("n_chains must be >= 1".into()));
    }
    config.check()?;

    info!(
        "ensemble of {n_chains} chains: size={} beta={} steps={}",
        config.size, config.beta, config.max_epochs
    );

    let run_one = |k: usize| {
        let chain = Chain::new(config, config.seed.wrapping_add(k as u64))?;
        run_chain(chain, config.max_epochs, on_step)
    };

    let runs: Vec<SimulationResult> = if sequential || n_chains == 1 {
        (0..n_chains).map(run_one).collect::<Result<Vec<_>>>()?
    } else {
        (0..n_chains)
            .into_par_iter()
            .map(run_one)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(EnsembleResult::aggregate(runs, config.max_epochs))
}
