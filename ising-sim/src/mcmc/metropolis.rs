use rand::Rng;

use crate::config::EnergyMode;
use crate::error::Result;
use crate::spins::{flip_delta, total_energy, LatticeState};

/// Metropolis acceptance rule.
///
/// Moves with `delta <= 0` are always accepted and consume no randomness.
/// Otherwise one `u` is drawn from `[0, 1)` and the move is accepted iff
/// `u < exp(-beta * delta)`. With `beta = 0` the probability is 1, so every
/// move passes.
#[inline]
pub fn metropolis_accept<R: Rng + ?Sized>(delta: f64, beta: f64, rng: &mut R) -> bool {
    if delta <= 0.0 {
        return true;
    }
    let probability = (-beta * delta).exp();
    rng.gen::<f64>() < probability
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Proposed site `(x, y)`.
    pub site: (usize, usize),
    pub accepted: bool,
    /// Total energy after the accept/revert decision.
    pub energy: f64,
}

/// Single-spin-flip Metropolis chain over one lattice.
///
/// The engine owns the lattice for the whole run. Random numbers are drawn in
/// a fixed order per step: `x`, then `y`, then `u` only if the trial flip
/// raised the energy.
#[derive(Debug, Clone)]
pub struct MetropolisEngine {
    state: LatticeState,
    beta: f64,
    mode: EnergyMode,
    /// Energy of `state`, kept current after every step.
    energy: f64,
}

impl MetropolisEngine {
    pub fn new(state: LatticeState, beta: f64, mode: EnergyMode) -> Self {
        let energy = total_energy(&state);
        Self {
            state,
            beta,
            mode,
            energy,
        }
    }

    pub fn state(&self) -> &LatticeState {
        &self.state
    }

    pub fn into_state(self) -> LatticeState {
        self.state
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mode(&self) -> EnergyMode {
        self.mode
    }

    /// Current total energy.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Propose one flip, decide, and report the post-decision energy.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome> {
        match self.mode {
            EnergyMode::Full => self.step_full(rng),
            EnergyMode::LocalDelta => self.step_local_delta(rng),
        }
    }

    fn propose<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let size = self.state.size();
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        (x, y)
    }

    /// Rescan the lattice before the proposal, after the trial flip and after
    /// the decision.
    fn step_full<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome> {
        let e_initial = total_energy(&self.state);

        let (x, y) = self.propose(rng);
        self.state.flip(x, y)?;

        let e_final = total_energy(&self.state);

        let accepted = metropolis_accept(e_final - e_initial, self.beta, rng);
        if !accepted {
            self.state.flip(x, y)?;
        }

        self.energy = total_energy(&self.state);
        Ok(StepOutcome {
            site: (x, y),
            accepted,
            energy: self.energy,
        })
    }

    /// Decide from the four-neighbor energy change and carry the running total.
    /// Energies are integer-valued, so the running total stays exact.
    fn step_local_delta<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome> {
        let (x, y) = self.propose(rng);
        let i = x * self.state.size() + y;

        let delta = flip_delta(&self.state, i);
        let accepted = metropolis_accept(delta, self.beta, rng);
        if accepted {
            self.state.flip(x, y)?;
            self.energy += delta;
        }

        Ok(StepOutcome {
            site: (x, y),
            accepted,
            energy: self.energy,
        })
    }
}
