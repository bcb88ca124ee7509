use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::mcmc::MetropolisEngine;
use crate::spins::LatticeState;

/// One Markov chain: an engine plus the PRNG that drives it.
///
/// The same generator samples the initial lattice and then every step, so a
/// chain is fully determined by its config and `seed`.
pub struct Chain {
    pub engine: MetropolisEngine,
    pub rng: Xoshiro256StarStar,
    pub seed: u64,
}

impl Chain {
    /// Validate `config`, seed the PRNG and sample the initial lattice.
    pub fn new(config: &SimulationConfig, seed: u64) -> Result<Self> {
        config.check()?;
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let state = LatticeState::create(config.size, config.up_spin_percent, &mut rng)?;
        Ok(Self {
            engine: MetropolisEngine::new(state, config.beta, config.energy_mode),
            rng,
            seed,
        })
    }

    /// Start from a given lattice instead of sampling one. `config.size` and
    /// `config.up_spin_percent` are not consulted.
    pub fn from_state(state: LatticeState, config: &SimulationConfig, seed: u64) -> Result<Self> {
        config.check()?;
        Ok(Self {
            engine: MetropolisEngine::new(state, config.beta, config.energy_mode),
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            seed,
        })
    }

    pub fn state(&self) -> &LatticeState {
        self.engine.state()
    }
}
