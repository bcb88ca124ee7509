use serde::Serialize;

use super::autocorrelation::{autocorrelation, sokal_tau};
use crate::simulation::Trajectory;

/// Longest lag used for the energy autocorrelation time.
const MAX_TAU_LAG: usize = 1000;

/// Equilibrium estimates over the tail of a trajectory.
///
/// Fluctuation observables are per spin: `C = β² Var(E) / N²` and
/// `χ = β N² Var(|m|)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    /// Number of steps averaged (after discarding warmup).
    pub n_samples: usize,
    pub mean_energy: f64,
    /// Mean energy per spin.
    pub energy_per_spin: f64,
    pub mean_abs_magnetization: f64,
    pub specific_heat: f64,
    pub susceptibility: f64,
    /// Integrated autocorrelation time of the energy series, in steps.
    pub energy_tau: f64,
}

/// Summarize `trajectory` after dropping the first `warmup` steps.
///
/// Returns `None` when nothing is left to average.
pub fn summarize(
    trajectory: &Trajectory,
    warmup: usize,
    beta: f64,
    n_spins: usize,
) -> Option<TrajectorySummary> {
    let energies = trajectory.energies().get(warmup..)?;
    let mags = trajectory.average_spins().get(warmup..)?;
    if energies.is_empty() {
        return None;
    }

    let n = energies.len() as f64;
    let n_spins = n_spins as f64;

    let mean_e = energies.iter().sum::<f64>() / n;
    let mean_e2 = energies.iter().map(|e| e * e).sum::<f64>() / n;
    let mean_abs_m = mags.iter().map(|m| m.abs()).sum::<f64>() / n;
    let mean_m2 = mags.iter().map(|m| m * m).sum::<f64>() / n;

    let max_lag = MAX_TAU_LAG.min(energies.len() / 4).max(1);
    let gamma = autocorrelation(energies, max_lag);

    Some(TrajectorySummary {
        n_samples: energies.len(),
        mean_energy: mean_e,
        energy_per_spin: mean_e / n_spins,
        mean_abs_magnetization: mean_abs_m,
        specific_heat: beta * beta * (mean_e2 - mean_e * mean_e).max(0.0) / n_spins,
        susceptibility: beta * n_spins * (mean_m2 - mean_abs_m * mean_abs_m).max(0.0),
        energy_tau: sokal_tau(&gamma),
    })
}
