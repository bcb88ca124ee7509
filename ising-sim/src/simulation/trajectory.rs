use serde::Serialize;

/// Upper bound on the entries reserved up front; longer runs grow on demand.
const MAX_RESERVED_STEPS: usize = 1 << 20;

/// Per-step observables of one run.
///
/// The three sequences always have the same length; entry `k` describes the
/// lattice after step `k` was decided. Entries can only be appended through
/// [`Trajectory::push`], and readers get slices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    step_indices: Vec<usize>,
    /// Total energy after each step.
    energies: Vec<f64>,
    /// Average spin (magnetization per site) after each step.
    average_spins: Vec<f64>,
}

impl Trajectory {
    pub fn with_capacity(n_steps: usize) -> Self {
        let n_steps = n_steps.min(MAX_RESERVED_STEPS);
        Self {
            step_indices: Vec::with_capacity(n_steps),
            energies: Vec::with_capacity(n_steps),
            average_spins: Vec::with_capacity(n_steps),
        }
    }

    pub fn push(&mut self, step: usize, energy: f64, average_spin: f64) {
        self.step_indices.push(step);
        self.energies.push(energy);
        self.average_spins.push(average_spin);
    }

    pub fn step_indices(&self) -> &[usize] {
        &self.step_indices
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn average_spins(&self) -> &[f64] {
        &self.average_spins
    }

    pub fn len(&self) -> usize {
        self.step_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_sequences_aligned() {
        let mut traj = Trajectory::with_capacity(2);
        assert!(traj.is_empty());
        traj.push(0, -4.0, 1.0);
        traj.push(1, 0.0, 0.5);
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.step_indices(), &[0, 1]);
        assert_eq!(traj.energies(), &[-4.0, 0.0]);
        assert_eq!(traj.average_spins(), &[1.0, 0.5]);
    }

    #[test]
    fn test_huge_step_count_does_not_reserve_everything() {
        let traj = Trajectory::with_capacity(usize::MAX);
        assert!(traj.is_empty());
        assert!(traj.energies.capacity() <= MAX_RESERVED_STEPS);
    }
}
