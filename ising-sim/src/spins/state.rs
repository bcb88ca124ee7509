use rand::Rng;
use serde::{Serialize, Serializer};

use crate::error::{Result, SimError};
use crate::geometry::{Lattice, MAX_SIZE};

fn check_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_SIZE {
        return Err(SimError::InvalidConfig(format!(
            "size must be in [1, {MAX_SIZE}], got {size}"
        )));
    }
    Ok(())
}

/// An `N × N` grid of ±1 spins together with its geometry.
///
/// Spins live in one flat row-major `Vec<i8>` (see [`Lattice::index`]). Every
/// write goes through [`LatticeState::set`], so no cell ever holds anything
/// other than +1 or -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeState {
    lattice: Lattice,
    spins: Vec<i8>,
}

impl LatticeState {
    /// Sample a random initial lattice.
    ///
    /// Each cell draws `u` uniformly from `[0, 100)` and becomes +1 when
    /// `u >= up_spin_percent`, otherwise -1.
    ///
    /// **Polarity note:** despite its name, `up_spin_percent` is the expected
    /// percentage of **-1** cells. `0` yields an all +1 lattice and `100` an
    /// all -1 lattice. This is kept on purpose so that runs stay comparable with
    /// existing trajectories; do not "fix" it here.
    pub fn create<R: Rng + ?Sized>(
        size: usize,
        up_spin_percent: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_size(size)?;
        if !(0.0..=100.0).contains(&up_spin_percent) {
            return Err(SimError::InvalidConfig(format!(
                "up_spin_percent must be in [0, 100], got {up_spin_percent}"
            )));
        }

        let lattice = Lattice::square(size);
        let spins = (0..lattice.n_spins)
            .map(|_| {
                if rng.gen::<f64>() * 100.0 >= up_spin_percent {
                    1
                } else {
                    -1
                }
            })
            .collect();

        Ok(Self { lattice, spins })
    }

    /// Build a lattice from explicit row-major values.
    pub fn from_spins(size: usize, spins: Vec<i8>) -> Result<Self> {
        check_size(size)?;
        if spins.len() != size * size {
            return Err(SimError::InvalidConfig(format!(
                "expected {} spins for a {size}x{size} lattice, got {}",
                size * size,
                spins.len()
            )));
        }
        if let Some(i) = spins.iter().position(|&s| s != 1 && s != -1) {
            return Err(SimError::InvalidSpin {
                x: i / size,
                y: i % size,
                value: spins[i],
            });
        }
        Ok(Self {
            lattice: Lattice::square(size),
            spins,
        })
    }

    /// Lattice with every cell set to `value`.
    pub fn uniform(size: usize, value: i8) -> Result<Self> {
        check_size(size)?;
        Self::from_spins(size, vec![value; size * size])
    }

    pub fn size(&self) -> usize {
        self.lattice.size
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Row-major read-only view of all spins.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[i8]> + '_ {
        self.spins.chunks(self.lattice.size)
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize> {
        self.lattice.index(x, y).ok_or(SimError::OutOfBounds {
            x,
            y,
            size: self.lattice.size,
        })
    }

    pub fn get(&self, x: usize, y: usize) -> Result<i8> {
        Ok(self.spins[self.checked_index(x, y)?])
    }

    pub fn set(&mut self, x: usize, y: usize, value: i8) -> Result<()> {
        let i = self.checked_index(x, y)?;
        if value != 1 && value != -1 {
            return Err(SimError::InvalidSpin { x, y, value });
        }
        self.spins[i] = value;
        Ok(())
    }

    /// Negate the spin at `(x, y)` and return its new value.
    pub fn flip(&mut self, x: usize, y: usize) -> Result<i8> {
        let flipped = -self.get(x, y)?;
        self.set(x, y, flipped)?;
        Ok(flipped)
    }

    /// Number of +1 cells.
    pub fn count_up(&self) -> usize {
        self.spins.iter().filter(|&&s| s == 1).count()
    }

    /// Sum of all spin values.
    pub fn magnetization(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }

    /// Average spin, `(n_up - n_down) / N²`, always in `[-1, 1]`.
    pub fn mean(&self) -> f64 {
        self.magnetization() as f64 / self.lattice.n_spins as f64
    }
}

/// Serializes as a list of rows, the shape a plotting front-end expects.
impl Serialize for LatticeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_create_only_produces_unit_spins() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let state = LatticeState::create(16, 37.5, &mut rng).unwrap();
        assert_eq!(state.spins().len(), 256);
        assert!(state.spins().iter().all(|&s| s == 1 || s == -1));
    }

    #[test]
    fn test_create_polarity_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        // P = 0: no draw is below 0, every cell is +1
        let all_up = LatticeState::create(8, 0.0, &mut rng).unwrap();
        assert!(all_up.spins().iter().all(|&s| s == 1));
        // P = 100: every draw is below 100, every cell is -1
        let all_down = LatticeState::create(8, 100.0, &mut rng).unwrap();
        assert!(all_down.spins().iter().all(|&s| s == -1));
    }

    #[test]
    fn test_create_fraction_tracks_down_probability() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let state = LatticeState::create(100, 25.0, &mut rng).unwrap();
        let down_fraction = 1.0 - state.count_up() as f64 / 10_000.0;
        assert!((down_fraction - 0.25).abs() < 0.03, "got {down_fraction}");
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        assert!(matches!(
            LatticeState::create(0, 50.0, &mut rng),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            LatticeState::create(4, 101.0, &mut rng),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_oversized_lattice_is_rejected_before_allocating() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let size = MAX_SIZE + 1;
        for res in [
            LatticeState::create(size, 50.0, &mut rng),
            LatticeState::uniform(size, 1),
            LatticeState::from_spins(size, Vec::new()),
        ] {
            assert!(matches!(res, Err(SimError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_get_set_bounds_and_values() {
        let mut state = LatticeState::uniform(3, 1).unwrap();
        state.set(2, 1, -1).unwrap();
        assert_eq!(state.get(2, 1), Ok(-1));
        assert_eq!(state.spins()[7], -1);

        assert_eq!(
            state.get(3, 0),
            Err(SimError::OutOfBounds { x: 3, y: 0, size: 3 })
        );
        assert_eq!(
            state.set(0, 0, 0),
            Err(SimError::InvalidSpin { x: 0, y: 0, value: 0 })
        );
        assert_eq!(state.get(0, 0), Ok(1));
    }

    #[test]
    fn test_flip_negates() {
        let mut state = LatticeState::uniform(2, -1).unwrap();
        assert_eq!(state.flip(1, 0), Ok(1));
        assert_eq!(state.flip(1, 0), Ok(-1));
    }

    #[test]
    fn test_mean_matches_counts() {
        let state = LatticeState::from_spins(2, vec![1, 1, 1, -1]).unwrap();
        assert_eq!(state.count_up(), 3);
        assert_eq!(state.mean(), 0.5);
        assert_eq!(LatticeState::uniform(5, -1).unwrap().mean(), -1.0);
    }

    #[test]
    fn test_from_spins_rejects_invalid_value() {
        let err = LatticeState::from_spins(2, vec![1, 0, 1, 1]).unwrap_err();
        assert_eq!(err, SimError::InvalidSpin { x: 0, y: 1, value: 0 });
    }
}
