/// Per-step moment of one observable across independent chains.
///
/// Slot `t` sums `value[t]^power` over every chain passed to
/// [`Statistics::update`]; [`Statistics::average`] divides by the chain count.
/// Power 1 gives the ensemble mean at each step, power 2 the second moment.
#[derive(Debug, Clone)]
pub struct Statistics {
    n_chains: usize,
    sums: Vec<f64>,
    power: i32,
}

impl Statistics {
    pub fn new(n_steps: usize, power: i32) -> Self {
        Self {
            n_chains: 0,
            sums: vec![0.0; n_steps],
            power,
        }
    }

    /// Add one chain's per-step values. Callers map the raw trajectory
    /// (e.g. `|m|`) on the way in; extra values past `n_steps` are ignored.
    pub fn update<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        self.n_chains += 1;
        for (sum, v) in self.sums.iter_mut().zip(values) {
            *sum += match self.power {
                1 => v,
                2 => v * v,
                p => v.powi(p),
            };
        }
    }

    pub fn n_chains(&self) -> usize {
        self.n_chains
    }

    /// Per-step mean of `value^power`; all zeros before the first update.
    pub fn average(&self) -> Vec<f64> {
        if self.n_chains == 0 {
            return vec![0.0; self.sums.len()];
        }
        let c = self.n_chains as f64;
        self.sums.iter().map(|&s| s / c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_second_moment() {
        let mut mean = Statistics::new(2, 1);
        let mut second = Statistics::new(2, 2);
        for values in [[1.0, -2.0], [3.0, 2.0]] {
            mean.update(values);
            second.update(values);
        }
        assert_eq!(mean.n_chains(), 2);
        assert_eq!(mean.average(), vec![2.0, 0.0]);
        assert_eq!(second.average(), vec![5.0, 4.0]);
    }

    #[test]
    fn test_mapping_on_update() {
        let mut abs = Statistics::new(3, 1);
        abs.update([-1.0, 0.5, -0.25].iter().map(|m: &f64| m.abs()));
        abs.update([1.0, -0.5, 0.25].iter().map(|m: &f64| m.abs()));
        assert_eq!(abs.average(), vec![1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_short_input_leaves_tail_untouched() {
        let mut stat = Statistics::new(3, 1);
        stat.update([4.0]);
        assert_eq!(stat.average(), vec![4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(Statistics::new(3, 2).average(), vec![0.0; 3]);
    }
}
