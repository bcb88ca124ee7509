/// Streaming autocorrelation accumulator using a ring buffer.
///
/// Computes the normalized autocorrelation function Γ(δ) of a scalar time
/// series (energy or magnetization per step) without storing the full
/// history. Memory is O(max_lag).
#[derive(Debug, Clone)]
pub struct AutocorrAccum {
    max_lag: usize,
    /// Last `max_lag + 1` values, including the one just pushed.
    ring: Vec<f64>,
    sum_o: f64,
    sum_o2: f64,
    /// Running sum of o(t)·o(t−δ) for δ = 0..=max_lag.
    sum_prod: Vec<f64>,
    n_recorded: usize,
    ring_pos: usize,
}

impl AutocorrAccum {
    pub fn new(max_lag: usize) -> Self {
        Self {
            max_lag,
            ring: vec![0.0; max_lag + 1],
            sum_o: 0.0,
            sum_o2: 0.0,
            sum_prod: vec![0.0; max_lag + 1],
            n_recorded: 0,
            ring_pos: 0,
        }
    }

    pub fn push(&mut self, o: f64) {
        let len = self.ring.len();
        let pos = self.ring_pos;
        self.ring[pos] = o;
        self.sum_o += o;
        self.sum_o2 += o * o;

        let n_back = self.n_recorded.min(self.max_lag);
        for delta in 0..=n_back {
            let idx = (pos + len - delta) % len;
            self.sum_prod[delta] += o * self.ring[idx];
        }
        self.n_recorded += 1;
        self.ring_pos = (pos + 1) % len;
    }

    /// Γ(δ) for δ = 0..=max_lag. Lags with no data, or a constant series,
    /// report Γ(0) = 1 and 0 elsewhere.
    pub fn finish(&self) -> Vec<f64> {
        let m = self.n_recorded as f64;
        let mean = self.sum_o / m;
        let var = self.sum_o2 / m - mean * mean;
        (0..=self.max_lag)
            .map(|delta| {
                let count = self.n_recorded.saturating_sub(delta) as f64;
                if count <= 0.0 || var <= 1e-12 * (mean * mean).max(1.0) {
                    return if delta == 0 { 1.0 } else { 0.0 };
                }
                (self.sum_prod[delta] / count - mean * mean) / var
            })
            .collect()
    }
}

/// Normalized autocorrelation of a whole series up to `max_lag`.
pub fn autocorrelation(series: &[f64], max_lag: usize) -> Vec<f64> {
    let mut accum = AutocorrAccum::new(max_lag);
    for &o in series {
        accum.push(o);
    }
    accum.finish()
}

/// Integrated autocorrelation time with Sokal's automatic window (c = 5).
pub fn sokal_tau(gamma: &[f64]) -> f64 {
    let mut tau = 0.5;
    for (w, &g) in gamma.iter().enumerate().skip(1) {
        tau += g;
        if w as f64 >= 5.0 * tau {
            return tau;
        }
    }
    tau
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_series() {
        let series: Vec<f64> = (0..100)
            .map(|t| if t % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let gamma = autocorrelation(&series, 3);
        assert!((gamma[0] - 1.0).abs() < 1e-12);
        assert!((gamma[1] + 1.0).abs() < 1e-12);
        assert!((gamma[2] - 1.0).abs() < 1e-12);
        assert!((gamma[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series() {
        let gamma = autocorrelation(&[-4.0; 50], 4);
        assert_eq!(gamma, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_max_lag_uses_oldest_value() {
        // period-3 pattern: lag 3 returns to the same value
        let series: Vec<f64> = (0..300).map(|t| [1.0, 0.0, -1.0][t % 3]).collect();
        let gamma = autocorrelation(&series, 3);
        assert!((gamma[3] - 1.0).abs() < 1e-9, "gamma[3] = {}", gamma[3]);
    }

    #[test]
    fn test_sokal_tau_uncorrelated() {
        let gamma = vec![1.0, 0.0, 0.0, 0.0];
        assert_eq!(sokal_tau(&gamma), 0.5);
    }
}
