use super::state::LatticeState;

/// Total energy of the nearest-neighbor Ising Hamiltonian (coupling 1, no field).
///
/// For every site, the in-grid up/down/left/right neighbors are summed (cells
/// beyond the edge count as 0), the sum is multiplied by the site's spin, and
/// the products are added up. Each bond is seen twice, so the negated total is
/// halved:
///
/// `E = -(Σ_i s_i · Σ_{j ∈ nb(i)} s_j) / 2`
///
/// A 2×2 all-up lattice gives -4; a 1×1 lattice always gives 0.
pub fn total_energy(state: &LatticeState) -> f64 {
    let spins = state.spins();
    let mut total = 0i64;
    for (i, &si) in spins.iter().enumerate() {
        total += si as i64 * local_field(state, i);
    }
    -(total as f64) / 2.0
}

/// Sum of the in-grid neighbor spins of site `i`.
#[inline]
pub fn local_field(state: &LatticeState, i: usize) -> i64 {
    let spins = state.spins();
    state
        .lattice()
        .neighbors_of(i)
        .map(|j| spins[j] as i64)
        .sum()
}

/// Energy change caused by flipping site `i`, computed from its four-neighbor
/// stencil. Equals `total_energy(after) - total_energy(before)` exactly.
#[inline]
pub fn flip_delta(state: &LatticeState, i: usize) -> f64 {
    let si = state.spins()[i] as i64;
    (2 * si * local_field(state, i)) as f64
}
