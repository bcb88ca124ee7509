/// Sentinel stored in the neighbor table for a bond that leaves the grid.
const NO_NEIGHBOR: u32 = u32::MAX;

/// Largest side length whose site indices fit the `u32` neighbor table
/// below the sentinel.
pub const MAX_SIZE: usize = 65_535;

/// Forward offsets of the square lattice: one unit step along each axis.
const SQUARE_OFFSETS: [(isize, isize); 2] = [(1, 0), (0, 1)];

/// Square `size × size` lattice with a fixed (zero) boundary and a
/// precomputed neighbor table.
///
/// Sites are indexed in row-major order: site `(x, y)` lives at
/// `x * size + y`, so `x` selects the row and `y` the column. Bonds that would
/// cross the edge of the grid have no partner; spins outside the grid count as
/// zero, so edge sites have fewer than four neighbors. There is no wraparound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    /// Side length `N`.
    pub size: usize,
    /// Total number of sites (`size * size`).
    pub n_spins: usize,
    /// Number of forward neighbor directions per site (2 on the square lattice).
    pub n_neighbors: usize,
    /// Layout: `neighbors[(i * n_neighbors + d) * 2 + dir]` where `dir = 0` is
    /// forward and `dir = 1` is backward. `NO_NEIGHBOR` marks a missing bond.
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Build the geometry of an `size × size` grid.
    ///
    /// # Panics
    ///
    /// If `size > MAX_SIZE`. Validated configs never get here with such a size.
    pub fn square(size: usize) -> Self {
        assert!(size <= MAX_SIZE, "lattice size {size} exceeds {MAX_SIZE}");
        let n_spins = size * size;
        let n_neighbors = SQUARE_OFFSETS.len();
        let mut neighbors = vec![NO_NEIGHBOR; n_spins * n_neighbors * 2];

        for i in 0..n_spins {
            let (x, y) = ((i / size) as isize, (i % size) as isize);
            for (d, &(dx, dy)) in SQUARE_OFFSETS.iter().enumerate() {
                for (dir, sign) in [(0, 1isize), (1, -1isize)] {
                    let nx = x + sign * dx;
                    let ny = y + sign * dy;
                    let bounds = 0..size as isize;
                    if bounds.contains(&nx) && bounds.contains(&ny) {
                        neighbors[(i * n_neighbors + d) * 2 + dir] =
                            (nx as usize * size + ny as usize) as u32;
                    }
                }
            }
        }

        Self {
            size,
            n_spins,
            n_neighbors,
            neighbors,
        }
    }

    /// Flat index of `(x, y)`, or `None` when the coordinates leave the grid.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| x * self.size + y)
    }

    /// Inverse of [`Lattice::index`].
    #[inline]
    pub fn coords(&self, flat_idx: usize) -> (usize, usize) {
        (flat_idx / self.size, flat_idx % self.size)
    }

    /// Return the neighbor of site `flat_idx` in direction `dim`, if it is
    /// inside the grid. `forward = true` means +offset, `forward = false` −offset.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> Option<usize> {
        let j = self.neighbors[(flat_idx * self.n_neighbors + dim) * 2 + (!forward as usize)];
        (j != NO_NEIGHBOR).then_some(j as usize)
    }

    /// All in-grid neighbors of `flat_idx` (up to four).
    #[inline]
    pub fn neighbors_of(&self, flat_idx: usize) -> impl Iterator<Item = usize> + '_ {
        let base = flat_idx * self.n_neighbors * 2;
        self.neighbors[base..base + self.n_neighbors * 2]
            .iter()
            .filter(|&&j| j != NO_NEIGHBOR)
            .map(|&j| j as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_3x3_neighbors() {
        //   0 1 2
        //   3 4 5
        //   6 7 8
        let lat = Lattice::square(3);
        assert_eq!(lat.n_spins, 9);
        assert_eq!(lat.n_neighbors, 2);

        // Spin 0 = (0,0): forward in dim 0 -> (1,0)=3, forward in dim 1 -> (0,1)=1
        assert_eq!(lat.neighbor(0, 0, true), Some(3));
        assert_eq!(lat.neighbor(0, 1, true), Some(1));

        // Backward from the corner leaves the grid, no wrap
        assert_eq!(lat.neighbor(0, 0, false), None);
        assert_eq!(lat.neighbor(0, 1, false), None);

        // Spin 8 = (2,2): forward leaves the grid, backward -> 5 and 7
        assert_eq!(lat.neighbor(8, 0, true), None);
        assert_eq!(lat.neighbor(8, 1, true), None);
        assert_eq!(lat.neighbor(8, 0, false), Some(5));
        assert_eq!(lat.neighbor(8, 1, false), Some(7));
    }

    #[test]
    fn test_coordination_numbers() {
        let lat = Lattice::square(3);
        let counts: Vec<usize> = (0..lat.n_spins)
            .map(|i| lat.neighbors_of(i).count())
            .collect();
        // corners 2, edges 3, center 4
        assert_eq!(counts, vec![2, 3, 2, 3, 4, 3, 2, 3, 2]);

        let mut center: Vec<usize> = lat.neighbors_of(4).collect();
        center.sort_unstable();
        assert_eq!(center, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_single_site_has_no_neighbors() {
        let lat = Lattice::square(1);
        assert_eq!(lat.neighbors_of(0).count(), 0);
    }

    #[test]
    fn test_largest_index_stays_below_sentinel() {
        assert!((MAX_SIZE * MAX_SIZE - 1) < NO_NEIGHBOR as usize);
        assert!(((MAX_SIZE + 1) * (MAX_SIZE + 1) - 1) >= NO_NEIGHBOR as usize);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_oversized_lattice_panics() {
        Lattice::square(MAX_SIZE + 1);
    }

    #[test]
    fn test_index_roundtrip_and_bounds() {
        let lat = Lattice::square(4);
        assert_eq!(lat.index(2, 3), Some(11));
        assert_eq!(lat.coords(11), (2, 3));
        assert_eq!(lat.index(4, 0), None);
        assert_eq!(lat.index(0, 4), None);
    }
}
