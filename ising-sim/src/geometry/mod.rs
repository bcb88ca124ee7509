pub mod lattice;

pub use lattice::{Lattice, MAX_SIZE};
