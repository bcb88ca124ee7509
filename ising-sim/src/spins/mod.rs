pub mod energy;
pub mod state;

pub use energy::{flip_delta, local_field, total_energy};
pub use state::LatticeState;
