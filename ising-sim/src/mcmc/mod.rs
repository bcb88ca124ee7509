pub mod metropolis;

pub use metropolis::{metropolis_accept, MetropolisEngine, StepOutcome};
