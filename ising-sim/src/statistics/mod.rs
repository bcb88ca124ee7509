pub mod autocorrelation;
pub mod summary;
mod stats;

pub use autocorrelation::{autocorrelation, sokal_tau, AutocorrAccum};
pub use stats::Statistics;
pub use summary::{summarize, TrajectorySummary};
