use thiserror::Error;

/// Errors raised by the lattice and the run setup.
///
/// `InvalidConfig` is reported once, before any state is created. The other
/// two variants come from the checked lattice accessors; the engine only ever
/// stores `-s` for an in-grid site, so seeing them from a run means a broken
/// internal invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid spin value {value} at ({x}, {y}), expected +1 or -1")]
    InvalidSpin { x: usize, y: usize, value: i8 },

    #[error("site ({x}, {y}) is outside the {size}x{size} lattice")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
