use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Used throughout the crate to avoid `.unwrap()`/`.expect()` in library code.
/// Each variant carries enough context to be actionable.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Numerical or geometric issue (e.g., degenerate rotor-frame projection).
    #[error("numerical error: {0}")]
    MathError(String),

    /// Configuration that cannot be initialized (e.g., particle density too
    /// high to place without overlap within the attempt budget).
    #[error("configuration infeasible: {0}")]
    Infeasible(String),
}
