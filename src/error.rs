//! Error taxonomy for the simulator core.
//!
//! Every failure here is fatal and surfaced synchronously to the caller:
//! the simulation is pure arithmetic over finite-dimensional vectors, so
//! there is no transient class and nothing to retry.

use thiserror::Error;

/// Canonical error type for the simulator core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A gate, observable, or injected error referenced a wire outside the
    /// register (or reused the same wire for both ends of a two-qubit gate).
    /// Indicates a caller programming error, not a recoverable condition.
    #[error("wire {wire} is invalid for a {num_wires}-wire register")]
    InvalidWire { wire: usize, num_wires: usize },

    /// A decoder input value was not exactly +1 or -1, or named an unknown
    /// generator.
    #[error("syndrome entry {generator:?} = {value} is not a valid ±1 reading")]
    InvalidSyndrome { generator: String, value: f64 },

    /// An injected-error label was not one of X, Y, Z.
    #[error("unsupported error type {label:?} (expected \"X\", \"Y\" or \"Z\")")]
    UnsupportedErrorType { label: String },
}
