//! Errors reported by the checked resize API.

use thiserror::Error;

/// A resize request that the table cannot honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// The requested capacity is below the smallest capacity the map accepts.
    #[error("requested capacity {requested} is below the minimum of {minimum}")]
    BelowMinimum {
        /// Capacity passed by the caller, before prime rounding
        requested: usize,
        /// Smallest capacity the map would have accepted
        minimum: usize,
    },
}
