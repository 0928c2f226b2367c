//! Error types of the BDD manager and the queens controller.

use thiserror::Error;

use crate::types::Var;

/// Errors reported by the [`Bdd`][crate::bdd::Bdd] manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BddError {
    /// The node table is full.
    #[error("node table capacity exceeded ({limit} nodes)")]
    NodeCapacityExceeded { limit: usize },

    /// Allocating more variables would go past the configured limit.
    #[error("cannot allocate {requested} variables: {allocated} of {limit} already in use")]
    VariableCapacityExceeded {
        requested: usize,
        allocated: usize,
        limit: usize,
    },

    /// The variable was never handed out by `allocate`.
    #[error("variable {0} has not been allocated")]
    UnknownVariable(Var),
}

/// Errors reported by the [`Queens`][crate::queens::Queens] controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueensError {
    /// Board size is zero or above the configured ceiling.
    #[error("invalid board size {size} (must be in 1..={max})")]
    InvalidSize { size: usize, max: usize },

    #[error("coordinate ({col}, {row}) is outside of the {size}x{size} board")]
    InvalidCoordinate { col: usize, row: usize, size: usize },

    /// The manager could not provision the formula for this board.
    #[error("BDD capacity exceeded: {0}")]
    CapacityExceeded(#[from] BddError),
}
