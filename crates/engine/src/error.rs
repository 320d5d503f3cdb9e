//! Typed error channels for the engine.
//!
//! Three distinct non-local exits exist, and callers are expected to message
//! them differently:
//!
//! - [`BlockError::Stop`] is a deliberate early-termination feature, caught
//!   inside the interpreter and never surfaced as a failure;
//! - [`EngineError::WorkloadExceeded`] is a resource guard ("input too
//!   large"), raised when cumulative block output passes the budget;
//! - [`EngineError::Process`] wraps any other block failure with the
//!   response built so far, for diagnostic reporting.

use crate::response::Response;

/// Boxed error type blocks use for unexpected failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Non-local exits available to a block while it resolves a node.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// Halt resolution immediately. The final body becomes everything before
    /// the current node's start concatenated with this message; all remaining
    /// nodes are abandoned. Not a failure from the caller's point of view.
    #[error("stopped: {0}")]
    Stop(String),

    /// An unexpected failure inside the block. Propagated to the caller as
    /// [`EngineError::Process`].
    #[error(transparent)]
    Other(#[from] BoxedError),
}

impl BlockError {
    /// Build an [`BlockError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into())
    }
}

/// Failures surfaced by an interpretation pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Cumulative block output passed the caller-supplied character budget.
    /// Distinguishable from block failures so callers can report "input too
    /// large" instead of an internal error.
    #[error("workload exceeded: {attempted} characters attempted, budget is {budget}")]
    WorkloadExceeded {
        /// Total characters of block output attempted so far.
        attempted: usize,
        /// The configured budget.
        budget: usize,
    },

    /// Two registered blocks claim the same accepted name.
    #[error("duplicate block name: {0}")]
    DuplicateBlockName(String),

    /// A block failed while resolving a node. Carries the response built up
    /// to the failure for diagnostic reporting.
    #[error("block processing failed")]
    Process {
        /// The underlying block failure.
        #[source]
        source: BoxedError,
        /// The response accumulated before the failure.
        response: Response,
    },
}
