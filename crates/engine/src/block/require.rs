//! Verb-shape refinement shared by several block kinds.

use super::{Block, BlockResult};
use crate::error::BlockError;
use crate::response::Context;

/// How strongly a verb part (parameter or payload) is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Requirement {
    /// The part is not checked.
    #[default]
    Ignored,
    /// The part must be present, even if empty (`{x:}` satisfies a payload
    /// requirement; `{x}` does not).
    Present,
    /// The part must be present and non-empty.
    NonEmpty,
}

impl Requirement {
    fn satisfied_by(self, part: Option<&str>) -> bool {
        match self {
            Requirement::Ignored => true,
            Requirement::Present => part.is_some(),
            Requirement::NonEmpty => part.is_some_and(|p| !p.is_empty()),
        }
    }
}

/// Decorator declining verbs whose shape does not match the configured
/// requirements, before the wrapped block is consulted at all.
///
/// ```
/// use tagscript_engine::{RequireShape, Requirement, StopBlock};
///
/// // A stop block that only fires when it has a non-empty payload.
/// let block = RequireShape::new(StopBlock).payload(Requirement::NonEmpty);
/// # let _ = block;
/// ```
#[derive(Debug, Clone)]
pub struct RequireShape<B> {
    inner: B,
    parameter: Requirement,
    payload: Requirement,
}

impl<B> RequireShape<B> {
    /// Wrap `inner` with no requirements yet.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            parameter: Requirement::Ignored,
            payload: Requirement::Ignored,
        }
    }

    /// Require the verb's parameter.
    pub fn parameter(mut self, requirement: Requirement) -> Self {
        self.parameter = requirement;
        self
    }

    /// Require the verb's payload.
    pub fn payload(mut self, requirement: Requirement) -> Self {
        self.payload = requirement;
        self
    }
}

impl<B: Block> Block for RequireShape<B> {
    fn accepted_names(&self) -> &[&str] {
        self.inner.accepted_names()
    }

    fn will_accept(&self, ctx: &Context<'_>) -> bool {
        self.parameter.satisfied_by(ctx.verb.parameter.as_deref())
            && self.payload.satisfied_by(ctx.verb.payload.as_deref())
            && self.inner.will_accept(ctx)
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        self.inner.process(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_matrix() {
        assert!(Requirement::Ignored.satisfied_by(None));
        assert!(Requirement::Ignored.satisfied_by(Some("")));
        assert!(!Requirement::Present.satisfied_by(None));
        assert!(Requirement::Present.satisfied_by(Some("")));
        assert!(Requirement::Present.satisfied_by(Some("x")));
        assert!(!Requirement::NonEmpty.satisfied_by(None));
        assert!(!Requirement::NonEmpty.satisfied_by(Some("")));
        assert!(Requirement::NonEmpty.satisfied_by(Some("x")));
    }
}
