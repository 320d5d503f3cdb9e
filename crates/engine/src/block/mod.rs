//! The block capability: pluggable handlers dispatched over an ordered chain.
//!
//! Dispatch is a linear first-match-wins walk, not a name-keyed lookup: one
//! block may accept many names, and some (like
//! [`LooseVariableGetterBlock`](variables::LooseVariableGetterBlock)) accept
//! *any* declaration. Chain order is therefore part of the public contract —
//! catch-all blocks belong at the end.

pub mod require;
pub mod shorthand;
pub mod stop;
pub mod variables;

use crate::error::BlockError;
use crate::response::Context;
use crate::verb::Verb;
use async_trait::async_trait;

/// What a block produced for the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockResult {
    /// Not mine; let the next block in the chain try.
    Decline,
    /// Accepted: replace the node's `{...}` text with this string, which may
    /// be empty.
    Text(String),
    /// Re-dispatch the whole chain against this rewritten verb, within the
    /// same node. Used by shorthand blocks that turn a numeric declaration
    /// into a different declaration plus parameter.
    Redirect(Verb),
}

impl BlockResult {
    /// Shorthand for [`BlockResult::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// A synchronous handler for one kind of bracketed directive.
pub trait Block: Send + Sync {
    /// Declaration names this block accepts. Compared case-insensitively by
    /// the default [`Block::will_accept`] and collected into the
    /// interpreter's name registry. Blocks overriding `will_accept` to match
    /// by predicate (rather than by name) return an empty slice.
    fn accepted_names(&self) -> &[&str];

    /// Whether this block wants the current verb.
    fn will_accept(&self, ctx: &Context<'_>) -> bool {
        self.accepted_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&ctx.verb.declaration))
    }

    /// Resolve the current verb. Blocks may mutate `ctx.response` (actions,
    /// variables) as an intentional side effect even while returning output.
    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError>;
}

/// An asynchronous handler. Identical contract to [`Block`] with suspension
/// points at `will_accept` and `process`.
///
/// Every synchronous [`Block`] is also an `AsyncBlock` through a blanket
/// impl, so sync blocks can be registered in an
/// [`AsyncInterpreter`](crate::AsyncInterpreter) unchanged.
#[async_trait]
pub trait AsyncBlock: Send + Sync {
    /// Declaration names this block accepts; see [`Block::accepted_names`].
    fn accepted_names(&self) -> &[&str];

    /// Whether this block wants the current verb.
    async fn will_accept(&self, ctx: &Context<'_>) -> bool {
        self.accepted_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&ctx.verb.declaration))
    }

    /// Resolve the current verb; see [`Block::process`].
    async fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError>;
}

#[async_trait]
impl<B: Block> AsyncBlock for B {
    fn accepted_names(&self) -> &[&str] {
        Block::accepted_names(self)
    }

    async fn will_accept(&self, ctx: &Context<'_>) -> bool {
        Block::will_accept(self, ctx)
    }

    async fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Block::process(self, ctx)
    }
}
