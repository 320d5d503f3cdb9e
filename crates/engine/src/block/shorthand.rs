//! Numeric shorthand redirection.

use super::{Block, BlockResult};
use crate::error::BlockError;
use crate::response::Context;
use crate::verb::Verb;

/// Rewrites a bare numeric declaration into a named lookup.
///
/// `{2}`, `{2+}`, and `{+2}` become `{target(2)}` and so on, where `target`
/// is typically an `args`-style string variable whose adapter understands
/// word-index selection. The block returns [`BlockResult::Redirect`], so the
/// whole chain is re-dispatched against the rewritten verb within the same
/// node.
#[derive(Debug, Clone)]
pub struct ShorthandRedirectBlock {
    target: String,
}

impl ShorthandRedirectBlock {
    /// Redirect numeric declarations to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

fn is_numeric_shorthand(declaration: &str) -> bool {
    let digits = declaration
        .strip_prefix('+')
        .or_else(|| declaration.strip_suffix('+'))
        .unwrap_or(declaration);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Block for ShorthandRedirectBlock {
    fn accepted_names(&self) -> &[&str] {
        &[]
    }

    fn will_accept(&self, ctx: &Context<'_>) -> bool {
        is_numeric_shorthand(&ctx.verb.declaration)
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Ok(BlockResult::Redirect(Verb {
            declaration: self.target.clone(),
            parameter: Some(ctx.verb.declaration.clone()),
            payload: ctx.verb.payload.clone(),
        }))
    }
}
