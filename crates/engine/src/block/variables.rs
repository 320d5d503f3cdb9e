//! Variable assignment and lookup blocks.

use super::{Block, BlockResult};
use crate::adapter::StringAdapter;
use crate::error::BlockError;
use crate::response::Context;

/// Explicit variable assignment: `{=(name):value}`.
///
/// The parameter is the variable name, the payload its value. Resolves to
/// empty text. Declines when the name would shadow a name claimed by another
/// registered block, so `{=(stop):x}` cannot hijack `{stop}`.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentBlock;

impl Block for AssignmentBlock {
    fn accepted_names(&self) -> &[&str] {
        &["=", "assign", "let", "var"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        let Some(name) = ctx.verb.parameter.as_deref() else {
            return Ok(BlockResult::Decline);
        };
        let name = name.trim().to_string();
        if name.is_empty() || ctx.is_claimed_name(&name) {
            return Ok(BlockResult::Decline);
        }
        let value = ctx.verb.payload.clone().unwrap_or_default();
        ctx.response
            .set_variable(name, Box::new(StringAdapter::new(value)));
        Ok(BlockResult::Text(String::new()))
    }
}

/// Implicit variable lookup, polymorphic over *all* declarations.
///
/// Must be registered after every other block in the chain: it accepts any
/// verb, then declines when the declaration is not a known variable name so
/// the block's literal `{...}` text survives untouched.
#[derive(Debug, Clone, Copy)]
pub struct LooseVariableGetterBlock;

impl Block for LooseVariableGetterBlock {
    fn accepted_names(&self) -> &[&str] {
        &[]
    }

    fn will_accept(&self, _ctx: &Context<'_>) -> bool {
        true
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        match ctx.response.variables.get(&ctx.verb.declaration) {
            Some(adapter) => Ok(match adapter.get_value(&ctx.verb) {
                Some(value) => BlockResult::Text(value),
                None => BlockResult::Decline,
            }),
            None => Ok(BlockResult::Decline),
        }
    }
}
