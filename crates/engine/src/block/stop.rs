//! Early-termination block.

use super::{Block, BlockResult};
use crate::error::BlockError;
use crate::response::Context;

/// Halts resolution with a literal replacement message.
///
/// `{stop:msg}` fires unconditionally; `{stop(cond):msg}` fires only when
/// `cond` is the word `true` (any case) and otherwise resolves to empty text,
/// letting templates gate the stop on a pre-substituted condition block.
#[derive(Debug, Clone, Copy)]
pub struct StopBlock;

impl Block for StopBlock {
    fn accepted_names(&self) -> &[&str] {
        &["stop", "halt", "error"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        let fire = match ctx.verb.parameter.as_deref() {
            None => true,
            Some(condition) => condition.trim().eq_ignore_ascii_case("true"),
        };
        if fire {
            Err(BlockError::Stop(ctx.verb.payload.clone().unwrap_or_default()))
        } else {
            Ok(BlockResult::Text(String::new()))
        }
    }
}
