//! Shared fixture blocks for the interpreter test suites.

#![allow(unreachable_pub, dead_code)]

use serde_json::json;
use tagscript_engine::{Block, BlockError, BlockResult, Context};

/// Accepts a fixed set of names and always emits the same replacement text.
pub struct StaticBlock {
    names: Vec<&'static str>,
    output: String,
}

impl StaticBlock {
    pub fn new(name: &'static str, output: impl Into<String>) -> Self {
        Self {
            names: vec![name],
            output: output.into(),
        }
    }
}

impl Block for StaticBlock {
    fn accepted_names(&self) -> &[&str] {
        &self.names
    }

    fn process(&self, _ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Ok(BlockResult::Text(self.output.clone()))
    }
}

/// Accepts `wrap` and echoes its parameter and payload, so tests can see
/// exactly what text the block observed at resolution time.
pub struct WrapBlock;

impl Block for WrapBlock {
    fn accepted_names(&self) -> &[&str] {
        &["wrap"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Ok(BlockResult::Text(format!(
            "[{}|{}]",
            ctx.verb.parameter.as_deref().unwrap_or(""),
            ctx.verb.payload.as_deref().unwrap_or("")
        )))
    }
}

/// Accepts `delete` and records a post-processing action instead of text.
pub struct DeleteActionBlock;

impl Block for DeleteActionBlock {
    fn accepted_names(&self) -> &[&str] {
        &["delete"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        ctx.response.set_action("delete", json!(true));
        Ok(BlockResult::Text(String::new()))
    }
}

/// Accepts `boom` and fails, exercising the process-failure channel.
pub struct FailingBlock;

impl Block for FailingBlock {
    fn accepted_names(&self) -> &[&str] {
        &["boom"]
    }

    fn process(&self, _ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Err(BlockError::other("boom block exploded"))
    }
}

/// Accepts `loop` and redirects to itself forever.
pub struct SelfRedirectBlock;

impl Block for SelfRedirectBlock {
    fn accepted_names(&self) -> &[&str] {
        &["loop"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        Ok(BlockResult::Redirect(ctx.verb.clone()))
    }
}

/// Accepts `fix` and pre-empts the final body before raising a stop signal.
pub struct BodyFixingStopBlock;

impl Block for BodyFixingStopBlock {
    fn accepted_names(&self) -> &[&str] {
        &["fix"]
    }

    fn process(&self, ctx: &mut Context<'_>) -> Result<BlockResult, BlockError> {
        ctx.response.body = Some("body set by block".to_string());
        Err(BlockError::Stop("stop message".to_string()))
    }
}
