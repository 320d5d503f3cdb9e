//! The resolution loop: dispatch each scanned node through the block chain,
//! rewrite the document in place, and keep the remaining node coordinates
//! consistent after every rewrite.

use crate::block::{AsyncBlock, Block, BlockResult};
use crate::error::{BlockError, BoxedError, EngineError};
use crate::node::{Node, scan_nodes};
use crate::response::{AdapterMap, Context, Response};
use crate::verb::{DEFAULT_VERB_LIMIT, Verb};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Redirects allowed while resolving a single node before the pass is
/// treated as failed. Guards against a block redirecting to itself.
const REDIRECT_LIMIT: usize = 8;

/// Per-call knobs for one interpretation pass.
#[derive(Debug)]
pub struct ProcessOptions {
    /// Seed variables available to lookup blocks from the first node on.
    pub variables: AdapterMap,
    /// Caller side-channel values, exposed to blocks via
    /// [`Response::extras`].
    pub extras: IndexMap<String, Value>,
    /// Cumulative cap, in characters, on all block output emitted during the
    /// pass. `None` disables the guard.
    pub charlimit: Option<usize>,
    /// Per-block cap on scanned verb content, in characters.
    pub verb_limit: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            variables: AdapterMap::new(),
            extras: IndexMap::new(),
            charlimit: None,
            verb_limit: DEFAULT_VERB_LIMIT,
        }
    }
}

/// Why the solve loop bailed out. Mapped onto [`EngineError`] once the
/// response can be moved into the error.
#[derive(Debug)]
enum SolveFailure {
    Workload { attempted: usize, budget: usize },
    Block(BoxedError),
}

/// The synchronous interpreter: an ordered chain of [`Block`] handlers.
///
/// An interpreter is an immutable, shareable configuration object; every call
/// to [`Interpreter::process`] owns its own response and node list, so
/// independent documents may be processed from multiple threads concurrently.
pub struct Interpreter {
    blocks: Vec<Box<dyn Block>>,
    block_names: Vec<String>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("block_names", &self.block_names)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Build an interpreter over `blocks`, in dispatch order.
    ///
    /// Order is significant: the first block whose `will_accept` returns true
    /// wins, so catch-all blocks (like the loose variable getter) must come
    /// last. Fails with [`EngineError::DuplicateBlockName`] when two blocks
    /// claim the same name.
    pub fn new(blocks: Vec<Box<dyn Block>>) -> Result<Self, EngineError> {
        let block_names = collect_block_names(blocks.iter().map(|b| b.accepted_names()))?;
        Ok(Self {
            blocks,
            block_names,
        })
    }

    /// Every accepted name registered with this interpreter, lowercased.
    pub fn block_names(&self) -> &[String] {
        &self.block_names
    }

    /// Process a document with default options.
    pub fn process(&self, message: &str) -> Result<Response, EngineError> {
        self.process_with(message, ProcessOptions::default())
    }

    /// Process a document.
    ///
    /// Returns the final [`Response`], or [`EngineError::WorkloadExceeded`] /
    /// [`EngineError::Process`] as described in the error module. A stop
    /// signal raised by a block is not an error: the truncated body is
    /// returned as a normal response.
    pub fn process_with(
        &self,
        message: &str,
        options: ProcessOptions,
    ) -> Result<Response, EngineError> {
        let mut response = Response::new(options.variables, options.extras);
        let mut nodes = scan_nodes(message);
        debug!(nodes = nodes.len(), "scanned document");
        match self.solve(
            message,
            &mut nodes,
            &mut response,
            options.charlimit,
            options.verb_limit,
        ) {
            Ok(output) => Ok(finish_response(response, output)),
            Err(failure) => Err(failure.into_engine_error(response)),
        }
    }

    /// Resolve every node in scan order against the current document
    /// snapshot, rewriting as it goes.
    fn solve(
        &self,
        message: &str,
        nodes: &mut [Node],
        response: &mut Response,
        charlimit: Option<usize>,
        verb_limit: usize,
    ) -> Result<String, SolveFailure> {
        let mut final_text = message.to_string();
        let mut total_work = 0usize;
        for index in 0..nodes.len() {
            let (start, end) = (nodes[index].start, nodes[index].end);
            let mut ctx = Context {
                verb: Verb::parse(&final_text[start..=end], verb_limit),
                response: &mut *response,
                original_message: message,
                block_names: &self.block_names,
            };
            debug!(verb = %ctx.verb, start, end, "resolving node");
            let output = match self.dispatch(&mut ctx) {
                Ok(output) => output,
                Err(BlockError::Stop(stop_message)) => {
                    debug!(start, "stop signal raised");
                    return Ok(format!("{}{stop_message}", &final_text[..start]));
                }
                Err(BlockError::Other(source)) => return Err(SolveFailure::Block(source)),
            };
            nodes[index].verb = Some(ctx.verb);
            let Some(output) = output else {
                // No block accepted; the literal braces stay in the text.
                continue;
            };

            total_work = check_workload(charlimit, total_work, &output)?;
            let differential = text_deform(start, end, &mut final_text, &output);
            translate_nodes(&mut nodes[index + 1..], start, differential);
            nodes[index].output = Some(output);
        }
        Ok(final_text)
    }

    /// Walk the chain first-match-wins, re-dispatching on redirects.
    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Option<String>, BlockError> {
        for _ in 0..=REDIRECT_LIMIT {
            let mut redirected = None;
            for block in &self.blocks {
                if !block.will_accept(ctx) {
                    continue;
                }
                match block.process(ctx)? {
                    BlockResult::Decline => continue,
                    BlockResult::Text(text) => return Ok(Some(text)),
                    BlockResult::Redirect(verb) => {
                        redirected = Some(verb);
                        break;
                    }
                }
            }
            match redirected {
                Some(verb) => {
                    debug!(from = %ctx.verb, to = %verb, "redirecting verb");
                    ctx.verb = verb;
                }
                None => return Ok(None),
            }
        }
        Err(BlockError::other(format!(
            "redirect limit exceeded while resolving {}",
            ctx.verb
        )))
    }
}

/// The asynchronous dual of [`Interpreter`], over [`AsyncBlock`] handlers.
///
/// One cooperative task per pass: nodes are still resolved strictly in scan
/// order, with suspension points only at `will_accept` and `process`. There
/// is no parallel block execution within a pass and no cancellation beyond
/// the stop signal; callers wanting a timeout race the whole pass externally.
pub struct AsyncInterpreter {
    blocks: Vec<Box<dyn AsyncBlock>>,
    block_names: Vec<String>,
}

impl AsyncInterpreter {
    /// Build an async interpreter over `blocks`, in dispatch order.
    ///
    /// Synchronous [`Block`] implementations are accepted unchanged through
    /// the blanket [`AsyncBlock`] impl.
    pub fn new(blocks: Vec<Box<dyn AsyncBlock>>) -> Result<Self, EngineError> {
        let block_names = collect_block_names(blocks.iter().map(|b| b.accepted_names()))?;
        Ok(Self {
            blocks,
            block_names,
        })
    }

    /// Every accepted name registered with this interpreter, lowercased.
    pub fn block_names(&self) -> &[String] {
        &self.block_names
    }

    /// Process a document with default options.
    pub async fn process(&self, message: &str) -> Result<Response, EngineError> {
        self.process_with(message, ProcessOptions::default()).await
    }

    /// Process a document. See [`Interpreter::process_with`].
    pub async fn process_with(
        &self,
        message: &str,
        options: ProcessOptions,
    ) -> Result<Response, EngineError> {
        let mut response = Response::new(options.variables, options.extras);
        let mut nodes = scan_nodes(message);
        debug!(nodes = nodes.len(), "scanned document");
        match self
            .solve(
                message,
                &mut nodes,
                &mut response,
                options.charlimit,
                options.verb_limit,
            )
            .await
        {
            Ok(output) => Ok(finish_response(response, output)),
            Err(failure) => Err(failure.into_engine_error(response)),
        }
    }

    async fn solve(
        &self,
        message: &str,
        nodes: &mut [Node],
        response: &mut Response,
        charlimit: Option<usize>,
        verb_limit: usize,
    ) -> Result<String, SolveFailure> {
        let mut final_text = message.to_string();
        let mut total_work = 0usize;
        for index in 0..nodes.len() {
            let (start, end) = (nodes[index].start, nodes[index].end);
            let mut ctx = Context {
                verb: Verb::parse(&final_text[start..=end], verb_limit),
                response: &mut *response,
                original_message: message,
                block_names: &self.block_names,
            };
            debug!(verb = %ctx.verb, start, end, "resolving node");
            let output = match self.dispatch(&mut ctx).await {
                Ok(output) => output,
                Err(BlockError::Stop(stop_message)) => {
                    debug!(start, "stop signal raised");
                    return Ok(format!("{}{stop_message}", &final_text[..start]));
                }
                Err(BlockError::Other(source)) => return Err(SolveFailure::Block(source)),
            };
            nodes[index].verb = Some(ctx.verb);
            let Some(output) = output else {
                continue;
            };

            total_work = check_workload(charlimit, total_work, &output)?;
            let differential = text_deform(start, end, &mut final_text, &output);
            translate_nodes(&mut nodes[index + 1..], start, differential);
            nodes[index].output = Some(output);
        }
        Ok(final_text)
    }

    async fn dispatch(&self, ctx: &mut Context<'_>) -> Result<Option<String>, BlockError> {
        for _ in 0..=REDIRECT_LIMIT {
            let mut redirected = None;
            for block in &self.blocks {
                if !block.will_accept(ctx).await {
                    continue;
                }
                match block.process(ctx).await? {
                    BlockResult::Decline => continue,
                    BlockResult::Text(text) => return Ok(Some(text)),
                    BlockResult::Redirect(verb) => {
                        redirected = Some(verb);
                        break;
                    }
                }
            }
            match redirected {
                Some(verb) => {
                    debug!(from = %ctx.verb, to = %verb, "redirecting verb");
                    ctx.verb = verb;
                }
                None => return Ok(None),
            }
        }
        Err(BlockError::other(format!(
            "redirect limit exceeded while resolving {}",
            ctx.verb
        )))
    }
}

// ── Shared loop pieces ──────────────────────────────────────────────────

impl SolveFailure {
    fn into_engine_error(self, response: Response) -> EngineError {
        match self {
            SolveFailure::Workload { attempted, budget } => {
                EngineError::WorkloadExceeded { attempted, budget }
            }
            SolveFailure::Block(source) => EngineError::Process { source, response },
        }
    }
}

/// Collect the accepted names of every block, lowercased, rejecting
/// duplicates across the whole chain.
fn collect_block_names<'a>(
    names: impl Iterator<Item = &'a [&'a str]>,
) -> Result<Vec<String>, EngineError> {
    let mut collected: Vec<String> = Vec::new();
    for name in names.flatten() {
        let name = name.to_ascii_lowercase();
        if collected.contains(&name) {
            return Err(EngineError::DuplicateBlockName(name));
        }
        collected.push(name);
    }
    Ok(collected)
}

/// Add `output`'s character count to the running total, failing once the
/// budget is passed. One block's overshoot is the most the total can exceed
/// the budget by, since the pass aborts right here.
fn check_workload(
    charlimit: Option<usize>,
    total_work: usize,
    output: &str,
) -> Result<usize, SolveFailure> {
    let Some(budget) = charlimit else {
        return Ok(total_work);
    };
    let attempted = total_work + output.chars().count();
    if attempted > budget {
        return Err(SolveFailure::Workload { attempted, budget });
    }
    Ok(attempted)
}

/// Replace `text[start..=end]` with `output`, returning the change in byte
/// length so not-yet-visited coordinates can be translated.
fn text_deform(start: usize, end: usize, text: &mut String, output: &str) -> isize {
    let replaced_len = end + 1 - start;
    text.replace_range(start..=end, output);
    output.len() as isize - replaced_len as isize
}

/// Shift the coordinates of every not-yet-visited node to account for a
/// rewrite at `start` that changed the document length by `differential`.
///
/// Each endpoint is compared against the rewritten node's *start*
/// independently: the closing brace of an enclosing node sits past `start`
/// and must move, while its opening brace (at or before `start`) must not.
fn translate_nodes(nodes: &mut [Node], start: usize, differential: isize) {
    for node in nodes {
        if node.start > start {
            node.start = node.start.saturating_add_signed(differential);
        }
        if node.end > start {
            node.end = node.end.saturating_add_signed(differential);
        }
    }
}

/// Fix the final body: the rewritten document, trimmed, unless a block
/// already set the body (then only trim what it set).
fn finish_response(mut response: Response, output: String) -> Response {
    let body = response.body.take().unwrap_or(output);
    response.body = Some(body.trim().to_string());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deform_grows_and_shrinks() {
        let mut text = "ab{x}cd".to_string();
        let diff = text_deform(2, 4, &mut text, "12345");
        assert_eq!(text, "ab12345cd");
        assert_eq!(diff, 2);

        let mut text = "ab{x}cd".to_string();
        let diff = text_deform(2, 4, &mut text, "");
        assert_eq!(text, "abcd");
        assert_eq!(diff, -3);
    }

    #[test]
    fn translate_shifts_only_past_start() {
        // Enclosing node (0, 10) around a rewrite at start=4: only its end
        // moves. A disjoint right node moves entirely.
        let mut nodes = vec![Node::new(0, 10), Node::new(12, 14)];
        translate_nodes(&mut nodes, 4, -3);
        assert_eq!((nodes[0].start, nodes[0].end), (0, 7));
        assert_eq!((nodes[1].start, nodes[1].end), (9, 11));
    }

    #[test]
    fn translate_leaves_earlier_nodes_alone() {
        let mut nodes = vec![Node::new(0, 2)];
        translate_nodes(&mut nodes, 4, 5);
        assert_eq!((nodes[0].start, nodes[0].end), (0, 2));
    }

    #[test]
    fn workload_accumulates_and_trips() {
        assert!(matches!(check_workload(None, 0, "xxxx"), Ok(0)));
        let total = check_workload(Some(10), 0, "xxxx").unwrap();
        assert_eq!(total, 4);
        let total = check_workload(Some(10), total, "xxxx").unwrap();
        assert_eq!(total, 8);
        match check_workload(Some(10), total, "xxxx") {
            Err(SolveFailure::Workload { attempted, budget }) => {
                assert_eq!(attempted, 12);
                assert_eq!(budget, 10);
            }
            _ => panic!("expected workload failure"),
        }
    }

    #[test]
    fn workload_counts_characters_not_bytes() {
        // Four three-byte characters are four characters of work.
        assert!(check_workload(Some(4), 0, "€€€€").is_ok());
    }

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let err = collect_block_names([&["a", "b"][..], &["B"][..]].into_iter()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateBlockName(name) if name == "b"));
    }

    #[test]
    fn preset_body_is_not_overridden() {
        let response = Response {
            body: Some(" fixed ".to_string()),
            ..Response::default()
        };
        let response = finish_response(response, "ignored".to_string());
        assert_eq!(response.body.as_deref(), Some("fixed"));
    }
}
