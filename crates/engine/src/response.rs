//! The mutable accumulator threaded through one interpretation pass, and the
//! ephemeral per-node view handed to blocks.

use crate::adapter::Adapter;
use crate::verb::Verb;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Variable name to value adapter.
pub type AdapterMap = HashMap<String, Box<dyn Adapter>>;

/// The single mutable result object for one interpretation pass.
#[derive(Debug, Default)]
pub struct Response {
    /// The final text. Set exactly once from the fully rewritten document,
    /// trimmed of surrounding whitespace. A block may pre-empt it by setting
    /// it directly before raising a stop signal; the interpreter never
    /// overrides a body that is already present.
    pub body: Option<String>,
    /// Insertion-ordered mapping from action name to block-defined value
    /// (post-processing instructions such as "delete the invoking message").
    /// Blocks read-modify-write this collaboratively.
    pub actions: IndexMap<String, Value>,
    /// Variables created by assignment blocks and seeded by the caller,
    /// consulted by lookup blocks. Lives for the whole pass.
    pub variables: AdapterMap,
    /// Caller-seeded side-channel values. Read-only by convention.
    pub extras: IndexMap<String, Value>,
}

impl Response {
    /// Build a response seeded with the caller's variables and extras.
    pub(crate) fn new(variables: AdapterMap, extras: IndexMap<String, Value>) -> Self {
        Self {
            body: None,
            actions: IndexMap::new(),
            variables,
            extras,
        }
    }

    /// Record a post-processing action, replacing any previous value while
    /// keeping the original insertion position.
    pub fn set_action(&mut self, name: impl Into<String>, value: Value) {
        self.actions.insert(name.into(), value);
    }

    /// Bind a variable for the remainder of the pass.
    pub fn set_variable(&mut self, name: impl Into<String>, adapter: Box<dyn Adapter>) {
        self.variables.insert(name.into(), adapter);
    }
}

/// The per-node view a block processes.
///
/// Built fresh for every node immediately before dispatch, after the node's
/// substring has been re-read from the current document snapshot.
#[derive(Debug)]
pub struct Context<'a> {
    /// The active verb. Replaced in place when a block redirects.
    pub verb: Verb,
    /// The shared response for this pass.
    pub response: &'a mut Response,
    /// The untouched original document, for blocks needing pristine source.
    pub original_message: &'a str,
    /// Every accepted name registered with the interpreter, lowercased.
    /// Lets blocks avoid colliding with a claimed name (see
    /// [`Context::is_claimed_name`]).
    pub block_names: &'a [String],
}

impl Context<'_> {
    /// Whether `name` is claimed by any registered block (case-insensitive).
    pub fn is_claimed_name(&self, name: &str) -> bool {
        self.block_names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}
