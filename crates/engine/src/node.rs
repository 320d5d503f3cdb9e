use crate::verb::Verb;
use serde::Serialize;

/// One discovered bracketed region of a document.
///
/// `start` and `end` are byte offsets into the *current* document snapshot,
/// inclusive of the enclosing braces on both ends. They are created by
/// [`scan_nodes`] against the original text and then translated by the
/// interpreter as earlier rewrites change the document length.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Byte offset of the opening `{`.
    pub start: usize,
    /// Byte offset of the closing `}` (inclusive).
    pub end: usize,
    /// The parsed verb, populated immediately before the node is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,
    /// The resolved replacement text, or `None` if no block accepted the
    /// verb (the original braces then survive in the final output).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Node {
    /// Create an unresolved node covering `[start, end]`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            verb: None,
            output: None,
        }
    }
}

/// Find every balanced `{...}` region in `message`.
///
/// A single pass maintains a stack of unmatched `{` offsets. Each `}` pops the
/// most recent opener and emits a node; a `}` with no opener is ignored, and
/// openers still on the stack at the end of the scan are ignored too.
///
/// Nodes are emitted in the order their *closing* brace appears: innermost
/// first for nested blocks, left to right otherwise. The interpreter resolves
/// nodes in exactly this order, so a nested block is always substituted before
/// its enclosing block reads its own text. Callers must not re-sort the list.
pub fn scan_nodes(message: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut opens: Vec<usize> = Vec::new();
    for (i, b) in message.bytes().enumerate() {
        match b {
            b'{' => opens.push(i),
            b'}' => {
                if let Some(start) = opens.pop() {
                    nodes.push(Node::new(start, i));
                }
            }
            _ => {}
        }
    }
    nodes
}
