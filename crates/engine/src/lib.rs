//! TagScript templating engine.
//!
//! Interprets brace-delimited directives embedded in a text document, the
//! kind used to render dynamic bot responses. The main entry points are
//! [`Interpreter`] (and its async dual [`AsyncInterpreter`]) built over an
//! ordered chain of [`Block`] handlers:
//!
//! ```
//! use tagscript_engine::{AssignmentBlock, Interpreter, LooseVariableGetterBlock};
//!
//! let interpreter = Interpreter::new(vec![
//!     Box::new(AssignmentBlock),
//!     Box::new(LooseVariableGetterBlock),
//! ])
//! .unwrap();
//!
//! let response = interpreter.process("{=(user):Ada}Hello {user}!").unwrap();
//! assert_eq!(response.body.as_deref(), Some("Hello Ada!"));
//! ```
//!
//! A pass scans the document once for balanced `{...}` regions, then resolves
//! them in closing-brace order (innermost first), rewriting the document in
//! place and translating the remaining coordinates after each rewrite. Blocks
//! that decline leave their braces untouched in the final text.

#![warn(missing_docs)]

pub mod adapter;
pub mod block;
pub mod error;
pub mod interpreter;
/// Node scanning over a whole document.
pub mod node;
pub mod response;
/// Verb parsing for one bracketed block.
pub mod verb;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the common entry points. The full module paths remain
// available for less common types.

// Interpreter
pub use interpreter::{AsyncInterpreter, Interpreter, ProcessOptions};

// Capability model
pub use block::{AsyncBlock, Block, BlockResult};
pub use block::require::{RequireShape, Requirement};

// Built-in blocks
pub use block::shorthand::ShorthandRedirectBlock;
pub use block::stop::StopBlock;
pub use block::variables::{AssignmentBlock, LooseVariableGetterBlock};

// Adapters
pub use adapter::{Adapter, IntAdapter, StringAdapter};

// Scanner and verb parser
pub use node::{Node, scan_nodes};
pub use verb::{DEFAULT_VERB_LIMIT, Verb};

// Response plumbing
pub use response::{AdapterMap, Context, Response};

// Errors
pub use error::{BlockError, BoxedError, EngineError};
