use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on the number of characters scanned inside one block.
///
/// Content past the cap is silently ignored by the parser. This bounds the
/// work done on adversarial input; it is not an error.
pub const DEFAULT_VERB_LIMIT: usize = 2000;

/// The parsed `(declaration, parameter, payload)` triple of one bracketed block.
///
/// A block has the shape `{declaration(parameter):payload}` where both the
/// parenthesized parameter and the colon-prefixed payload are optional:
///
/// ```
/// use tagscript_engine::Verb;
///
/// let verb = Verb::parse("{embed(title):Hello}", 2000);
/// assert_eq!(verb.declaration, "embed");
/// assert_eq!(verb.parameter.as_deref(), Some("title"));
/// assert_eq!(verb.payload.as_deref(), Some("Hello"));
/// ```
///
/// Backslash escapes the following character so it is not interpreted as a
/// delimiter. The parser does **not** strip backslashes; unescaping is the
/// responsibility of whichever block consumes the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    /// The handler-selector text. Preserved case-sensitively; blocks compare
    /// it case-insensitively.
    pub declaration: String,
    /// Text inside the first top-level `(...)` following the declaration,
    /// exclusive of the parentheses. Absent when no balanced group exists at
    /// depth 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Text after the first unescaped `:` outside any parenthesized group,
    /// verbatim to the end of the block. Absent when no such colon exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Verb {
    /// Create a verb with only a declaration.
    pub fn new(declaration: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            parameter: None,
            payload: None,
        }
    }

    /// Parse the raw text of one block, including its enclosing braces.
    ///
    /// At most `limit` characters of the inner content are scanned; the rest
    /// is dropped. A single left-to-right pass tracks parenthesis depth and a
    /// backslash escape flag:
    ///
    /// - the first unescaped `:` at depth 0 ends the declaration (if still
    ///   open) and starts the payload, which runs verbatim to the end;
    /// - the first unescaped `(` ends the declaration and opens the parameter;
    ///   the `)` that returns the depth to 0 closes it;
    /// - a `(` that never closes leaves the parameter absent, with the
    ///   declaration already fixed at the text before it.
    pub fn parse(raw: &str, limit: usize) -> Self {
        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(raw);
        let content = truncate_chars(inner, limit);

        let mut escape = false;
        let mut depth = 0usize;
        let mut decl_end: Option<usize> = None;
        let mut param_open: Option<usize> = None;
        let mut parameter: Option<&str> = None;
        let mut payload_at: Option<usize> = None;

        for (i, ch) in content.char_indices() {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                ':' if depth == 0 => {
                    decl_end.get_or_insert(i);
                    payload_at = Some(i + 1);
                    break;
                }
                '(' => {
                    if depth == 0 {
                        decl_end.get_or_insert(i);
                        if parameter.is_none() && param_open.is_none() {
                            param_open = Some(i + 1);
                        }
                    }
                    depth += 1;
                }
                ')' if depth > 0 => {
                    depth -= 1;
                    if depth == 0
                        && let Some(open) = param_open.take()
                        && parameter.is_none()
                    {
                        parameter = Some(&content[open..i]);
                    }
                }
                _ => {}
            }
        }

        let declaration = &content[..decl_end.unwrap_or(content.len())];
        Self {
            declaration: declaration.to_string(),
            parameter: parameter.map(str::to_string),
            payload: payload_at.map(|p| content[p..].to_string()),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.declaration)?;
        if let Some(parameter) = &self.parameter {
            write!(f, "({parameter})")?;
        }
        if let Some(payload) = &self.payload {
            write!(f, ":{payload}")?;
        }
        write!(f, "}}")
    }
}

/// Longest prefix of `s` holding at most `limit` characters.
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
