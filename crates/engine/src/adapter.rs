//! Value adapters: pluggable holders of named values.
//!
//! An [`Adapter`] is stored in [`Response::variables`](crate::Response) and
//! queried by lookup blocks with the verb that referenced the variable, so a
//! template can select sub-parts of a value (`{args(2)}` is the second word
//! of the `args` string).

use crate::verb::Verb;
use std::fmt;

/// A pluggable holder of a named value.
pub trait Adapter: fmt::Debug + Send + Sync {
    /// Produce a textual representation of the value, or decline.
    ///
    /// `verb` is the verb that dereferenced the variable; its parameter and
    /// payload may select sub-parts of the value.
    fn get_value(&self, verb: &Verb) -> Option<String>;
}

/// Adapter over a plain string with word-index selection.
///
/// Without a parameter the whole string is returned. A numeric parameter
/// selects one word (1-based); `N+` selects from word N to the end and `+N`
/// from the start through word N. The payload, when present, overrides the
/// space delimiter used for splitting and joining. Any selection that cannot
/// be applied falls back to the whole string.
#[derive(Debug, Clone)]
pub struct StringAdapter {
    value: String,
}

impl StringAdapter {
    /// Wrap a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    fn select(&self, parameter: &str, payload: Option<&str>) -> Option<String> {
        let splitter = payload.unwrap_or(" ");
        let words: Vec<&str> = self.value.split(splitter).collect();
        if let Some(raw) = parameter.strip_prefix('+') {
            let index = word_index(raw, words.len())?;
            Some(words[..=index].join(splitter))
        } else if let Some(raw) = parameter.strip_suffix('+') {
            let index = word_index(raw, words.len())?;
            Some(words[index..].join(splitter))
        } else {
            let index = word_index(parameter, words.len())?;
            Some(words[index].to_string())
        }
    }
}

impl Adapter for StringAdapter {
    fn get_value(&self, verb: &Verb) -> Option<String> {
        let Some(parameter) = verb.parameter.as_deref() else {
            return Some(self.value.clone());
        };
        Some(
            self.select(parameter, verb.payload.as_deref())
                .unwrap_or_else(|| self.value.clone()),
        )
    }
}

/// 1-based word index to a bounds-checked 0-based index.
fn word_index(raw: &str, len: usize) -> Option<usize> {
    let n: usize = raw.trim().parse().ok()?;
    let index = n.checked_sub(1)?;
    (index < len).then_some(index)
}

/// Adapter over an integer value. Selectors are ignored.
#[derive(Debug, Clone, Copy)]
pub struct IntAdapter {
    value: i64,
}

impl IntAdapter {
    /// Wrap an integer value.
    pub fn new(value: i64) -> Self {
        Self { value }
    }
}

impl Adapter for IntAdapter {
    fn get_value(&self, _verb: &Verb) -> Option<String> {
        Some(self.value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verb::DEFAULT_VERB_LIMIT;

    fn value(adapter: &dyn Adapter, raw: &str) -> Option<String> {
        adapter.get_value(&Verb::parse(raw, DEFAULT_VERB_LIMIT))
    }

    #[test]
    fn string_without_parameter_returns_all() {
        let a = StringAdapter::new("alpha beta gamma");
        assert_eq!(value(&a, "{args}").as_deref(), Some("alpha beta gamma"));
    }

    #[test]
    fn string_word_selection() {
        let a = StringAdapter::new("alpha beta gamma");
        assert_eq!(value(&a, "{args(1)}").as_deref(), Some("alpha"));
        assert_eq!(value(&a, "{args(3)}").as_deref(), Some("gamma"));
    }

    #[test]
    fn string_tail_and_head_ranges() {
        let a = StringAdapter::new("alpha beta gamma");
        assert_eq!(value(&a, "{args(2+)}").as_deref(), Some("beta gamma"));
        assert_eq!(value(&a, "{args(+2)}").as_deref(), Some("alpha beta"));
    }

    #[test]
    fn string_custom_splitter_from_payload() {
        let a = StringAdapter::new("a,b,c");
        assert_eq!(value(&a, "{args(2):,}").as_deref(), Some("b"));
    }

    #[test]
    fn string_bad_selection_falls_back() {
        let a = StringAdapter::new("alpha beta");
        assert_eq!(value(&a, "{args(9)}").as_deref(), Some("alpha beta"));
        assert_eq!(value(&a, "{args(zero)}").as_deref(), Some("alpha beta"));
        assert_eq!(value(&a, "{args(0)}").as_deref(), Some("alpha beta"));
    }

    #[test]
    fn int_ignores_selectors() {
        let a = IntAdapter::new(42);
        assert_eq!(value(&a, "{n}").as_deref(), Some("42"));
        assert_eq!(value(&a, "{n(2)}").as_deref(), Some("42"));
    }
}
