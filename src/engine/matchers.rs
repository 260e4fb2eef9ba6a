//! # Primitive Matchers
//!
//! Single-byte recognizers built directly on the [`Cursor`]: a literal byte,
//! a byte class, an exact string, emptiness, and end of input. Everything
//! larger is composed from these by the combinators.
//!
//! On failure a matcher leaves the cursor wherever it stopped; it never
//! restores state on its own. That discipline is deliberate — it lets
//! callers report how far a match got — and it means any caller that needs
//! a clean position after failure must wrap the matcher in
//! [`attempt`](super::prelude::attempt).

use std::marker::PhantomData;

use super::core::{Parse, ParseError, ParseResult, RuleTag};
use crate::cursor::Cursor;
use crate::tree::ParseTree;

/// LiteralChar: matches one specific byte and emits it as a raw fragment.
#[derive(Clone)]
pub struct LiteralChar<T> {
    expected: u8,
    _phantom: PhantomData<T>,
}

impl<T> LiteralChar<T> {
    /// Creates a matcher for the byte `expected`.
    pub fn new(expected: u8) -> Self {
        Self {
            expected,
            _phantom: PhantomData,
        }
    }
}

impl<T: RuleTag> Parse<T> for LiteralChar<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let position = cursor.position();
        let line = cursor.line();
        match cursor.advance() {
            Some(found) if found == self.expected => {
                Ok(vec![ParseTree::raw((found as char).to_string())])
            }
            Some(found) => Err(ParseError::Unexpected {
                expected: format!("{:?}", self.expected as char),
                found: found as char,
                position,
                line,
            }),
            None => Err(ParseError::UnexpectedEof { position, line }),
        }
    }
}

/// CharClass: matches one byte satisfying a predicate and emits it as a raw
/// fragment. Used for letters, digits, whitespace, and negated classes.
#[derive(Clone)]
pub struct CharClass<T, F> {
    pred: F,
    expected: &'static str,
    _phantom: PhantomData<T>,
}

impl<T, F> CharClass<T, F> {
    /// Creates a matcher for bytes satisfying `pred`. `expected` names the
    /// class for error reporting ("letter", "digit", ...).
    pub fn new(pred: F, expected: &'static str) -> Self {
        Self {
            pred,
            expected,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> Parse<T> for CharClass<T, F>
where
    T: RuleTag,
    F: Fn(u8) -> bool,
{
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let position = cursor.position();
        let line = cursor.line();
        match cursor.advance() {
            Some(found) if (self.pred)(found) => {
                Ok(vec![ParseTree::raw((found as char).to_string())])
            }
            Some(found) => Err(ParseError::Unexpected {
                expected: self.expected.to_string(),
                found: found as char,
                position,
                line,
            }),
            None => Err(ParseError::UnexpectedEof { position, line }),
        }
    }
}

/// ExactString: matches a literal string byte by byte and emits it as one
/// raw fragment.
///
/// On mismatch the error carries the prefix that did match, and the cursor
/// is left after the last byte examined. The partial consumption is an
/// explicit part of the contract: wrap in
/// [`attempt`](super::prelude::attempt) when a clean restore is needed.
#[derive(Clone)]
pub struct ExactString<T> {
    literal: String,
    _phantom: PhantomData<T>,
}

impl<T> ExactString<T> {
    /// Creates a matcher for `literal`.
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            _phantom: PhantomData,
        }
    }
}

impl<T: RuleTag> Parse<T> for ExactString<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let mut matched = String::new();
        for &expected in self.literal.as_bytes() {
            let position = cursor.position();
            let line = cursor.line();
            match cursor.advance() {
                Some(found) if found == expected => matched.push(found as char),
                _ => {
                    return Err(ParseError::LiteralMismatch {
                        literal: self.literal.clone(),
                        matched,
                        position,
                        line,
                    });
                }
            }
        }
        Ok(vec![ParseTree::raw(matched)])
    }
}

/// Empty: consumes nothing, always succeeds, emits no nodes. The terminal
/// alternative of optional and list productions.
#[derive(Clone)]
pub struct Empty<T> {
    _phantom: PhantomData<T>,
}

impl<T> Empty<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for Empty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RuleTag> Parse<T> for Empty<T> {
    fn parse(&self, _cursor: &mut Cursor) -> ParseResult<T> {
        Ok(Vec::new())
    }
}

/// EndOfInput: succeeds only when the cursor has consumed the whole buffer,
/// emitting no nodes.
///
/// The cursor has no peek, so the check is a probe: advance once and restore
/// the mark if a byte was there.
#[derive(Clone)]
pub struct EndOfInput<T> {
    _phantom: PhantomData<T>,
}

impl<T> EndOfInput<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for EndOfInput<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RuleTag> Parse<T> for EndOfInput<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let marker = cursor.mark();
        match cursor.advance() {
            None => Ok(Vec::new()),
            Some(found) => {
                let error = ParseError::Unexpected {
                    expected: "end of input".to_string(),
                    found: found as char,
                    position: marker.position(),
                    line: marker.line(),
                };
                cursor.reset(marker);
                Err(error)
            }
        }
    }
}
