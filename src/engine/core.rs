//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface and error type that
//! the rest of the engine builds on.

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use thiserror::Error;

use crate::cursor::Cursor;
use crate::tree::ParseTree;

/// Bound alias for grammar tag types: small copyable identifiers usable as
/// cache keys and stamped into tree nodes.
pub trait RuleTag: Copy + Eq + Hash + Debug + 'static {}

impl<T> RuleTag for T where T: Copy + Eq + Hash + Debug + 'static {}

/// Parse trait defines the core parsing interface.
///
/// A parser is a reusable, stateless value: it reads and advances the cursor
/// and returns the ordered list of tree nodes it matched. All scan state
/// lives in the [`Cursor`]; two parsers built from the same combinator
/// expression are interchangeable.
pub trait Parse<T> {
    /// Attempts to match at the cursor's current position.
    ///
    /// On failure the cursor is left wherever the failing matcher stopped —
    /// restoring it is the job of [`Attempt`](super::combinators::Attempt)
    /// and the combinators built on it, never of the failing parser itself.
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T>;
}

/// Result type for parsing operations: the matched nodes in left-to-right
/// order, or a [`ParseError`].
pub type ParseResult<T> = Result<Vec<ParseTree<T>>, ParseError>;

/// Shared handle to a parser. Combinators hold their children through this,
/// and the rule registry hands out clones of it, so one constructed rule can
/// be referenced from many call sites.
pub type ParserRef<T> = Rc<dyn Parse<T>>;

/// Error type for parsing operations.
///
/// A parse attempt only ever succeeds or fails locally; any enclosing
/// `attempt`/`first_of` can recover a failure, and it becomes a hard stop
/// only when it propagates out of the top-level rule. Every variant carries
/// the byte position and line where matching stopped, for "parsed up to
/// here" reporting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input ran out where a matcher needed another byte.
    #[error("unexpected end of input at byte {position}, line {line}")]
    UnexpectedEof { position: usize, line: usize },

    /// A single-byte matcher saw something else.
    #[error("expected {expected}, found {found:?} at byte {position}, line {line}")]
    Unexpected {
        expected: String,
        found: char,
        position: usize,
        line: usize,
    },

    /// An exact-string matcher stopped partway through its literal.
    /// `matched` is the prefix that did match, surfaced for diagnostics.
    #[error("expected {literal:?}, matched only {matched:?} at byte {position}, line {line}")]
    LiteralMismatch {
        literal: String,
        matched: String,
        position: usize,
        line: usize,
    },

    /// Every alternative of a `first_of` failed.
    #[error("no alternative matched at byte {position}, line {line}")]
    NoAlternative { position: usize, line: usize },

    /// A recursive rule was run while its builder was still executing. This
    /// is a programming contract violation, not a parse-time condition:
    /// rule builders must only construct parsers, never run them.
    #[error("recursive rule {rule:?} ran during its own construction at byte {position}, line {line}")]
    UnresolvedRule {
        rule: String,
        position: usize,
        line: usize,
    },
}

impl ParseError {
    /// The byte offset where matching stopped.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedEof { position, .. } => *position,
            ParseError::Unexpected { position, .. } => *position,
            ParseError::LiteralMismatch { position, .. } => *position,
            ParseError::NoAlternative { position, .. } => *position,
            ParseError::UnresolvedRule { position, .. } => *position,
        }
    }

    /// The line where matching stopped.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedEof { line, .. } => *line,
            ParseError::Unexpected { line, .. } => *line,
            ParseError::LiteralMismatch { line, .. } => *line,
            ParseError::NoAlternative { line, .. } => *line,
            ParseError::UnresolvedRule { line, .. } => *line,
        }
    }
}
