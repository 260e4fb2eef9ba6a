//! # Engine Prelude
//!
//! Free-function constructors for every matcher and combinator, all
//! returning [`ParserRef`] so grammar code composes parsers without naming
//! the concrete structs. Grammar modules import this wholesale:
//!
//! ```ignore
//! use crate::engine::prelude::*;
//!
//! let keyword = skip(exact_string("for"));
//! let word = repeat1(letter());
//! ```

use std::rc::Rc;

use super::combinators::{Attempt, Between, FirstOf, Optional, Repeat0, Repeat1, Sequence, Skip};
use super::core::{ParserRef, RuleTag};
use super::matchers::{CharClass, Empty, EndOfInput, ExactString, LiteralChar};
use super::specify::Infix;

/// Matches exactly the byte `c`.
pub fn character<T: RuleTag>(c: char) -> ParserRef<T> {
    Rc::new(LiteralChar::new(c as u8))
}

/// Matches one ASCII letter.
pub fn letter<T: RuleTag>() -> ParserRef<T> {
    Rc::new(CharClass::new(|b: u8| b.is_ascii_alphabetic(), "letter"))
}

/// Matches one ASCII digit.
pub fn digit<T: RuleTag>() -> ParserRef<T> {
    Rc::new(CharClass::new(|b: u8| b.is_ascii_digit(), "digit"))
}

/// Matches one whitespace byte (space, tab, newline, carriage return).
pub fn whitespace_char<T: RuleTag>() -> ParserRef<T> {
    Rc::new(CharClass::new(
        |b: u8| b.is_ascii_whitespace(),
        "whitespace",
    ))
}

/// Matches any single byte except `c`.
pub fn any_char_but<T: RuleTag>(c: char) -> ParserRef<T> {
    let excluded = c as u8;
    Rc::new(CharClass::new(
        move |b: u8| b != excluded,
        "any other character",
    ))
}

/// Matches one byte satisfying `pred`; `expected` names the class for
/// error reporting.
pub fn char_class<T: RuleTag>(
    pred: impl Fn(u8) -> bool + 'static,
    expected: &'static str,
) -> ParserRef<T> {
    Rc::new(CharClass::new(pred, expected))
}

/// Matches the literal string `s` byte by byte.
pub fn exact_string<T: RuleTag>(s: impl Into<String>) -> ParserRef<T> {
    Rc::new(ExactString::new(s))
}

/// Consumes nothing and always succeeds with no output.
pub fn empty<T: RuleTag>() -> ParserRef<T> {
    Rc::new(Empty::new())
}

/// Succeeds only when the whole input has been consumed.
pub fn end_of_input<T: RuleTag>() -> ParserRef<T> {
    Rc::new(EndOfInput::new())
}

/// Restores the cursor when `inner` fails.
pub fn attempt<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    Rc::new(Attempt::new(inner))
}

/// Runs `parsers` in order, merging their output.
pub fn sequence<T: RuleTag>(parsers: Vec<ParserRef<T>>) -> ParserRef<T> {
    Rc::new(Sequence::new(parsers))
}

/// Tries `alternatives` left to right, returning the first success. The
/// alternatives run as given; prefer [`try_first_of`] when they may share
/// a prefix.
pub fn first_of<T: RuleTag>(alternatives: Vec<ParserRef<T>>) -> ParserRef<T> {
    Rc::new(FirstOf::new(alternatives))
}

/// [`first_of`] with every alternative wrapped in [`attempt`], so a failing
/// alternative never leaks consumption into the next one.
pub fn try_first_of<T: RuleTag>(alternatives: Vec<ParserRef<T>>) -> ParserRef<T> {
    let protected = alternatives.into_iter().map(attempt).collect();
    Rc::new(FirstOf::new(protected))
}

/// Applies `inner` zero or more times.
pub fn repeat0<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    Rc::new(Repeat0::new(inner))
}

/// Applies `inner` one or more times.
pub fn repeat1<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    Rc::new(Repeat1::new(inner))
}

/// Runs `inner`, turning a failure into an empty success with the cursor
/// restored.
pub fn optional<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    Rc::new(Optional::new(inner))
}

/// Runs `inner` and discards its output, keeping its failure.
pub fn skip<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    Rc::new(Skip::new(inner))
}

/// Matches and discards the single byte `c`.
pub fn skip_char<T: RuleTag>(c: char) -> ParserRef<T> {
    skip(character(c))
}

/// Consumes and discards any run of whitespace, including none.
pub fn whitespace_run<T: RuleTag>() -> ParserRef<T> {
    skip(repeat0(whitespace_char()))
}

/// Left-factored binary operator: parses `left` once, then tries each
/// `(tag, tail)` pair in order. A matching tail wraps both sides in a node
/// carrying that tag; when no tail matches, `left`'s output passes through
/// unchanged.
pub fn infix<T: RuleTag>(left: ParserRef<T>, tails: Vec<(T, ParserRef<T>)>) -> ParserRef<T> {
    Rc::new(Infix::new(left, tails))
}

/// Runs `left`, `inner`, `right` in order and returns only `inner`'s
/// output.
pub fn between<T: RuleTag>(
    left: ParserRef<T>,
    inner: ParserRef<T>,
    right: ParserRef<T>,
) -> ParserRef<T> {
    Rc::new(Between::new(left, inner, right))
}

/// `inner` with surrounding whitespace discarded.
pub fn trim<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    between(whitespace_run(), inner, whitespace_run())
}

/// `inner` wrapped in parentheses, with whitespace allowed inside the
/// delimiters.
pub fn parens<T: RuleTag>(inner: ParserRef<T>) -> ParserRef<T> {
    between(
        sequence(vec![skip_char('('), whitespace_run()]),
        inner,
        sequence(vec![whitespace_run(), skip_char(')')]),
    )
}
