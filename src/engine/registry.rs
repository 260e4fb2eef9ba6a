//! # Rule Registry
//!
//! The registry is the engine's rule cache and recursion breaker. It is an
//! explicitly constructed, explicitly owned object — one per grammar — so
//! independent grammars and test runs never share state.
//!
//! It serves two jobs:
//!
//! * **Per-tag memoization of rules.** [`RuleRegistry::specify`] builds the
//!   tagged wrapper for a rule once and returns the same parser to every
//!   call site that asks for the same tag.
//! * **Breaking construction-time recursion.** Grammars are naturally
//!   self-referential: an expression reaches a parenthesized sub-expression,
//!   a block contains statements that contain blocks. If building a rule
//!   eagerly invoked its builder, and that builder referenced the same rule
//!   before returning, construction would never terminate.
//!   [`RuleRegistry::recursive`] instead registers a thin indirection parser
//!   per rule id; the builder runs the first time that indirection is *run*,
//!   exactly once, and every later run goes straight to the resolved parser.
//!
//! A rule slot moves through three states: unregistered, registering (the
//! indirection exists, its builder is still pending) and ready (the builder
//! has run and the concrete parser is cached). The transition happens at
//! first parse, never at registration — that ordering is what makes
//! mutually recursive rules safe to construct.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::core::{Parse, ParseError, ParseResult, ParserRef, RuleTag};
use super::specify::Specify;
use crate::cursor::Cursor;

type BuildFn<T> = Box<dyn Fn() -> ParserRef<T>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RuleKey<T> {
    /// A tagged rule wrapper, memoized per tag.
    Spec(T),
    /// The lazy indirection for a named recursive rule.
    Rule(String),
}

/// Process-lifetime cache of constructed parsers for one grammar.
///
/// Interior mutability keeps the construction API ergonomic: rule functions
/// take a shared handle and the registry fills lazily underneath them. The
/// cache is read-mostly once every rule has resolved; it is single-threaded
/// by design, like the rest of the engine.
pub struct RuleRegistry<T: RuleTag> {
    slots: RefCell<HashMap<RuleKey<T>, ParserRef<T>>>,
}

impl<T: RuleTag> RuleRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the tagged rule parser for `tag`, building it from `parser`
    /// on the first request. Later requests for the same tag return the
    /// first-built parser and drop their argument — the same tag may be
    /// reached from several alternative call sites, and all of them must
    /// share one instance.
    pub fn specify(&self, tag: T, parser: ParserRef<T>) -> ParserRef<T> {
        Rc::clone(
            self.slots
                .borrow_mut()
                .entry(RuleKey::Spec(tag))
                .or_insert_with(|| Rc::new(Specify::new(tag, parser)) as ParserRef<T>),
        )
    }

    /// Returns the indirection parser for the recursive rule `id`,
    /// registering it on first request.
    ///
    /// `build` is not called here. It runs the first time the returned
    /// parser is actually run, exactly once; the result is cached and all
    /// later runs delegate to it directly. `build` may itself request
    /// `recursive` for the same id (direct self-reference) or for other ids
    /// (mutual reference) — every such request resolves to an already
    /// registered indirection, never to an eager build.
    pub fn recursive<F>(&self, id: &str, build: F) -> ParserRef<T>
    where
        F: Fn() -> ParserRef<T> + 'static,
    {
        Rc::clone(
            self.slots
                .borrow_mut()
                .entry(RuleKey::Rule(id.to_string()))
                .or_insert_with(|| {
                    Rc::new(LazyRule {
                        id: id.to_string(),
                        build: RefCell::new(Some(Box::new(build) as BuildFn<T>)),
                        resolved: RefCell::new(None),
                    }) as ParserRef<T>
                }),
        )
    }
}

impl<T: RuleTag> Default for RuleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The indirection parser handed out by [`RuleRegistry::recursive`].
///
/// The resolved parser is cached inside the indirection itself; since the
/// registry guarantees one indirection per id, the cache is shared by every
/// call site of the rule. Resolution drops the builder, releasing whatever
/// the grammar's closure captured.
struct LazyRule<T> {
    id: String,
    build: RefCell<Option<BuildFn<T>>>,
    resolved: RefCell<Option<ParserRef<T>>>,
}

impl<T: RuleTag> Parse<T> for LazyRule<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        // Clone the handle out before recursing so no borrow is held while
        // the concrete parser (which may re-enter this indirection) runs.
        let cached = self.resolved.borrow().clone();
        let concrete = match cached {
            Some(parser) => parser,
            None => match self.build.borrow_mut().take() {
                Some(build) => {
                    debug!(
                        target: "tsumugi::registry",
                        rule = %self.id,
                        "resolving recursive rule on first run"
                    );
                    let parser = build();
                    *self.resolved.borrow_mut() = Some(Rc::clone(&parser));
                    parser
                }
                None => {
                    return Err(ParseError::UnresolvedRule {
                        rule: self.id.clone(),
                        position: cursor.position(),
                        line: cursor.line(),
                    });
                }
            },
        };
        concrete.parse(cursor)
    }
}
