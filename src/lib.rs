//! # Tsumugi
//!
//! A character-level parser-combinator library with an explicit cursor and
//! a span-stamped parse tree, plus a small imperative-language grammar
//! built on it.
//!
//! Parsers are values: primitive matchers recognize single bytes or literal
//! strings, combinators compose them into sequences, choices and
//! repetitions, and [`engine::Specify`] turns a combinator into a named
//! grammar rule that emits one tagged tree node. All scan state lives in a
//! [`Cursor`] threaded through every parse call, and backtracking is a
//! mark/reset pair — nothing is hidden in the parsers themselves.
//!
//! ```ignore
//! use std::rc::Rc;
//! use tsumugi::{Cursor, RuleRegistry};
//! use tsumugi::grammar::{self, NodeType};
//!
//! let registry = Rc::new(RuleRegistry::new());
//! let program = grammar::program(&registry);
//! let mut cursor = Cursor::new("x = 1 + 2 * 3");
//! let trees = program.parse(&mut cursor)?;
//! # Ok::<(), tsumugi::ParseError>(())
//! ```

pub mod cursor;
pub mod engine;
pub mod grammar;
pub mod tree;

pub use cursor::{Cursor, Marker};
pub use engine::{Parse, ParseError, ParseResult, ParserRef, RuleRegistry, RuleTag};
pub use tree::{ParseTree, Span};
