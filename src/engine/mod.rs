//! # Parsing Engine
//!
//! The grammar-independent half of the crate: the parser interface, the
//! primitive matchers, the combinator algebra, the tree synthesizer, and
//! the rule registry. A grammar is written entirely in terms of this
//! module's constructors and a registry; the engine never knows what the
//! grammar's tags mean.
//!
//! ## Layers
//!
//! - [`core`] — the [`Parse`] trait, [`ParseResult`], [`ParseError`]
//! - [`matchers`] — single-byte and literal recognizers
//! - [`combinators`] — sequencing, choice, repetition, backtracking
//! - [`specify`] — tagging matched output as named grammar rules
//! - [`registry`] — per-grammar rule cache and recursion breaker
//! - [`prelude`] — free-function constructors for all of the above

pub mod combinators;
pub mod core;
pub mod matchers;
pub mod prelude;
pub mod registry;
pub mod specify;

pub use self::core::{Parse, ParseError, ParseResult, ParserRef, RuleTag};
pub use self::registry::RuleRegistry;
pub use self::specify::{Infix, Specify};
