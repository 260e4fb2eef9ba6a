//! # Parser Combinators
//!
//! Higher-order parsers that compose matchers and other combinators into
//! larger parsers without inspecting grammar semantics: backtracking,
//! sequencing, ordered choice, repetition, optionality, skipping, and
//! bracketing.
//!
//! ## Backtracking contract
//!
//! [`Attempt`] is the only combinator that guarantees no partial consumption
//! survives a failed sub-parse. [`Sequence`] stops at the first failing
//! child and leaves the cursor where that failure occurred; callers needing
//! atomic failure wrap the whole sequence in `Attempt`. [`FirstOf`] tries
//! alternatives as given — wrap each in `Attempt` (the `try_first_of`
//! constructor does this) whenever alternatives share a prefix.
//!
//! ## Node-list merging
//!
//! When a sequencing or repetition combinator appends a child's output to
//! its accumulator, adjacent untagged raw fragments are spliced into a
//! single fragment; anything else is appended as a new sibling. The splice
//! is what lets single-byte matchers compose into one identifier leaf while
//! nested typed rules stay distinct children.

use tracing::trace;

use super::core::{Parse, ParseError, ParseResult, ParserRef, RuleTag};
use crate::cursor::Cursor;
use crate::tree::ParseTree;

/// Appends `incoming` to `accumulated` under the merge rule: an incoming raw
/// fragment is spliced onto a trailing raw fragment, everything else becomes
/// a new sibling.
pub(crate) fn merge_nodes<T>(accumulated: &mut Vec<ParseTree<T>>, incoming: Vec<ParseTree<T>>) {
    for node in incoming {
        if let ParseTree::Leaf {
            tag: None, text, ..
        } = &node
        {
            if let Some(ParseTree::Leaf {
                tag: None,
                text: last,
                ..
            }) = accumulated.last_mut()
            {
                last.push_str(text);
                continue;
            }
        }
        accumulated.push(node);
    }
}

/// Attempt: runs the inner parser against a snapshot of the cursor; on
/// failure the snapshot is restored before the failure propagates, on
/// success the state passes through unchanged.
pub struct Attempt<T> {
    inner: ParserRef<T>,
}

impl<T> Attempt<T> {
    pub fn new(inner: ParserRef<T>) -> Self {
        Self { inner }
    }
}

impl<T: RuleTag> Parse<T> for Attempt<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let marker = cursor.mark();
        match self.inner.parse(cursor) {
            Ok(nodes) => Ok(nodes),
            Err(error) => {
                cursor.reset(marker);
                Err(error)
            }
        }
    }
}

/// Sequence: runs each child in order and merges their node lists.
///
/// Fails at the first failing child, leaving the cursor wherever that
/// failure occurred; the sequence itself never backtracks.
pub struct Sequence<T> {
    parsers: Vec<ParserRef<T>>,
}

impl<T> Sequence<T> {
    pub fn new(parsers: Vec<ParserRef<T>>) -> Self {
        Self { parsers }
    }
}

impl<T: RuleTag> Parse<T> for Sequence<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let mut nodes = Vec::new();
        for parser in &self.parsers {
            let out = parser.parse(cursor)?;
            merge_nodes(&mut nodes, out);
        }
        Ok(nodes)
    }
}

/// FirstOf: tries alternatives left to right and returns the first success.
///
/// Strictly first-match: grammar order encodes precedence, and a succeeding
/// earlier alternative is returned even if a later one would also match.
/// Alternatives are run as given; a failing alternative that consumed input
/// leaves that consumption in place unless it was wrapped in [`Attempt`].
pub struct FirstOf<T> {
    alternatives: Vec<ParserRef<T>>,
}

impl<T> FirstOf<T> {
    pub fn new(alternatives: Vec<ParserRef<T>>) -> Self {
        Self { alternatives }
    }
}

impl<T: RuleTag> Parse<T> for FirstOf<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        for alternative in &self.alternatives {
            if let Ok(nodes) = alternative.parse(cursor) {
                return Ok(nodes);
            }
        }
        Err(ParseError::NoAlternative {
            position: cursor.position(),
            line: cursor.line(),
        })
    }
}

/// Repeat0: applies the inner parser zero or more times, each round under a
/// snapshot, and merges the accumulated output. Always succeeds.
pub struct Repeat0<T> {
    inner: ParserRef<T>,
}

impl<T> Repeat0<T> {
    pub fn new(inner: ParserRef<T>) -> Self {
        Self { inner }
    }
}

impl<T: RuleTag> Parse<T> for Repeat0<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let mut nodes = Vec::new();
        collect_rounds(&self.inner, cursor, &mut nodes);
        Ok(nodes)
    }
}

/// Repeat1: like [`Repeat0`] but the first round runs unprotected and its
/// failure propagates, so at least one match is required.
pub struct Repeat1<T> {
    inner: ParserRef<T>,
}

impl<T> Repeat1<T> {
    pub fn new(inner: ParserRef<T>) -> Self {
        Self { inner }
    }
}

impl<T: RuleTag> Parse<T> for Repeat1<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let mut nodes = Vec::new();
        let first = self.inner.parse(cursor)?;
        merge_nodes(&mut nodes, first);
        collect_rounds(&self.inner, cursor, &mut nodes);
        Ok(nodes)
    }
}

/// Shared repetition loop: snapshot, run, merge; stop on the first failure
/// or on a round that consumed nothing (which would otherwise repeat
/// forever).
fn collect_rounds<T: RuleTag>(
    inner: &ParserRef<T>,
    cursor: &mut Cursor,
    nodes: &mut Vec<ParseTree<T>>,
) {
    loop {
        let marker = cursor.mark();
        match inner.parse(cursor) {
            Ok(out) => {
                if cursor.position() == marker.position() {
                    trace!(
                        target: "tsumugi::repeat",
                        position = cursor.position(),
                        collected = nodes.len(),
                        "repetition stopped: round consumed no input"
                    );
                    break;
                }
                merge_nodes(nodes, out);
            }
            Err(error) => {
                cursor.reset(marker);
                trace!(
                    target: "tsumugi::repeat",
                    %error,
                    position = cursor.position(),
                    collected = nodes.len(),
                    "repetition stopped collecting"
                );
                break;
            }
        }
    }
}

/// Optional: runs the inner parser under a snapshot; a failure is restored
/// and reported as a successful empty match.
pub struct Optional<T> {
    inner: ParserRef<T>,
}

impl<T> Optional<T> {
    pub fn new(inner: ParserRef<T>) -> Self {
        Self { inner }
    }
}

impl<T: RuleTag> Parse<T> for Optional<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let marker = cursor.mark();
        match self.inner.parse(cursor) {
            Ok(nodes) => Ok(nodes),
            Err(error) => {
                cursor.reset(marker);
                trace!(
                    target: "tsumugi::optional",
                    %error,
                    position = cursor.position(),
                    "optional match suppressed a failure"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Skip: runs the inner parser and discards its node output, while still
/// failing if it fails. Drops keywords and punctuation from the tree while
/// enforcing their presence.
pub struct Skip<T> {
    inner: ParserRef<T>,
}

impl<T> Skip<T> {
    pub fn new(inner: ParserRef<T>) -> Self {
        Self { inner }
    }
}

impl<T: RuleTag> Parse<T> for Skip<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        self.inner.parse(cursor)?;
        Ok(Vec::new())
    }
}

/// Between: matches the left delimiter, the content, then the right
/// delimiter, returning only the content's nodes. Fails at the first
/// failing part, without backtracking.
pub struct Between<T> {
    left: ParserRef<T>,
    inner: ParserRef<T>,
    right: ParserRef<T>,
}

impl<T> Between<T> {
    pub fn new(left: ParserRef<T>, inner: ParserRef<T>, right: ParserRef<T>) -> Self {
        Self { left, inner, right }
    }
}

impl<T: RuleTag> Parse<T> for Between<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        self.left.parse(cursor)?;
        let nodes = self.inner.parse(cursor)?;
        self.right.parse(cursor)?;
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::super::prelude::*;
    use super::*;

    #[test]
    fn test_merge_splices_adjacent_raw_fragments() {
        let mut accumulated: Vec<ParseTree<u32>> = vec![ParseTree::raw("a")];
        merge_nodes(&mut accumulated, vec![ParseTree::raw("b"), ParseTree::raw("c")]);
        assert_eq!(accumulated, vec![ParseTree::raw("abc")]);
    }

    #[test]
    fn test_merge_keeps_typed_nodes_as_siblings() {
        let typed = ParseTree::Leaf {
            tag: Some(7u32),
            text: "x".to_string(),
            span: Default::default(),
        };
        let mut accumulated: Vec<ParseTree<u32>> = vec![ParseTree::raw("a")];
        merge_nodes(&mut accumulated, vec![typed.clone(), ParseTree::raw("b")]);
        assert_eq!(
            accumulated,
            vec![ParseTree::raw("a"), typed, ParseTree::raw("b")]
        );
    }

    #[test]
    fn test_attempt_restores_on_failure() {
        let parser: ParserRef<u32> = attempt(exact_string("false"));
        let mut cursor = Cursor::new("fallen");
        assert!(parser.parse(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn test_attempt_passes_success_through() {
        let parser: ParserRef<u32> = attempt(exact_string("fall"));
        let mut cursor = Cursor::new("fallen");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("fall")]);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_sequence_merges_and_fails_in_place() {
        let parser: ParserRef<u32> = sequence(vec![letter(), letter(), digit()]);
        let mut cursor = Cursor::new("ab1");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("ab1")]);

        let mut cursor = Cursor::new("abc");
        assert!(parser.parse(&mut cursor).is_err());
        // The failing byte was consumed and nothing was restored.
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_first_of_is_left_biased() {
        let parser: ParserRef<u32> = first_of(vec![exact_string("fo"), exact_string("for")]);
        let mut cursor = Cursor::new("for");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("fo")]);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_try_first_of_restores_between_alternatives() {
        // Both alternatives share the prefix "fa"; without per-alternative
        // snapshots the second could never match.
        let parser: ParserRef<u32> = try_first_of(vec![
            exact_string("false"),
            exact_string("fallen"),
        ]);
        let mut cursor = Cursor::new("fallen");
        assert_eq!(
            parser.parse(&mut cursor).unwrap(),
            vec![ParseTree::raw("fallen")]
        );
    }

    #[test]
    fn test_first_of_reports_no_alternative() {
        let parser: ParserRef<u32> = try_first_of(vec![digit(), letter()]);
        let mut cursor = Cursor::new("!");
        assert_eq!(
            parser.parse(&mut cursor),
            Err(ParseError::NoAlternative {
                position: 0,
                line: 1
            })
        );
    }

    #[test]
    fn test_repeat0_zero_matches_is_success() {
        let parser: ParserRef<u32> = repeat0(digit());
        let mut cursor = Cursor::new("abc");
        assert_eq!(parser.parse(&mut cursor).unwrap(), Vec::new());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_repeat0_splices_rounds() {
        let parser: ParserRef<u32> = repeat0(digit());
        let mut cursor = Cursor::new("123x");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("123")]);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_repeat0_stops_on_empty_round() {
        let parser: ParserRef<u32> = repeat0(empty());
        let mut cursor = Cursor::new("abc");
        assert_eq!(parser.parse(&mut cursor).unwrap(), Vec::new());
    }

    #[test]
    fn test_repeat1_requires_one_match() {
        let parser: ParserRef<u32> = repeat1(digit());
        let mut cursor = Cursor::new("7x");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("7")]);

        let mut cursor = Cursor::new("x");
        assert!(parser.parse(&mut cursor).is_err());
    }

    #[test]
    fn test_optional_suppresses_failure() {
        let parser: ParserRef<u32> = optional(exact_string("else"));
        let mut cursor = Cursor::new("end");
        assert_eq!(parser.parse(&mut cursor).unwrap(), Vec::new());
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new("else");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("else")]);
    }

    #[test]
    fn test_skip_discards_nodes_but_not_failure() {
        let parser: ParserRef<u32> = skip(exact_string("if"));
        let mut cursor = Cursor::new("if x");
        assert_eq!(parser.parse(&mut cursor).unwrap(), Vec::new());
        assert_eq!(cursor.position(), 2);

        let mut cursor = Cursor::new("of x");
        assert!(parser.parse(&mut cursor).is_err());
    }

    #[test]
    fn test_between_returns_only_the_content() {
        let parser: ParserRef<u32> = between(character('('), digit(), character(')'));
        let mut cursor = Cursor::new("(7)");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("7")]);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_trim_discards_surrounding_whitespace() {
        let parser: ParserRef<u32> = trim(exact_string("x"));
        let mut cursor = Cursor::new("  x \ny");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("x")]);
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn test_parens_skips_delimiters_and_inner_whitespace() {
        let parser: ParserRef<u32> = parens(digit());
        let mut cursor = Cursor::new("( 7 )");
        assert_eq!(parser.parse(&mut cursor).unwrap(), vec![ParseTree::raw("7")]);
        assert!(cursor.at_end());
    }
}
