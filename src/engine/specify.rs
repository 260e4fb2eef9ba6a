//! # Tree Synthesizer
//!
//! [`Specify`] turns a combinator into a grammar rule: it stamps a source
//! span around the match and wraps the output in a single tagged node.
//!
//! The leaf-vs-subtree decision is one branch, driven purely by the shape
//! of the wrapped parser's output and never by a per-rule declaration:
//!
//! * exactly one untagged raw fragment — the rule is lexical; the fragment's
//!   text becomes the tagged leaf's value;
//! * anything else (zero nodes, several nodes, or any typed node) — the
//!   rule is structural; the output list becomes the tagged node's children.

use tracing::trace;

use super::combinators::merge_nodes;
use super::core::{Parse, ParseResult, ParserRef, RuleTag};
use crate::cursor::Cursor;
use crate::tree::{ParseTree, Span};

/// The collapse policy shared by [`Specify`] and [`Infix`]: a single raw
/// fragment becomes a tagged leaf, anything else a tagged node.
fn synthesize<T: RuleTag>(tag: T, mut out: Vec<ParseTree<T>>, span: Span) -> ParseTree<T> {
    match out.pop() {
        Some(ParseTree::Leaf {
            tag: None, text, ..
        }) if out.is_empty() => ParseTree::Leaf {
            tag: Some(tag),
            text,
            span,
        },
        Some(other) => {
            out.push(other);
            ParseTree::Node {
                tag,
                children: out,
                span,
            }
        }
        None => ParseTree::Node {
            tag,
            children: out,
            span,
        },
    }
}

/// Tags the inner parser's output as a named grammar rule.
///
/// Constructed through [`RuleRegistry::specify`], which memoizes one
/// instance per tag so every call site for a rule shares the same parser.
///
/// [`RuleRegistry::specify`]: super::registry::RuleRegistry::specify
pub struct Specify<T> {
    tag: T,
    inner: ParserRef<T>,
}

impl<T> Specify<T> {
    pub fn new(tag: T, inner: ParserRef<T>) -> Self {
        Self { tag, inner }
    }
}

impl<T: RuleTag> Parse<T> for Specify<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let start = cursor.position();
        let start_line = cursor.line();
        let out = self.inner.parse(cursor)?;
        let span = Span {
            start,
            end: cursor.position(),
            start_line,
            end_line: cursor.line(),
        };
        Ok(vec![synthesize(self.tag, out, span)])
    }
}

/// Left-factored binary operator rule.
///
/// Parses the shared left operand exactly once, then probes each operator
/// tail in order against it. The first tail that matches combines the left
/// and tail output under that tail's tag; when no tail matches, the left
/// operand's output passes through untouched. A failed probe resets the
/// cursor, so tails never leak consumption into each other.
///
/// This is what keeps an operator-precedence ladder linear: alternatives
/// that share a left operand must not re-parse it per alternative, or a
/// parenthesized sub-expression gets re-entered once per failed arm at
/// every nesting level.
pub struct Infix<T> {
    left: ParserRef<T>,
    tails: Vec<(T, ParserRef<T>)>,
}

impl<T> Infix<T> {
    pub fn new(left: ParserRef<T>, tails: Vec<(T, ParserRef<T>)>) -> Self {
        Self { left, tails }
    }
}

impl<T: RuleTag> Parse<T> for Infix<T> {
    fn parse(&self, cursor: &mut Cursor) -> ParseResult<T> {
        let start = cursor.position();
        let start_line = cursor.line();
        let mut children = self.left.parse(cursor)?;
        for (tag, tail) in &self.tails {
            let marker = cursor.mark();
            match tail.parse(cursor) {
                Ok(right) => {
                    let mut combined = std::mem::take(&mut children);
                    merge_nodes(&mut combined, right);
                    let span = Span {
                        start,
                        end: cursor.position(),
                        start_line,
                        end_line: cursor.line(),
                    };
                    return Ok(vec![synthesize(*tag, combined, span)]);
                }
                Err(error) => {
                    cursor.reset(marker);
                    trace!(
                        target: "tsumugi::infix",
                        %error,
                        position = cursor.position(),
                        "operator tail did not match"
                    );
                }
            }
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::super::prelude::*;
    use super::*;
    use crate::engine::registry::RuleRegistry;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Tag {
        Word,
        Pair,
        Marker,
    }

    #[test]
    fn test_single_raw_fragment_collapses_to_tagged_leaf() {
        let parser = Specify::new(Tag::Word, sequence(vec![letter(), letter()]));
        let mut cursor = Cursor::new("ab");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(
            out,
            vec![ParseTree::Leaf {
                tag: Some(Tag::Word),
                text: "ab".to_string(),
                span: Span {
                    start: 0,
                    end: 2,
                    start_line: 1,
                    end_line: 1,
                },
            }]
        );
    }

    #[test]
    fn test_typed_output_becomes_children() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let pair = Specify::new(
            Tag::Pair,
            sequence(vec![word.clone(), skip(character(' ')), word]),
        );
        let mut cursor = Cursor::new("ab cd");
        let out = pair.parse(&mut cursor).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag(), Some(Tag::Pair));
        let tags: Vec<_> = out[0].children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, vec![Some(Tag::Word), Some(Tag::Word)]);
        assert_eq!(out[0].children()[0].text(), Some("ab"));
    }

    #[test]
    fn test_single_typed_child_stays_a_child() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let parser = Specify::new(Tag::Pair, word);
        let mut cursor = Cursor::new("ab");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(out[0].tag(), Some(Tag::Pair));
        assert_eq!(out[0].text(), None);
        assert_eq!(out[0].children().len(), 1);
    }

    #[test]
    fn test_zero_nodes_becomes_empty_structural_node() {
        let parser = Specify::new(Tag::Marker, skip(exact_string("break")));
        let mut cursor = Cursor::new("break");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(out[0].tag(), Some(Tag::Marker));
        assert_eq!(out[0].text(), None);
        assert!(out[0].children().is_empty());
    }

    #[test]
    fn test_failure_propagates_untouched() {
        let parser: Specify<Tag> = Specify::new(Tag::Word, repeat1(letter()));
        let mut cursor = Cursor::new("1");
        assert!(parser.parse(&mut cursor).is_err());
    }

    #[test]
    fn test_infix_wraps_left_and_matching_tail() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let parser = Infix::new(
            Rc::clone(&word),
            vec![(Tag::Pair, sequence(vec![skip_char('+'), word]))],
        );
        let mut cursor = Cursor::new("ab+cd");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(out[0].tag(), Some(Tag::Pair));
        let tags: Vec<_> = out[0].children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, vec![Some(Tag::Word), Some(Tag::Word)]);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_infix_without_tail_passes_left_through() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let parser = Infix::new(
            Rc::clone(&word),
            vec![(Tag::Pair, sequence(vec![skip_char('+'), word]))],
        );
        let mut cursor = Cursor::new("ab cd");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(out[0].tag(), Some(Tag::Word));
        assert_eq!(out[0].text(), Some("ab"));
        // The failed tail probe was rolled back.
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_infix_later_tail_applies_when_earlier_fails() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let parser = Infix::new(
            Rc::clone(&word),
            vec![
                (Tag::Pair, sequence(vec![skip_char('+'), Rc::clone(&word)])),
                (Tag::Marker, sequence(vec![skip_char('-'), word])),
            ],
        );
        let mut cursor = Cursor::new("ab-cd");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(out[0].tag(), Some(Tag::Marker));
    }

    #[test]
    fn test_infix_left_failure_propagates() {
        let registry = Rc::new(RuleRegistry::new());
        let word = registry.specify(Tag::Word, repeat1(letter()));
        let parser = Infix::new(
            Rc::clone(&word),
            vec![(Tag::Pair, sequence(vec![skip_char('+'), word]))],
        );
        let mut cursor = Cursor::new("12");
        assert!(parser.parse(&mut cursor).is_err());
    }

    #[test]
    fn test_span_covers_the_match() {
        let parser = Specify::new(Tag::Word, sequence(vec![skip(character('\n')), letter()]));
        let mut cursor = Cursor::new("\nx");
        let out = parser.parse(&mut cursor).unwrap();
        assert_eq!(
            out[0].span(),
            Span {
                start: 0,
                end: 2,
                start_line: 1,
                end_line: 2,
            }
        );
    }
}
