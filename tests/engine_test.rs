//! Engine-level integration tests: backtracking discipline, repetition
//! behavior and recursion depth, exercised through the public API with a
//! throwaway tag type.

use std::rc::Rc;

use proptest::prelude::*;

use tsumugi::engine::prelude::*;
use tsumugi::{Cursor, ParseTree, RuleRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tag {
    Wrapped,
}

#[test]
fn it_parse_deeply_nested_recursive_rule() {
    let registry: Rc<RuleRegistry<Tag>> = Rc::new(RuleRegistry::new());
    let handle = Rc::clone(&registry);
    let wrapped = registry.recursive("wrapped", move || {
        let inner = handle.recursive("wrapped", || empty());
        handle.specify(
            Tag::Wrapped,
            try_first_of(vec![
                between(character('('), inner, character(')')),
                letter(),
            ]),
        )
    });

    let depth = 200;
    let input = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let mut cursor = Cursor::new(&input);

    let trees = wrapped.parse(&mut cursor).unwrap();

    assert!(cursor.at_end());
    let mut max_depth = 0;
    trees[0].walk(&mut |level, node| {
        assert_eq!(node.tag(), Some(Tag::Wrapped));
        max_depth = max_depth.max(level);
    });
    assert_eq!(max_depth, depth);
}

#[test]
fn it_parse_exact_string_failure_keeps_partial_consumption() {
    // The raw matcher leaks its consumed prefix by contract; only an
    // enclosing attempt rolls it back.
    let bare: tsumugi::ParserRef<u32> = exact_string("switch");
    let mut cursor = Cursor::new("swim");
    assert!(bare.parse(&mut cursor).is_err());
    // "swi" matched, then the mismatching byte itself was consumed.
    assert_eq!(cursor.position(), 4);

    let protected: tsumugi::ParserRef<u32> = attempt(exact_string("switch"));
    let mut cursor = Cursor::new("swim");
    assert!(protected.parse(&mut cursor).is_err());
    assert_eq!(cursor.position(), 0);
}

proptest! {
    #[test]
    fn attempt_failure_never_moves_the_cursor(
        input in "[a-z]{0,12}",
        literal in "[a-z]{1,6}",
    ) {
        let parser: tsumugi::ParserRef<u32> = attempt(exact_string(literal.clone()));
        let mut cursor = Cursor::new(&input);
        match parser.parse(&mut cursor) {
            Ok(trees) => {
                prop_assert!(input.starts_with(&literal));
                prop_assert_eq!(cursor.position(), literal.len());
                prop_assert_eq!(trees, vec![ParseTree::raw(literal)]);
            }
            Err(_) => {
                prop_assert!(!input.starts_with(&literal));
                prop_assert_eq!(cursor.position(), 0);
                prop_assert_eq!(cursor.line(), 1);
            }
        }
    }

    #[test]
    fn repeat0_always_succeeds_and_stops_at_first_mismatch(input in "[a-z0-9]{0,16}") {
        let parser: tsumugi::ParserRef<u32> = repeat0(digit());
        let mut cursor = Cursor::new(&input);
        let trees = parser.parse(&mut cursor).unwrap();

        let matched: String = input.chars().take_while(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(cursor.position(), matched.len());
        if matched.is_empty() {
            prop_assert!(trees.is_empty());
        } else {
            prop_assert_eq!(trees, vec![ParseTree::raw(matched)]);
        }
    }

    #[test]
    fn first_of_prefers_the_leftmost_success(input in "(foo|foobar|bar)") {
        let parser: tsumugi::ParserRef<u32> = try_first_of(vec![
            exact_string("foo"),
            exact_string("foobar"),
            exact_string("bar"),
        ]);
        let mut cursor = Cursor::new(&input);
        let trees = parser.parse(&mut cursor).unwrap();

        // "foobar" can never win: "foo" matches its prefix first.
        let expected = if input.starts_with("foo") { "foo" } else { "bar" };
        prop_assert_eq!(trees, vec![ParseTree::raw(expected)]);
        prop_assert_eq!(cursor.position(), expected.len());
    }

    #[test]
    fn probe_count_dominates_position(input in "[a-z()]{0,16}") {
        let parser: tsumugi::ParserRef<u32> = repeat0(try_first_of(vec![
            exact_string("ab"),
            letter(),
        ]));
        let mut cursor = Cursor::new(&input);
        parser.parse(&mut cursor).unwrap();

        // Backtracked probes are counted; restored positions are not.
        prop_assert!(cursor.probe_count() >= cursor.position());
    }
}
