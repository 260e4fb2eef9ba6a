//! # Example Grammar
//!
//! A small imperative language built on the engine: assignments, arithmetic
//! and boolean expressions, `if`/`else`, `for` and `for .. in` loops,
//! `switch` with case arms, function definitions and calls.
//!
//! Each production is a free function taking the shared [`RuleRegistry`];
//! tagged rules are memoized there per [`NodeType`], so calling a rule
//! function twice hands back the same parser. Recursive productions
//! (expressions inside parentheses, statements inside blocks, the
//! comma-separated lists) go through [`RuleRegistry::recursive`] so that
//! construction terminates.
//!
//! Expression precedence is encoded by the rule ladder, loosest first:
//! `||` over `&&` over comparisons over `+`/`-` over `*`/`/` over values.
//! Every binary level parses its left operand exactly once and probes only
//! the operator tails against it, so a nested sub-expression is scanned one
//! time regardless of depth.
//! An expression deliberately carries no tag of its own — it reduces to
//! whichever operator or value node it turns out to be, so `1 + 2` is an
//! `Add` node, not an expression wrapper around one.

use std::rc::Rc;

use strum_macros::{Display, EnumIter};

use crate::engine::prelude::*;
use crate::engine::{ParserRef, RuleRegistry};

/// Node tags produced by the grammar, stamped into the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Identifier,
    NumberLiteral,
    StringLiteral,
    BoolLiteral,
    Assignment,
    Add,
    Sub,
    Mul,
    Div,
    EComparison,
    NeComparison,
    LComparison,
    LeComparison,
    GComparison,
    GeComparison,
    OrExpression,
    AndExpression,
    Foreach,
    For,
    ForInit,
    ForCondition,
    ForStep,
    Block,
    IfThen,
    IfThenElse,
    Switch,
    Case,
    CaseElse,
    Break,
    Continue,
    Return,
    FunctionCall,
    FunctionDefinition,
    Program,
}

type Registry = Rc<RuleRegistry<NodeType>>;
type Rule = ParserRef<NodeType>;

/// `Identifier ← [a-zA-Z][a-zA-Z0-9]*`
pub fn identifier(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::Identifier,
        sequence(vec![
            letter(),
            repeat0(try_first_of(vec![letter(), digit()])),
        ]),
    )
}

/// `NumberLiteral ← [0-9]+`
pub fn number_literal(registry: &Registry) -> Rule {
    registry.specify(NodeType::NumberLiteral, repeat1(digit()))
}

/// `StringLiteral ← '"' [^"]* '"'`
pub fn string_literal(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::StringLiteral,
        sequence(vec![
            skip_char('"'),
            repeat0(any_char_but('"')),
            skip_char('"'),
        ]),
    )
}

/// `BoolLiteral ← 'true' | 'false'`
pub fn bool_literal(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::BoolLiteral,
        try_first_of(vec![exact_string("true"), exact_string("false")]),
    )
}

fn literal(registry: &Registry) -> Rule {
    try_first_of(vec![
        number_literal(registry),
        string_literal(registry),
        bool_literal(registry),
    ])
}

/// `Assignment ← Identifier '=' Expression`
pub fn assignment(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::Assignment,
        trim(sequence(vec![
            identifier(registry),
            whitespace_run(),
            skip_char('='),
            whitespace_run(),
            expression(registry),
        ])),
    )
}

/// `Expression ← OrExpression`
///
/// Untagged on purpose: the result is whatever node the operator ladder
/// bottoms out in.
pub fn expression(registry: &Registry) -> Rule {
    trim(or_expression(registry))
}

/// `OrExpression ← AndExpression ('||' AndExpression)?`
fn or_expression(registry: &Registry) -> Rule {
    infix(
        and_expression(registry),
        vec![(
            NodeType::OrExpression,
            operator_tail("||", and_expression(registry)),
        )],
    )
}

/// `AndExpression ← Comparison ('&&' Comparison)?`
fn and_expression(registry: &Registry) -> Rule {
    infix(
        comparison(registry),
        vec![(
            NodeType::AndExpression,
            operator_tail("&&", comparison(registry)),
        )],
    )
}

/// `Comparison ← Sum (('==' | '!=' | '<=' | '<' | '>=' | '>') Sum)?`
///
/// The left Sum is parsed once; only the operator tails are probed. The
/// two-byte forms sit before their one-byte prefixes so `<=` never parses
/// as `<` against a stray `=`.
fn comparison(registry: &Registry) -> Rule {
    infix(
        sum(registry),
        vec![
            (NodeType::EComparison, operator_tail("==", sum(registry))),
            (NodeType::NeComparison, operator_tail("!=", sum(registry))),
            (NodeType::LeComparison, operator_tail("<=", sum(registry))),
            (NodeType::LComparison, operator_tail("<", sum(registry))),
            (NodeType::GeComparison, operator_tail(">=", sum(registry))),
            (NodeType::GComparison, operator_tail(">", sum(registry))),
        ],
    )
}

/// `Sum ← Product (('+' | '-') Product)?`
fn sum(registry: &Registry) -> Rule {
    infix(
        product(registry),
        vec![
            (NodeType::Add, operand_tail('+', product(registry))),
            (NodeType::Sub, operand_tail('-', product(registry))),
        ],
    )
}

/// `Product ← Value (('*' | '/') Value)?`
fn product(registry: &Registry) -> Rule {
    infix(
        value(registry),
        vec![
            (NodeType::Mul, operand_tail('*', value(registry))),
            (NodeType::Div, operand_tail('/', value(registry))),
        ],
    )
}

fn operator_tail(op: &str, right: Rule) -> Rule {
    sequence(vec![
        whitespace_run(),
        skip(exact_string(op)),
        whitespace_run(),
        right,
    ])
}

fn operand_tail(op: char, right: Rule) -> Rule {
    trim(sequence(vec![skip_char(op), whitespace_run(), right]))
}

/// `Value ← FunctionCall | Literal | Identifier | '(' Expression ')'`
///
/// Literals sit before identifiers so `true` is a BoolLiteral, not a name.
fn value(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    try_first_of(vec![
        function_call(registry),
        literal(registry),
        identifier(registry),
        parens(registry.recursive("expression", move || expression(&handle))),
    ])
}

/// `Statement ← FunctionDefinition | FunctionCall | ControlStatement
/// | Assignment`
pub fn statement(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    trim(try_first_of(vec![
        function_definition(registry),
        function_call(registry),
        registry.recursive("control_statement", move || control_statement(&handle)),
        assignment(registry),
    ]))
}

/// `ControlStatement ← Break | Continue | Return | Loop | If | Switch`
fn control_statement(registry: &Registry) -> Rule {
    try_first_of(vec![
        break_statement(registry),
        continue_statement(registry),
        return_statement(registry),
        loop_statement(registry),
        if_statement(registry),
        switch_statement(registry),
    ])
}

/// `Loop ← Foreach | For`
fn loop_statement(registry: &Registry) -> Rule {
    try_first_of(vec![foreach(registry), for_loop(registry)])
}

/// `Foreach ← 'for' Identifier 'in' Identifier Block`
pub fn foreach(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::Foreach,
        sequence(vec![
            skip(exact_string("for")),
            whitespace_run(),
            identifier(registry),
            whitespace_run(),
            skip(exact_string("in")),
            whitespace_run(),
            identifier(registry),
            whitespace_run(),
            block(registry),
        ]),
    )
}

/// `For ← 'for' ForInit ';' ForCondition ';' ForStep Block`
pub fn for_loop(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::For,
        sequence(vec![
            skip(exact_string("for")),
            whitespace_run(),
            for_init(registry),
            whitespace_run(),
            skip_char(';'),
            whitespace_run(),
            for_condition(registry),
            whitespace_run(),
            skip_char(';'),
            whitespace_run(),
            for_step(registry),
            whitespace_run(),
            block(registry),
        ]),
    )
}

/// `ForInit ← AssignmentList`
fn for_init(registry: &Registry) -> Rule {
    registry.specify(NodeType::ForInit, assignment_list(registry))
}

/// `ForCondition ← Expression`
fn for_condition(registry: &Registry) -> Rule {
    registry.specify(NodeType::ForCondition, expression(registry))
}

/// `ForStep ← AssignmentList`
fn for_step(registry: &Registry) -> Rule {
    registry.specify(NodeType::ForStep, assignment_list(registry))
}

/// `AssignmentList ← AssignmentList1 | ε`
fn assignment_list(registry: &Registry) -> Rule {
    trim(try_first_of(vec![assignment_list1(registry), empty()]))
}

/// `AssignmentList1 ← Assignment ',' AssignmentList1 | Assignment`
fn assignment_list1(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    trim(try_first_of(vec![
        sequence(vec![
            assignment(registry),
            whitespace_run(),
            skip_char(','),
            registry.recursive("assignment_list1", move || assignment_list1(&handle)),
        ]),
        assignment(registry),
    ]))
}

/// `If ← IfThenElse | IfThen`
///
/// The else form first: IfThen would otherwise match the prefix of every
/// if/else and strand the `else` keyword.
fn if_statement(registry: &Registry) -> Rule {
    try_first_of(vec![if_then_else(registry), if_then(registry)])
}

/// `IfThen ← 'if' Expression Block`
pub fn if_then(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::IfThen,
        sequence(vec![
            skip(exact_string("if")),
            whitespace_run(),
            expression(registry),
            whitespace_run(),
            block(registry),
        ]),
    )
}

/// `IfThenElse ← 'if' Expression Block 'else' Block`
pub fn if_then_else(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::IfThenElse,
        sequence(vec![
            skip(exact_string("if")),
            whitespace_run(),
            expression(registry),
            whitespace_run(),
            block(registry),
            whitespace_run(),
            skip(exact_string("else")),
            whitespace_run(),
            block(registry),
        ]),
    )
}

/// `Break ← 'break'`
pub fn break_statement(registry: &Registry) -> Rule {
    registry.specify(NodeType::Break, skip(exact_string("break")))
}

/// `Continue ← 'continue'`
pub fn continue_statement(registry: &Registry) -> Rule {
    registry.specify(NodeType::Continue, skip(exact_string("continue")))
}

/// `Return ← 'return' ';' | 'return' Expression`
pub fn return_statement(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::Return,
        sequence(vec![
            skip(exact_string("return")),
            try_first_of(vec![
                sequence(vec![whitespace_run(), skip_char(';')]),
                sequence(vec![whitespace_run(), expression(registry)]),
            ]),
        ]),
    )
}

/// `Switch ← 'switch' Expression SwitchBlock`
pub fn switch_statement(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    registry.specify(
        NodeType::Switch,
        sequence(vec![
            skip(exact_string("switch")),
            whitespace_run(),
            registry.recursive("expression", move || expression(&handle)),
            whitespace_run(),
            switch_block(registry),
        ]),
    )
}

/// `Block ← '{' Statement* '}'`
pub fn block(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::Block,
        trim(between(
            character('{'),
            trim(repeat0(statement(registry))),
            character('}'),
        )),
    )
}

/// `SwitchBlock ← '{' Case* CaseElse? '}'`
fn switch_block(registry: &Registry) -> Rule {
    trim(between(
        character('{'),
        trim(sequence(vec![
            repeat0(case_arm(registry)),
            optional(case_else(registry)),
        ])),
        character('}'),
    ))
}

/// `Case ← 'case' Expression ':' Block`
fn case_arm(registry: &Registry) -> Rule {
    let expr_handle = Rc::clone(registry);
    let block_handle = Rc::clone(registry);
    registry.specify(
        NodeType::Case,
        trim(sequence(vec![
            skip(exact_string("case")),
            whitespace_run(),
            registry.recursive("expression", move || expression(&expr_handle)),
            whitespace_run(),
            skip_char(':'),
            whitespace_run(),
            registry.recursive("block", move || block(&block_handle)),
        ])),
    )
}

/// `CaseElse ← 'else' ':' Block`
fn case_else(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    registry.specify(
        NodeType::CaseElse,
        trim(sequence(vec![
            skip(exact_string("else")),
            whitespace_run(),
            skip_char(':'),
            whitespace_run(),
            registry.recursive("block", move || block(&handle)),
        ])),
    )
}

/// `FunctionCall ← Identifier '(' ParamsList ')'`
pub fn function_call(registry: &Registry) -> Rule {
    registry.specify(
        NodeType::FunctionCall,
        sequence(vec![identifier(registry), parens(params_list(registry))]),
    )
}

/// `ParamsList ← ParamsList1 | ε`
fn params_list(registry: &Registry) -> Rule {
    trim(try_first_of(vec![params_list1(registry), empty()]))
}

/// `ParamsList1 ← Expression ',' ParamsList1 | Expression`
fn params_list1(registry: &Registry) -> Rule {
    let expr_handle = Rc::clone(registry);
    let tail_handle = Rc::clone(registry);
    let expr_again = Rc::clone(registry);
    trim(try_first_of(vec![
        sequence(vec![
            registry.recursive("expression", move || expression(&expr_handle)),
            whitespace_run(),
            skip_char(','),
            whitespace_run(),
            registry.recursive("params_list1", move || params_list1(&tail_handle)),
        ]),
        registry.recursive("expression", move || expression(&expr_again)),
    ]))
}

/// `FunctionDefinition ← 'func' Identifier '(' NamedParamsList ')' Block`
pub fn function_definition(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    registry.specify(
        NodeType::FunctionDefinition,
        sequence(vec![
            skip(exact_string("func")),
            whitespace_run(),
            identifier(registry),
            parens(named_params_list(registry)),
            whitespace_run(),
            registry.recursive("block", move || block(&handle)),
        ]),
    )
}

/// `NamedParamsList ← NamedParamsList1 | ε`
fn named_params_list(registry: &Registry) -> Rule {
    trim(try_first_of(vec![named_params_list1(registry), empty()]))
}

/// `NamedParamsList1 ← Identifier ',' NamedParamsList1 | Identifier`
fn named_params_list1(registry: &Registry) -> Rule {
    let handle = Rc::clone(registry);
    trim(try_first_of(vec![
        sequence(vec![
            identifier(registry),
            whitespace_run(),
            skip_char(','),
            whitespace_run(),
            registry.recursive("named_params_list1", move || named_params_list1(&handle)),
        ]),
        identifier(registry),
    ]))
}

/// `Program ← Statement*`
pub fn program(registry: &Registry) -> Rule {
    registry.specify(NodeType::Program, repeat0(statement(registry)))
}
