//! # Parse Trees
//!
//! The output of every parser is an ordered list of [`ParseTree`] nodes. A
//! node is exactly one of two shapes:
//!
//! * a **leaf** carrying raw matched text — untagged while it is an
//!   intermediate fragment, tagged once a lexical rule has collapsed it
//!   (see [`Specify`](crate::engine::specify::Specify));
//! * a **typed node** carrying a rule tag and an ordered list of children.
//!
//! A typed node never carries both meaningful text and children; the two
//! shapes of the enum make the synthesizer's collapse policy exhaustive.
//! Children are stored in left-to-right match order, mirroring grammar
//! production order.

/// Source range captured around a rule match: byte offsets and line numbers
/// for both ends.
///
/// Spans are stamped by the tree synthesizer when a rule completes. Raw
/// intermediate fragments carry a default (zeroed) span that has no meaning
/// until a rule collapses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// A node of the synthesized parse tree, generic over the grammar's tag type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree<T> {
    /// Raw matched text. `tag` is `None` for intermediate fragments and
    /// `Some` for a collapsed token rule.
    Leaf {
        tag: Option<T>,
        text: String,
        span: Span,
    },
    /// A structural rule match with nested children.
    Node {
        tag: T,
        children: Vec<ParseTree<T>>,
        span: Span,
    },
}

impl<T: Copy> ParseTree<T> {
    /// Creates an untagged raw fragment, the output shape of the primitive
    /// matchers.
    pub fn raw(text: impl Into<String>) -> Self {
        ParseTree::Leaf {
            tag: None,
            text: text.into(),
            span: Span::default(),
        }
    }

    /// Whether this node is an untagged raw fragment.
    pub fn is_raw(&self) -> bool {
        matches!(self, ParseTree::Leaf { tag: None, .. })
    }

    /// The rule tag, if any. Raw fragments have none.
    pub fn tag(&self) -> Option<T> {
        match self {
            ParseTree::Leaf { tag, .. } => *tag,
            ParseTree::Node { tag, .. } => Some(*tag),
        }
    }

    /// The matched text of a leaf; `None` for structural nodes.
    pub fn text(&self) -> Option<&str> {
        match self {
            ParseTree::Leaf { text, .. } => Some(text),
            ParseTree::Node { .. } => None,
        }
    }

    /// The children of a structural node; empty for leaves.
    pub fn children(&self) -> &[ParseTree<T>] {
        match self {
            ParseTree::Leaf { .. } => &[],
            ParseTree::Node { children, .. } => children,
        }
    }

    /// The source span stamped on this node.
    pub fn span(&self) -> Span {
        match self {
            ParseTree::Leaf { span, .. } => *span,
            ParseTree::Node { span, .. } => *span,
        }
    }

    /// Visits this node and all descendants depth-first, passing each node's
    /// depth (this node is depth 0).
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(usize, &ParseTree<T>),
    {
        self.walk_from(0, visit);
    }

    fn walk_from<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(usize, &ParseTree<T>),
    {
        visit(depth, self);
        for child in self.children() {
            child.walk_from(depth + 1, visit);
        }
    }
}
