//! Syntax tree of the LaTeX math subset.
//!
//! Nodes borrow their text from the source.
//! Every node knows its position in the source, see [Node::pos] and
//! [Node::end].

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// A brace group.
    List(List<'a>),
    Word(Word<'a>),
    Symbol(Symbol<'a>),
    Literal(Literal<'a>),
    Ident(Ident<'a>),
    Macro(Macro<'a>),
    Arg(Arg<'a>),
    OptArg(OptArg<'a>),
    MathExpr(MathExpr<'a>),
    Super(Script<'a>),
    Sub(Script<'a>),
}

/// A sequence of nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List<'a> {
    pub nodes: Vec<Node<'a>>,
}

/// A run of letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub pos: usize,
    pub text: &'a str,
}

/// A single character that is not a letter or digit, or a whitespace run
/// (with text `" "`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol<'a> {
    pub pos: usize,
    pub text: &'a str,
}

/// A number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    pub pos: usize,
    pub text: &'a str,
}

/// The name of a macro, including the escape marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'a> {
    pub pos: usize,
    pub name: &'a str,
}

/// A macro with its arguments.
///
/// Each argument is either a [Node::Arg] or a [Node::OptArg].
#[derive(Debug, Clone, PartialEq)]
pub struct Macro<'a> {
    pub name: Ident<'a>,
    pub args: Vec<Node<'a>>,
}

/// A required argument `{...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg<'a> {
    /// Position of `{`.
    pub lbrace: usize,
    pub list: List<'a>,
    /// Position of `}`.
    pub rbrace: usize,
}

/// An optional argument `[...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptArg<'a> {
    /// Position of `[`.
    pub lbracket: usize,
    pub list: List<'a>,
    /// Position of `]`.
    pub rbracket: usize,
}

/// Delimiters of a math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDelim {
    /// `$...$`
    Inline,
    /// `$$...$$`
    Display,
    /// `\(...\)`
    Paren,
    /// `\[...\]`
    Bracket,
}

impl MathDelim {
    pub fn open(&self) -> &'static str {
        use MathDelim::*;
        match self {
            Inline => "$",
            Display => "$$",
            Paren => r"\(",
            Bracket => r"\[",
        }
    }

    pub fn close(&self) -> &'static str {
        use MathDelim::*;
        match self {
            Inline => "$",
            Display => "$$",
            Paren => r"\)",
            Bracket => r"\]",
        }
    }

    /// Whether the expression is set in display style.
    pub fn is_display(&self) -> bool {
        matches!(self, MathDelim::Display | MathDelim::Bracket)
    }
}

/// A math expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpr<'a> {
    pub delim: MathDelim,
    /// Position of the opening delimiter.
    pub left: usize,
    pub list: List<'a>,
    /// Position of the closing delimiter.
    pub right: usize,
}

/// A superscript or subscript.
///
/// Scripts follow their base in the enclosing list.
#[derive(Debug, Clone, PartialEq)]
pub struct Script<'a> {
    /// Position of the `^` or `_` marker.
    pub marker: usize,
    pub node: Box<Node<'a>>,
}

impl<'a> List<'a> {
    pub fn new(nodes: Vec<Node<'a>>) -> Self {
        List { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<'a>> {
        self.nodes.iter()
    }

    /// Position of the first character of the first positioned node.
    pub fn pos(&self) -> Option<usize> {
        self.nodes.iter().find_map(Node::pos)
    }

    /// Position just after the last positioned node.
    pub fn end(&self) -> Option<usize> {
        self.nodes.iter().rev().find_map(Node::end)
    }
}

impl<'a, 'b> IntoIterator for &'b List<'a> {
    type Item = &'b Node<'a>;
    type IntoIter = std::slice::Iter<'b, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<'a> Node<'a> {
    /// Position of the first character of the node.
    ///
    /// This is `None` for lists without positioned nodes.
    pub fn pos(&self) -> Option<usize> {
        use Node::*;
        match self {
            List(l) => l.pos(),
            Word(w) => Some(w.pos),
            Symbol(s) => Some(s.pos),
            Literal(l) => Some(l.pos),
            Ident(i) => Some(i.pos),
            Macro(m) => Some(m.name.pos),
            Arg(a) => Some(a.lbrace),
            OptArg(a) => Some(a.lbracket),
            MathExpr(m) => Some(m.left),
            Super(s) | Sub(s) => Some(s.marker),
        }
    }

    /// Position just after the last character of the node.
    pub fn end(&self) -> Option<usize> {
        use Node::*;
        match self {
            List(l) => l.end(),
            Word(w) => Some(w.pos + w.text.len()),
            Symbol(s) => Some(s.pos + s.text.len()),
            Literal(l) => Some(l.pos + l.text.len()),
            Ident(i) => Some(i.pos + i.name.len()),
            Macro(m) => m
                .args
                .last()
                .and_then(Node::end)
                .or(Some(m.name.pos + m.name.name.len())),
            Arg(a) => Some(a.rbrace + 1),
            OptArg(a) => Some(a.rbracket + 1),
            MathExpr(m) => Some(m.right + m.delim.close().len()),
            Super(s) | Sub(s) => s.node.end().or(Some(s.marker + 1)),
        }
    }

    /// Name of the kind of node, for diagnostics.
    pub fn kind(&self) -> &'static str {
        use Node::*;
        match self {
            List(_) => "List",
            Word(_) => "Word",
            Symbol(_) => "Symbol",
            Literal(_) => "Literal",
            Ident(_) => "Ident",
            Macro(_) => "Macro",
            Arg(_) => "Arg",
            OptArg(_) => "OptArg",
            MathExpr(_) => "MathExpr",
            Super(_) => "Super",
            Sub(_) => "Sub",
        }
    }
}

macro_rules! node_conversions {
    ( $( $variant: ident, )+ ) => {
        $(
            impl<'a> From<$variant<'a>> for Node<'a> {
                fn from(value: $variant<'a>) -> Self {
                    Node::$variant(value)
                }
            }
        )+
    };
}

node_conversions!(List, Word, Symbol, Literal, Ident, Macro, Arg, OptArg, MathExpr,);

#[cfg(test)]
mod tests {
    use super::*;

    fn word(pos: usize, text: &str) -> Node {
        Word { pos, text }.into()
    }

    #[test]
    fn list_span_skips_empty_lists() {
        let list = List::new(vec![
            List::default().into(),
            word(3, "ab"),
            word(6, "c"),
            List::default().into(),
        ]);
        assert_eq!(list.pos(), Some(3));
        assert_eq!(list.end(), Some(7));
        assert_eq!(List::default().pos(), None);
    }

    #[test]
    fn macro_span_covers_arguments() {
        let m: Node = Macro {
            name: Ident {
                pos: 1,
                name: r"\sqrt",
            },
            args: vec![Arg {
                lbrace: 6,
                list: List::new(vec![word(7, "x")]),
                rbrace: 8,
            }
            .into()],
        }
        .into();
        assert_eq!((m.pos(), m.end()), (Some(1), Some(9)));
    }

    #[test]
    fn math_expr_end_includes_closing_delimiter() {
        let m: Node = MathExpr {
            delim: MathDelim::Display,
            left: 0,
            list: List::default(),
            right: 2,
        }
        .into();
        assert_eq!(m.end(), Some(4));
    }

    #[test]
    fn script_without_positioned_target() {
        let s = Node::Super(Script {
            marker: 4,
            node: Box::new(List::default().into()),
        });
        assert_eq!((s.pos(), s.end()), (Some(4), Some(5)));
    }
}
