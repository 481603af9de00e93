//! Canonical printer.
//!
//! Printing a list produces LaTeX source that parses back to the same
//! tree, up to positions.
//! Whitespace dropped in math mode is put back only where two tokens
//! would otherwise merge.

use crate::ast::{List, MathDelim, Node};
use std::fmt::{self, Display};

impl<'a> Display for List<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<&Node<'a>> = None;
        for node in &self.nodes {
            if prev.is_some_and(|prev| needs_space(prev, node)) {
                f.write_str(" ")?;
            }
            write!(f, "{node}")?;
            prev = Some(node);
        }
        Ok(())
    }
}

impl<'a> Display for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Node::*;
        match self {
            List(l) => write!(f, "{{{l}}}"),
            Word(w) => f.write_str(w.text),
            Symbol(s) => f.write_str(s.text),
            Literal(l) => f.write_str(l.text),
            Ident(i) => f.write_str(i.name),
            Macro(m) => {
                f.write_str(m.name.name)?;
                for arg in &m.args {
                    write!(f, "{arg}")?;
                }
                Ok(())
            }
            Arg(a) => write!(f, "{{{}}}", a.list),
            OptArg(a) => write!(f, "[{}]", a.list),
            MathExpr(m) => {
                if m.delim == MathDelim::Inline && m.list.is_empty() {
                    // `$$` would open display math.
                    return f.write_str("$ $");
                }
                write!(f, "{}{}{}", m.delim.open(), m.list, m.delim.close())
            }
            Super(s) => write!(f, "^{}", s.node),
            Sub(s) => write!(f, "_{}", s.node),
        }
    }
}

/// The node whose text is printed last.
fn last_leaf<'b, 'a>(node: &'b Node<'a>) -> &'b Node<'a> {
    match node {
        Node::Super(s) | Node::Sub(s) => last_leaf(&s.node),
        _ => node,
    }
}

fn first_char(node: &Node) -> Option<char> {
    use Node::*;
    match node {
        Word(w) => w.text.chars().next(),
        Symbol(s) => s.text.chars().next(),
        Literal(l) => l.text.chars().next(),
        Ident(_) | Macro(_) => Some('\\'),
        List(_) | Arg(_) => Some('{'),
        OptArg(_) => Some('['),
        MathExpr(m) => m.delim.open().chars().next(),
        Super(_) => Some('^'),
        Sub(_) => Some('_'),
    }
}

/// Whether printing `next` directly after `prev` would change how the
/// source is tokenized.
fn needs_space(prev: &Node, next: &Node) -> bool {
    let Some(c) = first_char(next) else {
        return false;
    };
    match last_leaf(prev) {
        Node::Word(_) => c.is_alphabetic(),
        Node::Literal(l) => c.is_ascii_digit() || (c == '.' && !l.text.contains('.')),
        Node::Symbol(s) => s.text == "." && c.is_ascii_digit(),
        Node::Macro(m) => {
            m.args.is_empty()
                && m.name.name[1..].starts_with(|c: char| c.is_ascii_alphabetic())
                && c.is_ascii_alphabetic()
        }
        _ => false,
    }
}
