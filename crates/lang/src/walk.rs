//! Traversal of syntax trees.

use crate::ast::{List, Node};

/// A visitor of syntax tree nodes.
pub trait Visitor<'a> {
    /// Called before the children of a node are visited.
    ///
    /// Returns whether the children should be visited.
    fn enter(&mut self, node: &Node<'a>) -> bool;

    /// Called after the children of a node were visited.
    ///
    /// Not called if [Visitor::enter] returned false.
    fn leave(&mut self, node: &Node<'a>) {
        _ = node;
    }
}

/// Visits a node and its descendants depth first.
///
/// The children of a macro are its name followed by its arguments.
/// The children of a math expression, argument or list are the nodes in
/// the list.
/// The child of a script is its target.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: &Node<'a>) {
    if !visitor.enter(node) {
        return;
    }
    use Node::*;
    match node {
        List(l) => walk_list(visitor, l),
        Macro(m) => {
            walk(visitor, &Node::Ident(m.name));
            for arg in &m.args {
                walk(visitor, arg);
            }
        }
        Arg(a) => walk_list(visitor, &a.list),
        OptArg(a) => walk_list(visitor, &a.list),
        MathExpr(m) => walk_list(visitor, &m.list),
        Super(s) | Sub(s) => walk(visitor, &s.node),
        Word(_) | Symbol(_) | Literal(_) | Ident(_) => {}
    }
    visitor.leave(node);
}

fn walk_list<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, list: &List<'a>) {
    for node in list {
        walk(visitor, node);
    }
}

struct Inspector<F>(F);

impl<'a, F: FnMut(&Node<'a>) -> bool> Visitor<'a> for Inspector<F> {
    fn enter(&mut self, node: &Node<'a>) -> bool {
        (self.0)(node)
    }
}

/// Calls `f` on a node and its descendants depth first.
///
/// The descendants of a node are skipped if `f` returns false.
pub fn inspect<'a, F: FnMut(&Node<'a>) -> bool>(node: &Node<'a>, f: F) {
    walk(&mut Inspector(f), node);
}
