//! Math layout expander
//!
//! The expander turns a syntax tree into a tree of boxes.
//! Text is set as a flat run of characters;
//!     math expressions are expanded node by node following the rules of
//!     TeX's appendix G, in the simplified form popularized by mathtext.
//!
//! Macros are dispatched through the [handlers](crate::handlers) table.
//! Everything else, including the placement of scripts, happens here.

use crate::error::Error;
use crate::handlers::{self, MacroTable};
use crate::state::{MathStyle, State};
use crate::symbols::{self, Class};
use mtex_boxes::node::{Char, HList, Horizontal, Kern, VList, Vertical};
use mtex_boxes::pack::Target;
use mtex_core::Glue;
use mtex_font::{Font, FontMetrics, UnknownGlyph};
use mtex_lang::ast::{self, Node};
use std::ops::Range;

/// Font constants for placing scripts, in units of the x-height.
///
/// Described in TeX.2021.700 (`sup1`, `sub1`, `sub2`, `sub_drop`) with
/// the delta values of mathtext's default font set.
mod constants {
    pub const SCRIPT_SPACE: f64 = 0.05;
    pub const SUBDROP: f64 = 0.4;
    pub const SUP1: f64 = 0.7;
    pub const SUB1: f64 = 0.3;
    pub const SUB2: f64 = 0.5;
    pub const DELTA: f64 = 0.025;
    pub const DELTA_SLANTED: f64 = 0.2;
    pub const DELTA_INTEGRAL: f64 = 0.1;
}

/// Width of the glue around binary operators and relations, in ems.
const OPERATOR_SPACE: f64 = 0.2;

/// Converts syntax trees into box trees.
pub struct Expander<'m> {
    metrics: &'m dyn FontMetrics,
    dpi: f64,
    handlers: &'static MacroTable,
}

impl<'m> Expander<'m> {
    pub fn new(metrics: &'m dyn FontMetrics, dpi: f64) -> Self {
        Expander {
            metrics,
            dpi,
            handlers: handlers::table(),
        }
    }

    /// Expands a document into one horizontal list with kerning enabled.
    pub fn expand(&self, list: &ast::List, font_size: f64) -> Result<HList, Error> {
        let state = State::text(font_size);
        let nodes = self.text_list(list, state)?;
        self.kerned(nodes, list_span(list))
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics
    }

    /// Expands a list in text mode.
    pub(crate) fn text_list(
        &self,
        list: &ast::List,
        state: State,
    ) -> Result<Vec<Horizontal>, Error> {
        let mut out = Vec::with_capacity(list.len());
        for node in list {
            self.text_node(node, state, &mut out)?;
        }
        Ok(out)
    }

    fn text_node(
        &self,
        node: &Node,
        state: State,
        out: &mut Vec<Horizontal>,
    ) -> Result<(), Error> {
        use Node::*;
        match node {
            Word(ast::Word { text, .. })
            | Literal(ast::Literal { text, .. })
            | Ident(ast::Ident { name: text, .. }) => {
                for c in text.chars() {
                    let font = state.font(c.is_alphabetic());
                    out.push(self.char(c.encode_utf8(&mut [0; 4]), font, state, node)?.into());
                }
            }
            Symbol(s) => match symbols::space_width(s.text) {
                Some(width) => out.push(Kern::explicit(width * self.em(state)?).into()),
                None => out.push(self.char(s.text, state.font(false), state, node)?.into()),
            },
            MathExpr(m) => {
                let math = state.math(m.delim.is_display());
                let nodes = self.math_list(&m.list, math)?;
                out.push(self.kerned(nodes, span(node))?.into());
            }
            Macro(m) => out.extend(self.macro_node(m, state)?),
            List(l) => {
                for node in l {
                    self.text_node(node, state, out)?;
                }
            }
            Arg(ast::Arg { list, .. }) | OptArg(ast::OptArg { list, .. }) => {
                for node in list {
                    self.text_node(node, state, out)?;
                }
            }
            Super(s) | Sub(s) => self.text_node(&s.node, state, out)?,
        }
        Ok(())
    }

    /// Expands a list in math mode.
    ///
    /// Scripts are attached to the node before them, and binary operators,
    /// relations and punctuation get their spacing.
    pub(crate) fn math_list(
        &self,
        list: &ast::List,
        state: State,
    ) -> Result<Vec<Horizontal>, Error> {
        let nodes = &list.nodes;
        let mut out = Vec::with_capacity(nodes.len());
        let mut prev: Option<Class> = None;
        let mut i = 0;
        while i < nodes.len() {
            let base = match &nodes[i] {
                Node::Super(_) | Node::Sub(_) => None,
                node => {
                    i += 1;
                    Some(node)
                }
            };
            let mut sup = None;
            let mut sub = None;
            while let Some(node) = nodes.get(i) {
                match node {
                    Node::Super(s) if sup.is_none() => sup = Some(s),
                    Node::Sub(s) if sub.is_none() => sub = Some(s),
                    _ => break,
                }
                i += 1;
            }
            let class = base.map_or(Class::Ordinary, node_class);
            let mut expanded = match base {
                Some(base) => self.math_node(base, state)?,
                None => vec![],
            };
            if sup.is_some() || sub.is_some() {
                let script = Scripts {
                    sup: sup.map(|s| s.node.as_ref()),
                    sub: sub.map(|s| s.node.as_ref()),
                };
                expanded = vec![self.attach_scripts(base, expanded, script, state)?.into()];
            }
            match class {
                Class::Binary
                    if matches!(
                        prev,
                        None | Some(
                            Class::Binary | Class::Relation | Class::Opening | Class::Punctuation
                        )
                    ) =>
                {
                    out.extend(expanded);
                }
                Class::Binary | Class::Relation => {
                    let space = OPERATOR_SPACE * self.em(state)?;
                    out.push(Glue::fixed(space).into());
                    out.extend(expanded);
                    out.push(Glue::fixed(space).into());
                }
                Class::Punctuation => {
                    out.extend(expanded);
                    out.push(Glue::fixed(OPERATOR_SPACE * self.em(state)?).into());
                }
                Class::Opening | Class::Ordinary => out.extend(expanded),
            }
            prev = Some(class);
        }
        Ok(out)
    }

    /// Expands a single node in math mode.
    fn math_node(&self, node: &Node, state: State) -> Result<Vec<Horizontal>, Error> {
        use Node::*;
        Ok(match node {
            Word(w) => {
                let mut chars = Vec::with_capacity(w.text.len());
                for c in w.text.chars() {
                    let font = state.font(c.is_alphabetic());
                    chars.push(self.char(c.encode_utf8(&mut [0; 4]), font, state, node)?.into());
                }
                vec![self.kerned(chars, span(node))?.into()]
            }
            Literal(ast::Literal { text, .. }) | Ident(ast::Ident { name: text, .. }) => {
                let mut chars = Vec::with_capacity(text.len());
                for c in text.chars() {
                    let font = state.font(false);
                    chars.push(self.char(c.encode_utf8(&mut [0; 4]), font, state, node)?.into());
                }
                vec![self.kerned(chars, span(node))?.into()]
            }
            Symbol(s) => match symbols::space_width(s.text) {
                Some(width) => vec![Kern::explicit(width * self.em(state)?).into()],
                None => vec![self.char(s.text, state.font(false), state, node)?.into()],
            },
            Macro(m) => self.macro_node(m, state)?,
            List(list) | Arg(ast::Arg { list, .. }) | OptArg(ast::OptArg { list, .. }) => {
                vec![self.math_group(list, state)?.into()]
            }
            MathExpr(m) => {
                let nodes = self.math_list(&m.list, state.math(m.delim.is_display()))?;
                vec![self.kerned(nodes, span(node))?.into()]
            }
            Super(s) | Sub(s) => self.math_node(&s.node, state)?,
        })
    }

    /// Expands a list in math mode into a single box.
    pub(crate) fn math_group(&self, list: &ast::List, state: State) -> Result<HList, Error> {
        let nodes = self.math_list(list, state)?;
        self.kerned(nodes, list_span(list))
    }

    fn macro_node(&self, m: &ast::Macro, state: State) -> Result<Vec<Horizontal>, Error> {
        let name = m.name.name;
        if let Some(handler) = self.handlers.get(name) {
            log::trace!("expanding {name} with {} argument(s)", m.args.len());
            return handler(self, m, state);
        }
        let node = Node::Ident(m.name);
        if symbols::is_symbol(name) {
            let letter = symbols::GREEK_LOWER.contains(&name);
            return Ok(vec![self.char(name, state.font(letter), state, &node)?.into()]);
        }
        log::trace!("unknown macro {name} is set literally");
        let mut chars = Vec::with_capacity(name.len());
        for c in name.chars() {
            chars.push(self.char(c.encode_utf8(&mut [0; 4]), state.roman(), state, &node)?.into());
        }
        Ok(vec![self.kerned(chars, span(&node))?.into()])
    }

    /// Attaches superscripts and subscripts to a base.
    ///
    /// Described in TeX.2021.756 onwards.
    fn attach_scripts(
        &self,
        base: Option<&Node>,
        nucleus: Vec<Horizontal>,
        scripts: Scripts,
        state: State,
    ) -> Result<HList, Error> {
        let base_name = match base {
            Some(Node::Macro(m)) => Some(m.name.name),
            _ => None,
        };
        let script_state = state.shrink();
        let sup = match scripts.sup {
            Some(node) => Some(self.script_box(node, script_state)?),
            None => None,
        };
        let sub = match scripts.sub {
            Some(node) => Some(self.script_box(node, script_state)?),
            None => None,
        };
        let nucleus = match (base, nucleus.len()) {
            (None, _) | (_, 0) => HList::new_null_box(),
            _ => single_box(nucleus),
        };
        let t = self.thickness(state);
        if state.style == MathStyle::Display && base_name.is_some_and(symbols::is_overunder) {
            return Ok(over_under(nucleus, sup, sub, t));
        }

        let x_height = self
            .metrics
            .x_height(state.roman(), self.dpi)
            .map_err(|glyph| self.glyph_error(glyph, base))?;
        let dropsub = base_name.is_some_and(symbols::is_dropsub);
        let (nucleus, last_char) = strip_trailing_kern(nucleus);
        let (lc_height, lc_depth, slanted) = match &last_char {
            Some(c) => (c.height, c.depth, c.is_slanted()),
            None => (nucleus.height, nucleus.depth, false),
        };
        let lc_baseline = if dropsub { lc_depth } else { 0.0 };

        use constants::*;
        let mut superkern = DELTA * x_height;
        let mut subkern = DELTA * x_height;
        if slanted {
            superkern += DELTA * x_height;
            superkern += DELTA_SLANTED * (lc_height - x_height * 2.0 / 3.0);
            if dropsub {
                subkern = (3.0 * DELTA - DELTA_INTEGRAL) * lc_height;
                superkern = (3.0 * DELTA + DELTA_INTEGRAL) * lc_height;
            } else {
                subkern = 0.0;
            }
        }

        let scripts: Horizontal = match (sup, sub) {
            (None, None) => return Ok(nucleus),
            (None, Some(sub)) => {
                let mut y = HList::new(vec![Kern::math(subkern).into(), sub.into()]);
                y.shift_amount = if dropsub {
                    lc_baseline + SUBDROP * x_height
                } else {
                    SUB1 * x_height
                };
                y.into()
            }
            (Some(sup), sub) => {
                let mut x = HList::new(vec![Kern::math(superkern).into(), sup.into()]);
                let mut shift_up = if dropsub {
                    lc_height - SUBDROP * x_height
                } else {
                    SUP1 * x_height
                };
                match sub {
                    None => {
                        x.shift_amount = -shift_up;
                        x.into()
                    }
                    Some(sub) => {
                        let y = HList::new(vec![Kern::math(subkern).into(), sub.into()]);
                        let shift_down = if dropsub {
                            lc_baseline + SUBDROP * x_height
                        } else {
                            SUB2 * x_height
                        };
                        let clearance =
                            2.0 * t - ((shift_up - x.depth) - (y.height - shift_down));
                        if clearance > 0.0 {
                            shift_up += clearance;
                        }
                        let gap = (shift_up - x.depth) - (y.height - shift_down);
                        let mut v = VList::new(vec![
                            x.into(),
                            Kern::math(gap).into(),
                            y.into(),
                        ]);
                        v.shift_amount = shift_down;
                        v.into()
                    }
                }
            }
        };
        let mut list = vec![nucleus.into(), scripts];
        if !dropsub {
            list.push(Kern::math(SCRIPT_SPACE * x_height).into());
        }
        Ok(HList::new(list))
    }

    fn script_box(&self, node: &Node, state: State) -> Result<HList, Error> {
        Ok(single_box(self.math_node(node, state)?))
    }

    /// Creates a character, attributing a missing glyph to `node`.
    pub(crate) fn char(
        &self,
        symbol: &str,
        font: Font,
        state: State,
        node: &Node,
    ) -> Result<Char, Error> {
        Char::new(symbol, font, self.dpi, state.math, self.metrics)
            .map_err(|glyph| self.glyph_error(glyph, Some(node)))
    }

    /// Packs nodes into a box with kerning enabled.
    pub(crate) fn kerned(
        &self,
        nodes: Vec<Horizontal>,
        span: Option<Range<usize>>,
    ) -> Result<HList, Error> {
        HList::with_kerning(nodes, self.metrics)
            .map_err(|glyph| Error::UnknownGlyph { glyph, span })
    }

    pub(crate) fn glyph_error(&self, glyph: UnknownGlyph, node: Option<&Node>) -> Error {
        Error::UnknownGlyph {
            glyph,
            span: node.and_then(span),
        }
    }

    /// Thickness of rules at the current size.
    pub(crate) fn thickness(&self, state: State) -> f64 {
        self.metrics.underline_thickness(state.roman(), self.dpi)
    }

    /// Width of one em at the current size: the advance of `m`.
    pub(crate) fn em(&self, state: State) -> Result<f64, Error> {
        Ok(self
            .metrics
            .metrics("m", state.roman(), self.dpi, state.math)?
            .advance)
    }
}

struct Scripts<'b, 'a> {
    sup: Option<&'b Node<'a>>,
    sub: Option<&'b Node<'a>>,
}

/// Spacing class of a node in a math list.
fn node_class(node: &Node) -> Class {
    match node {
        Node::Symbol(s) => symbols::class(s.text),
        Node::Macro(m) => symbols::class(m.name.name),
        _ => Class::Ordinary,
    }
}

/// Source range of a node.
pub(crate) fn span(node: &Node) -> Option<Range<usize>> {
    Some(node.pos()?..node.end()?)
}

fn list_span(list: &ast::List) -> Option<Range<usize>> {
    Some(list.pos()?..list.end()?)
}

/// Wraps nodes in a box unless they already are a single box.
pub(crate) fn single_box(mut nodes: Vec<Horizontal>) -> HList {
    if let [Horizontal::HList(_)] = nodes.as_slice() {
        if let Some(Horizontal::HList(b)) = nodes.pop() {
            return b;
        }
    }
    HList::new(nodes)
}

/// Removes the font kern after the last character of the nucleus and
/// widens that character to its advance, so that a superscript starts
/// where the next character would.
///
/// The returned box does not kern.
fn strip_trailing_kern(nucleus: HList) -> (HList, Option<Char>) {
    let mut list = nucleus.list;
    if list.len() > 1
        && matches!(list.last(), Some(Horizontal::Kern(_)))
        && matches!(list.get(list.len() - 2), Some(Horizontal::Char(_)))
    {
        list.pop();
    }
    let mut last_char = None;
    if let Some(Horizontal::Char(c)) = list.last_mut() {
        c.width = c.metrics.advance;
        last_char = Some(c.clone());
    }
    let mut b = HList::new(list);
    b.shift_amount = nucleus.shift_amount;
    (b, last_char)
}

/// Places limits centered above and below a large operator.
fn over_under(nucleus: HList, sup: Option<HList>, sub: Option<HList>, t: f64) -> HList {
    let width = [Some(&nucleus), sup.as_ref(), sub.as_ref()]
        .into_iter()
        .flatten()
        .map(|b| b.width)
        .fold(0.0, f64::max);
    let gap = 3.0 * t;
    let centered = |b: HList| {
        let mut c = HList::centered(vec![b.into()]);
        c.hpack(Target::Exactly(width));
        c
    };
    let nucleus_depth = nucleus.depth;
    let mut list: Vec<Vertical> = Vec::with_capacity(5);
    if let Some(sup) = sup {
        list.push(centered(sup).into());
        list.push(Kern::math(gap).into());
    }
    list.push(centered(nucleus).into());
    let mut shift = 0.0;
    if let Some(sub) = sub {
        let sub = centered(sub);
        shift = sub.height + gap + nucleus_depth;
        list.push(Kern::math(gap).into());
        list.push(sub.into());
    }
    let mut v = VList::new(list);
    v.shift_amount = shift;
    HList::new(vec![v.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtex_font::fixed::FixedMetrics;

    fn expand(source: &str) -> HList {
        let list = mtex_lang::parse(source).unwrap();
        Expander::new(&FixedMetrics, 72.0).expand(&list, 10.0).unwrap()
    }

    /// The box produced for the first math expression in the source.
    fn math_box(source: &str) -> HList {
        let doc = expand(source);
        for node in doc.list {
            if let Horizontal::HList(b) = node {
                return b;
            }
        }
        panic!("no math expression in {source}");
    }

    fn glue_widths(b: &HList) -> Vec<f64> {
        b.list
            .iter()
            .filter_map(|node| match node {
                Horizontal::Glue(g) => Some(g.width),
                _ => None,
            })
            .collect()
    }

    const EM: f64 = 53.0 * 10.0 / 64.0;

    macro_rules! size_tests {
        ( $( ($name: ident, $source: expr, $width: expr, $height: expr, $depth: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let b = expand($source);
                    assert_eq!((b.width, b.height, b.depth), ($width, $height, $depth));
                }
            )+
        };
    }

    size_tests!(
        (empty, "", 0.0, 0.0, 0.0,),
        (text, "hello", 20.625, 6.875, 0.15625,),
        (text_in_math, "$hello$", 20.625, 6.875, 0.15625,),
        (text_with_space, "a b", 13.75, 6.875, 0.15625,),
        (empty_math, "$$", 0.0, 0.0, 0.0,),
        (digits, "$10$", 10.0, 6.5625, 0.0,),
    );

    #[test]
    fn kerning_is_applied_in_text() {
        let kerned = expand("AV");
        assert_eq!(kerned.width, (48.0 + 48.0 - 5.0) * 10.0 / 64.0);
    }

    #[test]
    fn letters_are_italic_in_math() {
        let b = math_box("$x2$");
        let Horizontal::HList(word) = &b.list[0] else {
            panic!("expected a word box");
        };
        let Horizontal::Char(c) = &word.list[0] else {
            panic!("expected a character");
        };
        assert_eq!(c.font.variant, mtex_font::FontVariant::It);
        assert!(c.math);
    }

    #[test]
    fn binary_operator_is_spaced() {
        let b = math_box("$a+b$");
        assert_eq!(glue_widths(&b), vec![0.2 * EM, 0.2 * EM]);
    }

    #[test]
    fn leading_sign_is_not_spaced() {
        let b = math_box("$-a$");
        assert!(glue_widths(&b).is_empty());
        let b = math_box("$a=-b$");
        assert_eq!(glue_widths(&b), vec![0.2 * EM, 0.2 * EM]);
    }

    #[test]
    fn punctuation_is_followed_by_space() {
        let b = math_box("$a,b$");
        assert_eq!(glue_widths(&b), vec![0.2 * EM]);
    }

    #[test]
    fn superscript_is_raised() {
        let b = math_box("$x^2$");
        let Horizontal::HList(attached) = &b.list[0] else {
            panic!("expected an attached box");
        };
        let Horizontal::HList(sup) = &attached.list[1] else {
            panic!("expected a superscript box");
        };
        assert!(sup.shift_amount < 0.0);
        assert!(b.height > 42.0 * 10.0 / 64.0);
    }

    #[test]
    fn subscript_is_lowered() {
        let plain = math_box("$x$");
        let b = math_box("$x_i$");
        assert!(b.depth > plain.depth);
    }

    #[test]
    fn both_scripts_are_stacked() {
        let b = math_box("$x_1^2$");
        let Horizontal::HList(attached) = &b.list[0] else {
            panic!("expected an attached box");
        };
        assert!(matches!(attached.list[1], Horizontal::VList(_)));
        // script space
        assert!(matches!(attached.list.last(), Some(Horizontal::Kern(_))));
    }

    #[test]
    fn script_without_base() {
        let b = math_box("$^2$");
        let Horizontal::HList(attached) = &b.list[0] else {
            panic!("expected an attached box");
        };
        let Horizontal::HList(nucleus) = &attached.list[0] else {
            panic!("expected an empty nucleus");
        };
        assert_eq!(nucleus.width, 0.0);
        assert!(nucleus.list.is_empty());
    }

    #[test]
    fn display_limits_are_stacked() {
        let inline = math_box(r"$\sum_{i}^{n}$");
        let display = math_box(r"$$\sum_{i}^{n}$$");
        let Horizontal::HList(attached) = &display.list[0] else {
            panic!("expected an attached box");
        };
        assert!(matches!(attached.list[0], Horizontal::VList(_)));
        assert!(display.width < inline.width);
        assert!(display.height > inline.height);
    }

    #[test]
    fn integral_scripts_drop() {
        let b = math_box(r"$\int_0^1$");
        let Horizontal::HList(attached) = &b.list[0] else {
            panic!("expected an attached box");
        };
        // No script space after integrals.
        assert_eq!(attached.list.len(), 2);
    }

    #[test]
    fn scripts_shrink() {
        let b = math_box("$x^2$");
        let Horizontal::HList(attached) = &b.list[0] else {
            panic!("expected an attached box");
        };
        let Horizontal::HList(sup) = &attached.list[1] else {
            panic!("expected a superscript box");
        };
        let Horizontal::HList(digits) = &sup.list[1] else {
            panic!("expected the script content");
        };
        let Horizontal::Char(c) = &digits.list[0] else {
            panic!("expected a character");
        };
        assert!((c.font.size - 7.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_macro_is_set_literally() {
        let b = math_box(r"$\foo$");
        let Horizontal::HList(name) = &b.list[0] else {
            panic!("expected the macro name");
        };
        let symbols: Vec<&str> = name
            .list
            .iter()
            .filter_map(|node| node.glyph().map(|(s, _)| s))
            .collect();
        assert_eq!(symbols, vec!["\\", "f", "o", "o"]);
    }

    #[test]
    fn tilde_is_a_space() {
        let b = expand("a~b");
        assert!(matches!(b.list[2], Horizontal::Kern(k) if (k.width - EM / 3.0).abs() < 1e-9));
    }

    #[test]
    fn greek_letters_use_the_letter_font() {
        let b = math_box(r"$\alpha\Gamma$");
        let variants: Vec<_> = b
            .list
            .iter()
            .filter_map(|node| node.glyph().map(|(_, f)| f.variant))
            .collect();
        use mtex_font::FontVariant::*;
        assert_eq!(variants, vec![It, Rm]);
    }
}
