//! Macro handlers
//!
//! Each macro with its own geometry has a handler: a function that gets
//! the macro node and the current state and returns the horizontal
//! material for it.
//! The handlers live in a [MacroTable] that is built on first use and
//! shared by every [Expander].
//!
//! Symbol macros like `\alpha` have no handler.
//! The expander sets them as single glyphs.

use crate::error::Error;
use crate::expand::Expander;
use crate::state::{MathStyle, State};
use crate::symbols;
use mtex_boxes::delimiter;
use mtex_boxes::node::{Accent, HList, Horizontal, Kern, Rule, VList};
use mtex_boxes::pack::Target;
use mtex_core::Glue;
use mtex_font::{FontVariant, UnknownGlyph};
use mtex_lang::ast::{self, Node};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

/// A macro handler.
pub type Handler =
    fn(&Expander<'_>, &ast::Macro<'_>, State) -> Result<Vec<Horizontal>, Error>;

/// Map from macro name, escape marker included, to handler.
pub struct MacroTable {
    handlers: HashMap<&'static str, Handler>,
}

impl MacroTable {
    fn new() -> MacroTable {
        let mut m: HashMap<&'static str, Handler> = HashMap::new();
        for name in [r"\frac", r"\dfrac", r"\tfrac", r"\binom"] {
            m.insert(name, genfrac);
        }
        m.insert(r"\sqrt", sqrt);
        m.insert(r"\overline", overline);
        for name in symbols::ACCENTS.iter().chain(symbols::WIDE_ACCENTS) {
            m.insert(*name, accent);
        }
        for (name, _) in symbols::SPACES {
            if name.starts_with('\\') {
                m.insert(*name, space);
            }
        }
        m.insert(r"\hspace", hspace);
        for (name, _) in MATH_FONTS {
            m.insert(*name, math_font);
        }
        for (name, _) in TEXT_FONTS {
            m.insert(*name, text_font);
        }
        for (name, _) in symbols::ESCAPES {
            m.insert(*name, escape);
        }
        m.insert(r"\\", line_break);
        for name in symbols::FUNCTIONS {
            m.insert(*name, function);
        }
        m.insert(r"\operatorname", operator_name);
        MacroTable { handlers: m }
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }
}

/// Returns the handler table.
pub fn table() -> &'static MacroTable {
    static TABLE: OnceLock<MacroTable> = OnceLock::new();
    TABLE.get_or_init(MacroTable::new)
}

const MATH_FONTS: &[(&str, Option<FontVariant>)] = &[
    (r"\mathrm", Some(FontVariant::Rm)),
    (r"\mathit", Some(FontVariant::It)),
    (r"\mathbf", Some(FontVariant::Bf)),
    (r"\mathcal", Some(FontVariant::Cal)),
    (r"\mathsf", Some(FontVariant::Sf)),
    (r"\mathtt", Some(FontVariant::Tt)),
    (r"\mathbb", Some(FontVariant::Bb)),
    (r"\mathfrak", Some(FontVariant::Frak)),
    (r"\mathdefault", None),
];

const TEXT_FONTS: &[(&str, FontVariant)] = &[
    (r"\textrm", FontVariant::Rm),
    (r"\textit", FontVariant::It),
    (r"\textbf", FontVariant::Bf),
    (r"\textsf", FontVariant::Sf),
    (r"\texttt", FontVariant::Tt),
    (r"\text", FontVariant::Rm),
    (r"\emph", FontVariant::It),
    (r"\mbox", FontVariant::Rm),
];

/// Source range of a macro and its arguments.
fn macro_span(m: &ast::Macro<'_>) -> Range<usize> {
    let start = m.name.pos;
    let end = m
        .args
        .last()
        .and_then(Node::end)
        .unwrap_or(start + m.name.name.len());
    start..end
}

fn glyph_error(m: &ast::Macro<'_>) -> impl FnOnce(UnknownGlyph) -> Error {
    let span = macro_span(m);
    move |glyph| Error::UnknownGlyph {
        glyph,
        span: Some(span),
    }
}

fn malformed(m: &ast::Macro<'_>, required: usize, got: usize) -> Error {
    Error::MalformedMacro {
        name: m.name.name.to_string(),
        span: macro_span(m),
        required,
        got,
    }
}

/// Returns the required arguments of a macro, checking there are enough.
fn args<'b, 'a>(m: &'b ast::Macro<'a>, required: usize) -> Result<Vec<&'b ast::List<'a>>, Error> {
    let lists: Vec<&ast::List> = m
        .args
        .iter()
        .filter_map(|arg| match arg {
            Node::Arg(a) => Some(&a.list),
            _ => None,
        })
        .collect();
    if lists.len() < required {
        return Err(malformed(m, required, lists.len()));
    }
    Ok(lists)
}

fn optional_arg<'b, 'a>(m: &'b ast::Macro<'a>) -> Option<&'b ast::List<'a>> {
    m.args.iter().find_map(|arg| match arg {
        Node::OptArg(a) => Some(&a.list),
        _ => None,
    })
}

/// Generalized fraction: `\frac`, `\dfrac`, `\tfrac` and `\binom`.
///
/// Described in TeX.2021.743 onwards.
fn genfrac(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 2)?;
    let name = m.name.name;
    let inner = match name {
        r"\dfrac" => State {
            style: MathStyle::Display.fraction(),
            ..state
        },
        r"\tfrac" => state.shrink(),
        _ if state.style == MathStyle::Display => State {
            style: state.style.fraction(),
            ..state
        },
        _ => state.shrink(),
    };
    let t = ex.thickness(state);
    let num = ex.math_group(args[0], inner)?;
    let den = ex.math_group(args[1], inner)?;
    let width = num.width.max(den.width);
    let mut cnum = HList::centered(vec![num.into()]);
    cnum.hpack(Target::Exactly(width));
    let mut cden = HList::centered(vec![den.into()]);
    cden.hpack(Target::Exactly(width));

    let binom = name == r"\binom";
    let rule = if binom { 0.0 } else { t };
    // The rule sits in the middle of an equals sign.
    let eq = ex
        .metrics()
        .metrics("=", state.roman(), ex.dpi(), state.math)
        .map_err(glyph_error(m))?;
    let shift = cden.height - ((eq.ymax + eq.ymin) / 2.0 - 3.0 * t);
    let mut stack = VList::new(vec![
        cnum.into(),
        Kern::math(2.0 * t).into(),
        Rule::horizontal(rule).into(),
        Kern::math(2.0 * t).into(),
        cden.into(),
    ]);
    stack.shift_amount = shift;
    let fraction = HList::new(vec![stack.into(), HList::spacer(2.0 * t, 0.0, 0.0).into()]);
    if !binom {
        return Ok(vec![fraction.into()]);
    }

    let (height, depth) = (fraction.height, fraction.depth);
    let paren = |symbol: &str| {
        delimiter::auto_height_char(
            symbol,
            height,
            depth,
            1.0,
            state.roman(),
            ex.dpi(),
            ex.metrics(),
        )
        .map_err(glyph_error(m))
    };
    let left = paren("(")?;
    let right = paren(")")?;
    Ok(vec![HList::new(vec![left.into(), fraction.into(), right.into()]).into()])
}

/// Extra height added to radicals and overlines so the rule does not touch
/// the tallest glyphs.
fn rule_clearance(ex: &Expander<'_>, state: State) -> f64 {
    state.size * ex.dpi() / 1200.0
}

/// Square root with an optional degree.
///
/// Described in TeX.2021.737.
fn sqrt(ex: &Expander<'_>, m: &ast::Macro<'_>, state: State) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let body = ex.math_group(args[0], state)?;
    let t = ex.thickness(state);
    let height = body.height - body.shift_amount + 5.0 * t;
    let depth = body.depth + body.shift_amount;
    let check = delimiter::auto_height_char(
        r"\__sqrt__",
        height,
        depth,
        1.0,
        state.roman(),
        ex.dpi(),
        ex.metrics(),
    )
    .map_err(glyph_error(m))?;
    let height = check.height - check.shift_amount;
    let depth = check.depth + check.shift_amount;

    let padded = HList::new(vec![
        HList::spacer(2.0 * t, 0.0, 0.0).into(),
        body.into(),
        HList::spacer(2.0 * t, 0.0, 0.0).into(),
    ]);
    let mut rightside = VList::new(vec![
        Rule::horizontal(t).into(),
        Glue::FILL.into(),
        padded.into(),
    ]);
    rightside.vpack(Target::Exactly(height + rule_clearance(ex, state)), depth);

    let root = match optional_arg(m) {
        Some(degree) => ex.math_group(degree, state.shrink().shrink())?,
        None => HList::spacer(check.width * 0.5, 0.0, 0.0),
    };
    let mut root = VList::new(vec![HList::new(vec![root.into()]).into()]);
    root.shift_amount = -height * 0.6;
    let overlap = -check.width * 0.5;
    Ok(vec![HList::new(vec![
        root.into(),
        Kern::math(overlap).into(),
        check.into(),
        rightside.into(),
    ])
    .into()])
}

fn overline(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let body = ex.math_group(args[0], state)?;
    let t = ex.thickness(state);
    let height = body.height - body.shift_amount + 3.0 * t;
    let depth = body.depth + body.shift_amount;
    let mut rightside = VList::new(vec![
        Rule::horizontal(t).into(),
        Glue::FILL.into(),
        HList::new(vec![body.into()]).into(),
    ]);
    rightside.vpack(Target::Exactly(height + rule_clearance(ex, state)), depth);
    Ok(vec![HList::new(vec![rightside.into()]).into()])
}

/// Accents, including the wide accents that grow with their base.
fn accent(ex: &Expander<'_>, m: &ast::Macro<'_>, state: State) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let name = m.name.name;
    let body = ex.math_group(args[0], state)?;
    let t = ex.thickness(state);
    let width = body.width;
    let glyph: Horizontal = if symbols::WIDE_ACCENTS.contains(&name) {
        delimiter::auto_width_char(name, width, state.roman(), ex.dpi(), ex.metrics())
            .map_err(glyph_error(m))?
            .into()
    } else {
        let font = if name == r"\mathring" {
            state.shrink().shrink().roman()
        } else {
            state.roman()
        };
        Accent::new(name, font, ex.dpi(), true, ex.metrics())
            .map_err(glyph_error(m))?
            .into()
    };
    // The quarter-width offset moves the accent towards the slant of
    // italic bases.
    let mut centered = HList::centered(vec![HList::spacer(width / 4.0, 0.0, 0.0).into(), glyph]);
    centered.hpack(Target::Exactly(width));
    Ok(vec![VList::new(vec![
        centered.into(),
        Kern::math(2.0 * t).into(),
        HList::new(vec![body.into()]).into(),
    ])
    .into()])
}

fn space(ex: &Expander<'_>, m: &ast::Macro<'_>, state: State) -> Result<Vec<Horizontal>, Error> {
    let ems = symbols::space_width(m.name.name).unwrap_or(0.0);
    Ok(vec![Kern::explicit(ems * ex.em(state)?).into()])
}

/// A number, possibly negative, as the only content of a list.
fn number(list: &ast::List) -> Option<f64> {
    match list.nodes.as_slice() {
        [Node::Literal(l)] => l.text.parse().ok(),
        [Node::Symbol(s), Node::Literal(l)] if s.text == "-" => {
            l.text.parse::<f64>().ok().map(|n| -n)
        }
        _ => None,
    }
}

fn hspace(ex: &Expander<'_>, m: &ast::Macro<'_>, state: State) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let Some(ems) = number(args[0]) else {
        return Err(malformed(m, 1, 0));
    };
    Ok(vec![Kern::explicit(ems * ex.em(state)?).into()])
}

fn math_font(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let variant = MATH_FONTS
        .iter()
        .find(|(name, _)| *name == m.name.name)
        .and_then(|(_, variant)| *variant);
    Ok(vec![ex.math_group(args[0], state.with_variant(variant))?.into()])
}

/// Text macros like `\textbf`.
///
/// In text mode the characters join the surrounding run so that they
/// kern with their neighbors.
fn text_font(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let variant = TEXT_FONTS
        .iter()
        .find(|(name, _)| *name == m.name.name)
        .map_or(FontVariant::Rm, |(_, variant)| *variant);
    let nodes = ex.text_list(args[0], state.in_text(variant))?;
    if !state.math {
        return Ok(nodes);
    }
    Ok(vec![ex.kerned(nodes, Some(macro_span(m)))?.into()])
}

fn escape(ex: &Expander<'_>, m: &ast::Macro<'_>, state: State) -> Result<Vec<Horizontal>, Error> {
    let Some(c) = symbols::unescape(m.name.name) else {
        return Ok(vec![]);
    };
    let node = Node::Ident(m.name);
    Ok(vec![ex.char(c, state.font(false), state, &node)?.into()])
}

fn line_break(
    _: &Expander<'_>,
    _: &ast::Macro<'_>,
    _: State,
) -> Result<Vec<Horizontal>, Error> {
    Ok(vec![])
}

/// Function names like `\sin`, set in roman.
fn function(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let node = Node::Ident(m.name);
    let font = state.roman();
    let mut chars = vec![];
    for c in m.name.name[1..].chars() {
        chars.push(ex.char(c.encode_utf8(&mut [0; 4]), font, state, &node)?.into());
    }
    Ok(vec![ex.kerned(chars, Some(macro_span(m)))?.into()])
}

fn operator_name(
    ex: &Expander<'_>,
    m: &ast::Macro<'_>,
    state: State,
) -> Result<Vec<Horizontal>, Error> {
    let args = args(m, 1)?;
    let roman = state.with_variant(Some(FontVariant::Rm));
    Ok(vec![ex.math_group(args[0], roman)?.into()])
}
