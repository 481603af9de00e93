//! Data structures for boxes
//!
//! This module implements the subset of TeX.2021 part 10 (data structures
//! for boxes and their friends) that math layout needs:
//! characters, accents, rules, glue, kerns, and horizontal and vertical
//! lists.
//!
//! Dimensions are real numbers in pixels.
//! Running rule dimensions are represented by [Rule::RUNNING].

use mtex_core::{Glue, GlueOrder, GlueTotals};
use mtex_font::{Font, FontMetrics, GlyphMetrics, UnknownGlyph};

use crate::pack::Target;

/// Horizontal node.
#[derive(Debug, Clone, PartialEq)]
pub enum Horizontal {
    Char(Char),
    Accent(Accent),
    HList(HList),
    VList(VList),
    Rule(Rule),
    Glue(Glue),
    Kern(Kern),
}

/// Vertical node.
///
/// Characters cannot appear directly in a vertical list; they must be
/// wrapped in a [HList] first.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertical {
    HList(HList),
    VList(VList),
    Rule(Rule),
    Glue(Glue),
    Kern(Kern),
}

macro_rules! node_conversions {
    ( $enum: ident, $( $variant: ident, )+ ) => {
        $(
            impl From<$variant> for $enum {
                fn from(value: $variant) -> Self {
                    $enum::$variant(value)
                }
            }
        )+
    };
}

node_conversions!(Horizontal, Char, Accent, HList, VList, Rule, Glue, Kern,);
node_conversions!(Vertical, HList, VList, Rule, Glue, Kern,);

impl Horizontal {
    pub fn width(&self) -> f64 {
        use Horizontal::*;
        match self {
            Char(c) => c.width,
            Accent(a) => a.width,
            HList(b) => b.width,
            VList(b) => b.width,
            Rule(r) => r.width,
            Glue(g) => g.width,
            Kern(k) => k.width,
        }
    }

    pub fn height(&self) -> f64 {
        use Horizontal::*;
        match self {
            Char(c) => c.height,
            Accent(a) => a.height,
            HList(b) => b.height,
            VList(b) => b.height,
            Rule(r) => r.height,
            Glue(_) | Kern(_) => 0.0,
        }
    }

    pub fn depth(&self) -> f64 {
        use Horizontal::*;
        match self {
            Char(c) => c.depth,
            Accent(a) => a.depth,
            HList(b) => b.depth,
            VList(b) => b.depth,
            Rule(r) => r.depth,
            Glue(_) | Kern(_) => 0.0,
        }
    }

    /// The symbol and font of this node, if it is a glyph.
    pub fn glyph(&self) -> Option<(&str, Font)> {
        match self {
            Horizontal::Char(c) => Some((&c.symbol, c.font)),
            Horizontal::Accent(a) => Some((&a.symbol, a.font)),
            _ => None,
        }
    }
}

impl Vertical {
    pub fn width(&self) -> f64 {
        use Vertical::*;
        match self {
            HList(b) => b.width,
            VList(b) => b.width,
            Rule(r) => r.width,
            Glue(g) => g.width,
            Kern(k) => k.width,
        }
    }

    pub fn height(&self) -> f64 {
        use Vertical::*;
        match self {
            HList(b) => b.height,
            VList(b) => b.height,
            Rule(r) => r.height,
            Glue(_) | Kern(_) => 0.0,
        }
    }

    pub fn depth(&self) -> f64 {
        use Vertical::*;
        match self {
            HList(b) => b.depth,
            VList(b) => b.depth,
            Rule(r) => r.depth,
            Glue(_) | Kern(_) => 0.0,
        }
    }
}

/// A character in a specific font.
///
/// The width of a character is the width of its ink box, except for the
/// space character whose width is its advance.
/// The difference between the advance and the ink width is added back as
/// a kern when the character is placed in a list with kerning enabled.
///
/// Described in TeX.2021.134.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    pub symbol: String,
    pub font: Font,
    pub dpi: f64,
    /// Whether the character was typeset in math mode.
    pub math: bool,
    pub metrics: GlyphMetrics,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Char {
    pub fn new(
        symbol: &str,
        font: Font,
        dpi: f64,
        math: bool,
        font_metrics: &dyn FontMetrics,
    ) -> Result<Char, UnknownGlyph> {
        let metrics = font_metrics.metrics(symbol, font, dpi, math)?;
        let width = if symbol == " " {
            metrics.advance
        } else {
            metrics.width
        };
        Ok(Char {
            symbol: symbol.to_string(),
            font,
            dpi,
            math,
            metrics,
            width,
            height: metrics.iceberg,
            depth: -(metrics.iceberg - metrics.height()),
        })
    }

    /// Whether this is an italic character.
    pub fn is_slanted(&self) -> bool {
        self.metrics.slanted
    }

    /// The space to leave between this character and the next node.
    ///
    /// This is the part of the advance not covered by the ink box, plus
    /// the font's kerning between this character and the next one.
    pub fn kerning(
        &self,
        next: Option<&Horizontal>,
        font_metrics: &dyn FontMetrics,
    ) -> Result<f64, UnknownGlyph> {
        glyph_kerning(
            &self.symbol,
            self.font,
            self.dpi,
            self.metrics.advance - self.width,
            next,
            font_metrics,
        )
    }
}

fn glyph_kerning(
    symbol: &str,
    font: Font,
    dpi: f64,
    mut kern: f64,
    next: Option<&Horizontal>,
    font_metrics: &dyn FontMetrics,
) -> Result<f64, UnknownGlyph> {
    if let Some((next_symbol, next_font)) = next.and_then(Horizontal::glyph) {
        kern += font_metrics.kern(font, symbol, next_font, next_symbol, dpi)?;
    }
    Ok(kern)
}

/// An accent glyph.
///
/// Unlike a [Char], the box of an accent is exactly its ink box and sits
/// on the baseline, so that the accent can be stacked directly above the
/// character it decorates.
#[derive(Debug, Clone, PartialEq)]
pub struct Accent {
    pub symbol: String,
    pub font: Font,
    pub dpi: f64,
    pub math: bool,
    pub metrics: GlyphMetrics,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Accent {
    pub fn new(
        symbol: &str,
        font: Font,
        dpi: f64,
        math: bool,
        font_metrics: &dyn FontMetrics,
    ) -> Result<Accent, UnknownGlyph> {
        let metrics = font_metrics.metrics(symbol, font, dpi, math)?;
        Ok(Accent {
            symbol: symbol.to_string(),
            font,
            dpi,
            math,
            metrics,
            width: metrics.xmax - metrics.xmin,
            height: metrics.ymax - metrics.ymin,
            depth: 0.0,
        })
    }

    /// The space to leave between this accent and the next node.
    pub fn kerning(
        &self,
        next: Option<&Horizontal>,
        font_metrics: &dyn FontMetrics,
    ) -> Result<f64, UnknownGlyph> {
        glyph_kerning(
            &self.symbol,
            self.font,
            self.dpi,
            self.metrics.advance - self.width,
            next,
            font_metrics,
        )
    }
}

/// A box made from a horizontal list.
///
/// The dimensions are computed when the list is built, see [crate::pack].
///
/// Described in TeX.2021.135.
#[derive(Debug, Clone, PartialEq)]
pub struct HList {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    /// How much this box should be lowered (if it appears in a horizontal list),
    /// or how much it should be moved to the right (if it appears in a vertical
    /// list).
    pub shift_amount: f64,
    pub list: Vec<Horizontal>,
    /// Whether font kerns were inserted between the characters of this list.
    pub kerning: bool,
    pub glue_ratio: GlueRatio,
    pub glue_sign: GlueSign,
    pub glue_order: GlueOrder,
    pub glue_totals: GlueTotals,
}

/// Ratio by which glue should shrink or stretch.
///
/// Unlike TeX the ratio is signed: it is negative when the list is
/// shrinking with glue of positive shrink.
///
/// Described in TeX.2021.109.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlueRatio(pub f64);

/// Description of whether the glue should stretch, shrink, or remain rigid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlueSign {
    Stretching,
    Shrinking,
    #[default]
    Normal,
}

impl HList {
    /// Returns a hlist node corresponding to the TeX snippet `\hbox{}`.
    ///
    /// Described in TeX.2021.136.
    pub fn new_null_box() -> Self {
        Self {
            height: 0.0,
            width: 0.0,
            depth: 0.0,
            shift_amount: 0.0,
            list: vec![],
            kerning: false,
            glue_ratio: GlueRatio(0.0),
            glue_sign: GlueSign::Normal,
            glue_order: GlueOrder::Normal,
            glue_totals: Default::default(),
        }
    }

    /// Returns a list at its natural size.
    pub fn new(list: Vec<Horizontal>) -> Self {
        let mut b = HList {
            list,
            ..Self::new_null_box()
        };
        b.hpack(Target::NATURAL);
        b
    }

    /// Returns a list at its natural size after inserting font kerns.
    ///
    /// After each character a kern is inserted for the part of its advance
    /// not covered by its ink box plus the kerning pair with the following
    /// character, if that is nonzero.
    pub fn with_kerning(
        list: Vec<Horizontal>,
        font_metrics: &dyn FontMetrics,
    ) -> Result<Self, UnknownGlyph> {
        let mut kerned = Vec::with_capacity(list.len() * 2);
        let mut iter = list.into_iter().peekable();
        while let Some(node) = iter.next() {
            let kern = match &node {
                Horizontal::Char(c) => c.kerning(iter.peek(), font_metrics)?,
                Horizontal::Accent(a) => a.kerning(iter.peek(), font_metrics)?,
                _ => 0.0,
            };
            kerned.push(node);
            if kern != 0.0 {
                kerned.push(Kern::font(kern).into());
            }
        }
        let mut b = HList::new(kerned);
        b.kerning = true;
        Ok(b)
    }

    /// Returns an empty box with the provided dimensions.
    ///
    /// This is the `\hbox to w{}` (or `\vbox`) spacer used to leave room in
    /// horizontal and vertical lists.
    pub fn spacer(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::new_null_box()
        }
    }

    /// Returns a list that centers its content when set to a larger or
    /// smaller width.
    pub fn centered(list: Vec<Horizontal>) -> Self {
        let mut v = Vec::with_capacity(list.len() + 2);
        v.push(Glue::SS.into());
        v.extend(list);
        v.push(Glue::SS.into());
        HList::new(v)
    }
}

impl Default for HList {
    fn default() -> Self {
        Self::new_null_box()
    }
}

/// A box made from a vertical list.
///
/// This is the same as [HList], except the list inside holds [Vertical] nodes
/// instead of [Horizontal] nodes.
///
/// Described in TeX.2021.137.
#[derive(Debug, Clone, PartialEq)]
pub struct VList {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub shift_amount: f64,
    pub list: Vec<Vertical>,
    pub glue_ratio: GlueRatio,
    pub glue_sign: GlueSign,
    pub glue_order: GlueOrder,
    pub glue_totals: GlueTotals,
}

impl VList {
    pub fn new_null_box() -> Self {
        Self {
            height: 0.0,
            width: 0.0,
            depth: 0.0,
            shift_amount: 0.0,
            list: vec![],
            glue_ratio: GlueRatio(0.0),
            glue_sign: GlueSign::Normal,
            glue_order: GlueOrder::Normal,
            glue_totals: Default::default(),
        }
    }

    /// Returns a list at its natural size.
    pub fn new(list: Vec<Vertical>) -> Self {
        let mut b = VList {
            list,
            ..Self::new_null_box()
        };
        b.vpack(Target::NATURAL, f64::INFINITY);
        b
    }

    /// Returns a list that centers its content when set to a larger or
    /// smaller height.
    pub fn centered(list: Vec<Vertical>) -> Self {
        let mut v = Vec::with_capacity(list.len() + 2);
        v.push(Glue::SS.into());
        v.extend(list);
        v.push(Glue::SS.into());
        VList::new(v)
    }
}

impl Default for VList {
    fn default() -> Self {
        Self::new_null_box()
    }
}

/// A rule stands for a solid black rectangle.
///
/// It has width, depth and height fields.
/// However if any of these dimensions is [Rule::RUNNING], the actual value
/// will be determined by running the rule up to the boundary of the
/// innermost enclosing box.
/// This is called a "running dimension".
///
/// Described in TeX.2021.138.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
}

impl Rule {
    pub const RUNNING: f64 = f64::INFINITY;

    /// Creates a new rule.
    ///
    /// All of the dimensions are running.
    ///
    /// Described in TeX.2021.139.
    pub fn new() -> Self {
        Self {
            height: Self::RUNNING,
            width: Self::RUNNING,
            depth: Self::RUNNING,
        }
    }

    /// A rule as wide as its enclosing list, centered on the baseline.
    pub fn horizontal(thickness: f64) -> Self {
        Self {
            height: thickness * 0.5,
            width: Self::RUNNING,
            depth: thickness * 0.5,
        }
    }

    /// A rule as tall as its enclosing list.
    pub fn vertical(thickness: f64) -> Self {
        Self {
            height: Self::RUNNING,
            width: thickness,
            depth: Self::RUNNING,
        }
    }

    pub fn is_running(dimension: f64) -> bool {
        dimension.is_infinite()
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

/// A kern.
///
/// Described in TeX.2021.155.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kern {
    pub kind: KernKind,
    pub width: f64,
}

/// The kind of a kern node.
///
/// Described in TeX.2021.155.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernKind {
    /// Inserted from font information.
    Normal,
    /// Inserted by explicit spacing commands like `\quad`.
    Explicit,
    /// Inserted by math layout calculations.
    Math,
}

impl Kern {
    pub fn font(width: f64) -> Self {
        Kern {
            kind: KernKind::Normal,
            width,
        }
    }
    pub fn explicit(width: f64) -> Self {
        Kern {
            kind: KernKind::Explicit,
            width,
        }
    }
    pub fn math(width: f64) -> Self {
        Kern {
            kind: KernKind::Math,
            width,
        }
    }
}

/// A packed box ready to be shipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    HList(HList),
    VList(VList),
}

impl Tree {
    pub fn width(&self) -> f64 {
        match self {
            Tree::HList(b) => b.width,
            Tree::VList(b) => b.width,
        }
    }
    pub fn height(&self) -> f64 {
        match self {
            Tree::HList(b) => b.height,
            Tree::VList(b) => b.height,
        }
    }
    pub fn depth(&self) -> f64 {
        match self {
            Tree::HList(b) => b.depth,
            Tree::VList(b) => b.depth,
        }
    }
}

impl From<HList> for Tree {
    fn from(value: HList) -> Self {
        Tree::HList(value)
    }
}

impl From<VList> for Tree {
    fn from(value: VList) -> Self {
        Tree::VList(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtex_font::{fixed::FixedMetrics, FontVariant};

    fn rm() -> Font {
        Font::new(FontVariant::Rm, 10.0)
    }

    fn char(symbol: &str) -> Horizontal {
        Char::new(symbol, rm(), 72.0, false, &FixedMetrics)
            .unwrap()
            .into()
    }

    #[test]
    fn char_dimensions() {
        let Horizontal::Char(g) = char("g") else {
            unreachable!()
        };
        assert_eq!(g.width, 4.53125);
        assert_eq!(g.height, 4.375);
        assert_eq!(g.depth, 2.03125);
        let Horizontal::Char(space) = char(" ") else {
            unreachable!()
        };
        assert_eq!(space.width, 3.28125);
        assert_eq!((space.height, space.depth), (0.0, 0.0));
    }

    #[test]
    fn char_above_baseline_has_negative_depth() {
        let minus = char("-");
        assert_eq!(minus.height(), 2.8125);
        assert_eq!(minus.depth(), -2.1875);
    }

    #[test]
    fn accent_box_is_ink_box() {
        let hat = Accent::new(r"\hat", rm(), 72.0, true, &FixedMetrics).unwrap();
        assert_eq!(hat.width, 3.125);
        assert_eq!(hat.height, 1.5625);
        assert_eq!(hat.depth, 0.0);
    }

    #[test]
    fn kerning_includes_side_bearings_and_pairs() {
        let Horizontal::Char(a) = char("A") else {
            unreachable!()
        };
        // advance 7.5, ink width 7.1875, kerning pair AV -0.78125
        assert_eq!(a.kerning(Some(&char("V")), &FixedMetrics), Ok(-0.46875));
        assert_eq!(a.kerning(Some(&char("x")), &FixedMetrics), Ok(0.3125));
        assert_eq!(a.kerning(None, &FixedMetrics), Ok(0.3125));
        assert_eq!(
            a.kerning(Some(&Kern::explicit(1.0).into()), &FixedMetrics),
            Ok(0.3125)
        );
    }

    #[test]
    fn rules() {
        let h = Rule::horizontal(0.75);
        assert!(Rule::is_running(h.width));
        assert_eq!((h.height, h.depth), (0.375, 0.375));
        let v = Rule::vertical(0.75);
        assert_eq!(v.width, 0.75);
        assert!(Rule::is_running(v.height) && Rule::is_running(v.depth));
    }

    #[test]
    fn tree_dimensions() {
        let tree: Tree = HList::spacer(1.0, 2.0, 3.0).into();
        assert_eq!((tree.width(), tree.height(), tree.depth()), (1.0, 2.0, 3.0));
    }
}
