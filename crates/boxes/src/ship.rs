//! Shipping boxes out
//!
//! Shipping walks a packed box tree and converts it into a flat list of
//! drawing operations in page coordinates.
//! The origin is the top-left corner and `y` grows downwards.
//!
//! Described in TeX.2021.592 onwards (part 32 of TeX: shipping pages out),
//! in particular `hlist_out` (TeX.2021.619) and `vlist_out` (TeX.2021.629).

use crate::node::{GlueSign, HList, Horizontal, Rule, Tree, VList, Vertical};
use mtex_core::{Glue, GlueOrder};
use mtex_font::Font;

/// Bound on the glue adjustment of a single glue node.
///
/// Described in TeX.2021.625.
const BILLION: f64 = 1e9;

/// The position of the shipping cursor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cursor {
    /// Shift of the box currently being shipped.
    pub shift: f64,
    /// Vertical position, growing downwards.
    pub v: f64,
    /// Horizontal position.
    pub h: f64,
}

/// A glyph to draw with its origin on the baseline at `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphOp {
    pub x: f64,
    pub y: f64,
    pub symbol: String,
    pub font: Font,
    pub math: bool,
}

/// A filled rectangle from the top-left corner `(x1, y1)` to the bottom-right
/// corner `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectOp {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A drawing operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    Glyph(GlyphOp),
    Rect(RectOp),
}

/// The result of shipping a box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shipment {
    pub ops: Vec<Op>,
    /// Position of the cursor after the last node.
    pub cursor: Cursor,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A backend that draws shipped operations.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Draws the operations on a canvas of the given size.
    ///
    /// The height is the total height of the box, including its depth.
    fn render(&mut self, width: f64, height: f64, dpi: f64, ops: &[Op]) -> Result<(), Self::Error>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Error = R::Error;
    fn render(&mut self, width: f64, height: f64, dpi: f64, ops: &[Op]) -> Result<(), Self::Error> {
        (**self).render(width, height, dpi, ops)
    }
}

/// Ships a box whose top-left corner is at `(ox, oy)`.
///
/// The baseline of the box is at `oy + height`.
pub fn ship(ox: f64, oy: f64, tree: &Tree) -> Shipment {
    let mut shipper = Shipper {
        cursor: Cursor::default(),
        off_h: ox,
        off_v: oy + tree.height(),
        ops: vec![],
    };
    match tree {
        Tree::HList(b) => shipper.hlist_out(b),
        Tree::VList(b) => shipper.vlist_out(b, b.width),
    }
    log::debug!(
        "shipped {}x{}+{} box as {} operations",
        tree.width(),
        tree.height(),
        tree.depth(),
        shipper.ops.len()
    );
    Shipment {
        ops: shipper.ops,
        cursor: shipper.cursor,
        width: tree.width(),
        height: tree.height(),
        depth: tree.depth(),
    }
}

struct Shipper {
    cursor: Cursor,
    off_h: f64,
    off_v: f64,
    ops: Vec<Op>,
}

/// Running state of the glue in a list being shipped.
///
/// Described in TeX.2021.625.
struct GlueSetter {
    ratio: f64,
    sign: GlueSign,
    order: GlueOrder,
    total: f64,
    last: f64,
}

impl GlueSetter {
    fn new(ratio: f64, sign: GlueSign, order: GlueOrder) -> Self {
        GlueSetter {
            ratio,
            sign,
            order,
            total: 0.0,
            last: 0.0,
        }
    }

    /// Returns the size of the glue after stretching or shrinking.
    ///
    /// The adjustment is computed from the running total so that rounding
    /// errors do not accumulate across the list.
    fn set(&mut self, glue: &Glue) -> f64 {
        let mut size = glue.width - self.last;
        let flex = match self.sign {
            GlueSign::Stretching if glue.stretch_order == self.order => Some(glue.stretch),
            GlueSign::Shrinking if glue.shrink_order == self.order => Some(glue.shrink),
            _ => None,
        };
        if let Some(flex) = flex {
            self.total += flex;
            self.last = (self.ratio * self.total).clamp(-BILLION, BILLION);
        }
        size += self.last;
        size
    }
}

impl Shipper {
    fn glyph(&mut self, x: f64, y: f64, symbol: &str, font: Font, math: bool) {
        self.ops.push(Op::Glyph(GlyphOp {
            x: x + self.off_h,
            y: y + self.off_v,
            symbol: symbol.to_string(),
            font,
            math,
        }));
    }

    /// Emits a rule whose top-left corner is at `(h, top)`.
    fn rule(&mut self, h: f64, top: f64, width: f64, extent: f64) {
        self.ops.push(Op::Rect(RectOp {
            x1: h + self.off_h,
            y1: top + self.off_v,
            x2: h + width + self.off_h,
            y2: top + extent + self.off_v,
        }));
    }

    /// Described in TeX.2021.619.
    fn hlist_out(&mut self, b: &HList) {
        let mut glue = GlueSetter::new(b.glue_ratio.0, b.glue_sign, b.glue_order);
        let base_line = self.cursor.v;
        for node in &b.list {
            use Horizontal::*;
            match node {
                Char(c) => {
                    self.glyph(self.cursor.h, self.cursor.v, &c.symbol, c.font, c.math);
                    self.cursor.h += c.width;
                }
                Accent(a) => {
                    self.glyph(
                        self.cursor.h - a.metrics.xmin,
                        self.cursor.v + a.metrics.ymin,
                        &a.symbol,
                        a.font,
                        a.math,
                    );
                    self.cursor.h += a.width;
                }
                Kern(k) => {
                    self.cursor.h += k.width;
                }
                HList(inner) if inner.list.is_empty() => {
                    self.cursor.h += inner.width;
                }
                VList(inner) if inner.list.is_empty() => {
                    self.cursor.h += inner.width;
                }
                HList(inner) => {
                    let edge = self.cursor.h;
                    self.enter(inner.shift_amount, base_line + inner.shift_amount);
                    self.hlist_out(inner);
                    self.leave(inner.shift_amount, base_line);
                    self.cursor.h = edge + inner.width;
                }
                VList(inner) => {
                    let edge = self.cursor.h;
                    self.enter(inner.shift_amount, base_line + inner.shift_amount);
                    self.vlist_out(inner, inner.width);
                    self.leave(inner.shift_amount, base_line);
                    self.cursor.h = edge + inner.width;
                }
                Rule(r) => {
                    let height = running_or(r.height, b.height);
                    let depth = running_or(r.depth, b.depth);
                    let width = running_or(r.width, 0.0);
                    if height + depth > 0.0 && width > 0.0 {
                        self.rule(self.cursor.h, base_line - height, width, height + depth);
                    }
                    self.cursor.h += width;
                }
                Glue(g) => {
                    self.cursor.h += glue.set(g);
                }
            }
        }
    }

    /// Ships a vertical list whose running rules are `width` wide.
    ///
    /// Described in TeX.2021.629.
    fn vlist_out(&mut self, b: &VList, width: f64) {
        let mut glue = GlueSetter::new(b.glue_ratio.0, b.glue_sign, b.glue_order);
        let left_edge = self.cursor.h;
        self.cursor.v -= b.height;
        for node in &b.list {
            use Vertical::*;
            match node {
                Kern(k) => {
                    self.cursor.v += k.width;
                }
                HList(inner) if inner.list.is_empty() => {
                    self.cursor.v += inner.height + inner.depth;
                }
                VList(inner) if inner.list.is_empty() => {
                    self.cursor.v += inner.height + inner.depth;
                }
                HList(inner) => {
                    self.cursor.v += inner.height;
                    let save_v = self.cursor.v;
                    self.cursor.h = left_edge + inner.shift_amount;
                    self.enter(inner.shift_amount, save_v);
                    self.hlist_out(inner);
                    self.leave(inner.shift_amount, save_v + inner.depth);
                    self.cursor.h = left_edge;
                }
                VList(inner) => {
                    self.cursor.v += inner.height;
                    let save_v = self.cursor.v;
                    self.cursor.h = left_edge + inner.shift_amount;
                    self.enter(inner.shift_amount, save_v);
                    self.vlist_out(inner, inner.width);
                    self.leave(inner.shift_amount, save_v + inner.depth);
                    self.cursor.h = left_edge;
                }
                Rule(r) => {
                    let rule_width = running_or(r.width, width);
                    let extent = r.height + r.depth;
                    if extent > 0.0 && rule_width > 0.0 {
                        self.rule(self.cursor.h, self.cursor.v, rule_width, extent);
                    }
                    self.cursor.v += extent;
                }
                Glue(g) => {
                    self.cursor.v += glue.set(g);
                }
            }
        }
    }

    fn enter(&mut self, shift: f64, v: f64) {
        self.cursor.shift += shift;
        self.cursor.v = v;
    }

    fn leave(&mut self, shift: f64, v: f64) {
        self.cursor.shift -= shift;
        self.cursor.v = v;
    }
}

fn running_or(dimension: f64, container: f64) -> f64 {
    if Rule::is_running(dimension) {
        container
    } else {
        dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Char, Kern};
    use crate::pack::Target;
    use mtex_font::{fixed::FixedMetrics, FontVariant};

    fn rm() -> Font {
        Font::new(FontVariant::Rm, 10.0)
    }

    fn char(symbol: &str) -> Horizontal {
        Char::new(symbol, rm(), 72.0, false, &FixedMetrics)
            .unwrap()
            .into()
    }

    fn glyph_positions(shipment: &Shipment) -> Vec<(String, f64, f64)> {
        shipment
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Glyph(g) => Some((g.symbol.clone(), g.x, g.y)),
                Op::Rect(_) => None,
            })
            .collect()
    }

    fn rects(shipment: &Shipment) -> Vec<RectOp> {
        shipment
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Rect(r) => Some(*r),
                Op::Glyph(_) => None,
            })
            .collect()
    }

    #[test]
    fn glyphs_sit_on_the_baseline() {
        let b = HList::with_kerning(vec![char("h"), char("i")], &FixedMetrics).unwrap();
        let shipment = ship(0.0, 0.0, &b.into());
        assert_eq!(shipment.height, 6.875);
        assert_eq!(
            glyph_positions(&shipment),
            vec![
                ("h".to_string(), 0.0, 6.875),
                // h has an advance of 35 units
                ("i".to_string(), 5.46875, 6.875),
            ]
        );
        assert_eq!(shipment.cursor.h, 5.46875 + 2.8125);
    }

    #[test]
    fn origin_offsets_everything() {
        let b = HList::new(vec![char("x")]);
        let shipment = ship(3.0, 5.0, &b.into());
        assert_eq!(glyph_positions(&shipment), vec![("x".to_string(), 3.0, 9.375)]);
    }

    #[test]
    fn running_rule_spans_the_list() {
        let b = VList::new(vec![
            HList::new(vec![char("x")]).into(),
            Kern::math(1.0).into(),
            Rule::horizontal(2.0).into(),
            Kern::math(1.0).into(),
            HList::new(vec![char("m")]).into(),
        ]);
        assert_eq!(b.width, 7.65625);
        let shipment = ship(0.0, 0.0, &b.into());
        assert_eq!(
            rects(&shipment),
            vec![RectOp {
                x1: 0.0,
                y1: 4.375 + 1.0,
                x2: 7.65625,
                y2: 4.375 + 1.0 + 2.0,
            }]
        );
        let glyphs = glyph_positions(&shipment);
        assert_eq!(glyphs[0], ("x".to_string(), 0.0, 4.375));
        assert_eq!(glyphs[1], ("m".to_string(), 0.0, 4.375 + 4.0 + 4.375));
    }

    #[test]
    fn running_rule_spans_its_own_list() {
        let inner = VList::new(vec![
            Rule::horizontal(1.0).into(),
            HList::spacer(5.0, 1.0, 0.0).into(),
        ]);
        let outer = VList::new(vec![HList::spacer(20.0, 1.0, 0.0).into(), inner.into()]);
        assert_eq!(outer.width, 20.0);
        let shipment = ship(0.0, 0.0, &outer.into());
        assert_eq!(
            rects(&shipment),
            vec![RectOp {
                x1: 0.0,
                y1: 1.0,
                x2: 5.0,
                y2: 2.0,
            }]
        );
    }

    #[test]
    fn running_width_in_hlist_is_empty() {
        let b = HList::new(vec![char("x"), Rule::new().into(), char("x")]);
        let shipment = ship(0.0, 0.0, &b.into());
        assert!(rects(&shipment).is_empty());
        assert_eq!(shipment.cursor.h, shipment.width);
        let glyphs = glyph_positions(&shipment);
        assert_eq!(glyphs[1].1, shipment.width / 2.0);
    }

    #[test]
    fn vertical_rule_takes_list_height() {
        let b = HList::new(vec![char("g"), Rule::vertical(1.0).into()]);
        let shipment = ship(0.0, 0.0, &b.into());
        assert_eq!(
            rects(&shipment),
            vec![RectOp {
                x1: 4.53125,
                y1: 0.0,
                x2: 5.53125,
                y2: 4.375 + 2.03125,
            }]
        );
    }

    #[test]
    fn stretched_glue_moves_the_cursor() {
        let mut b = HList::new(vec![char("x"), Glue::FIL.into(), char("x")]);
        b.hpack(Target::Exactly(20.0));
        let shipment = ship(0.0, 0.0, &b.into());
        let glyphs = glyph_positions(&shipment);
        assert_eq!(glyphs[1].1, 20.0 - 5.0);
        assert_eq!(shipment.cursor.h, 20.0);
    }

    #[test]
    fn centered_content_when_box_is_narrower() {
        let mut b = HList::centered(vec![HList::spacer(10.0, 1.0, 0.0).into(), char("x")]);
        b.hpack(Target::Exactly(11.0));
        let shipment = ship(0.0, 0.0, &b.into());
        assert_eq!(glyph_positions(&shipment)[0].1, 10.0 - 2.0);
        assert_eq!(shipment.cursor.h, 11.0);
    }

    #[test]
    fn shifted_box_is_lowered() {
        let mut inner = HList::new(vec![char("x")]);
        inner.shift_amount = 2.0;
        let b = HList::new(vec![inner.into()]);
        assert_eq!((b.height, b.depth), (2.375, 2.0));
        let shipment = ship(0.0, 0.0, &b.into());
        assert_eq!(glyph_positions(&shipment), vec![("x".to_string(), 0.0, 4.375)]);
        assert_eq!(shipment.cursor.shift, 0.0);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(f64, f64, f64, usize)>,
    }

    impl Renderer for Recorder {
        type Error = std::fmt::Error;
        fn render(
            &mut self,
            width: f64,
            height: f64,
            dpi: f64,
            ops: &[Op],
        ) -> Result<(), Self::Error> {
            self.calls.push((width, height, dpi, ops.len()));
            Ok(())
        }
    }

    fn render_into<R: Renderer>(mut renderer: R, shipment: &Shipment) -> Result<(), R::Error> {
        renderer.render(
            shipment.width,
            shipment.height + shipment.depth,
            72.0,
            &shipment.ops,
        )
    }

    #[test]
    fn renderer_through_reference() {
        let mut recorder = Recorder::default();
        let shipment = ship(0.0, 0.0, &HList::new(vec![char("a")]).into());
        render_into(&mut recorder, &shipment).unwrap();
        assert_eq!(recorder.calls, vec![(4.21875, 4.53125, 72.0, 1)]);
    }
}
