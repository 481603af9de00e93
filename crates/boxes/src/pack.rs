//! Packaging lists into boxes
//!
//! This module computes the dimensions of [HList] and [VList] boxes from
//! their contents and decides how much their glue must stretch or shrink
//! to reach a target size.
//!
//! Described in TeX.2021.644 onwards (part 33 of TeX: packaging).

use crate::node::{GlueRatio, GlueSign, HList, Horizontal, Rule, VList, Vertical};
use mtex_core::{GlueOrder, GlueTotals};

/// The size a box should be packed to.
///
/// Described in TeX.2021.644.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// The box has exactly this size.
    Exactly(f64),
    /// The box is this much larger than its natural size.
    Additional(f64),
}

impl Target {
    /// The natural size of the list.
    pub const NATURAL: Target = Target::Additional(0.0);

    fn resolve(self, natural: f64) -> f64 {
        match self {
            Target::Exactly(size) => size,
            Target::Additional(extra) => natural + extra,
        }
    }
}

impl HList {
    /// Computes the dimensions of this box and sets its glue.
    ///
    /// The height and depth are the maxima over the contents, taking the
    /// shift of nested boxes into account.
    /// Neither is ever negative.
    /// Running dimensions of rules are skipped.
    ///
    /// Described in TeX.2021.649.
    pub fn hpack(&mut self, target: Target) {
        let mut h: f64 = 0.0;
        let mut d: f64 = 0.0;
        let mut x: f64 = 0.0;
        let mut totals = GlueTotals::default();
        for node in &self.list {
            match node {
                Horizontal::Char(c) => {
                    x += c.width;
                    h = h.max(c.height);
                    d = d.max(c.depth);
                }
                Horizontal::Accent(a) => {
                    x += a.width;
                    h = h.max(a.height);
                    d = d.max(a.depth);
                }
                Horizontal::HList(b) => {
                    x += b.width;
                    h = h.max(b.height - b.shift_amount);
                    d = d.max(b.depth + b.shift_amount);
                }
                Horizontal::VList(b) => {
                    x += b.width;
                    h = h.max(b.height - b.shift_amount);
                    d = d.max(b.depth + b.shift_amount);
                }
                Horizontal::Rule(r) => {
                    if !Rule::is_running(r.width) {
                        x += r.width;
                    }
                    if !Rule::is_running(r.height) && !Rule::is_running(r.depth) {
                        h = h.max(r.height);
                        d = d.max(r.depth);
                    }
                }
                Horizontal::Glue(g) => {
                    x += g.width;
                    totals.add(g);
                }
                Horizontal::Kern(k) => {
                    x += k.width;
                }
            }
        }
        self.height = h;
        self.depth = d;
        self.width = target.resolve(x);
        self.glue_totals = totals;
        let excess = self.width - x;
        let glue = set_glue(excess, &totals, !self.list.is_empty(), "hlist");
        (self.glue_ratio, self.glue_sign, self.glue_order) = glue;
    }
}

impl VList {
    /// Computes the dimensions of this box and sets its glue.
    ///
    /// If the depth of the last item exceeds `max_depth`, the excess is
    /// moved into the height.
    ///
    /// Described in TeX.2021.668.
    pub fn vpack(&mut self, target: Target, max_depth: f64) {
        let mut w: f64 = 0.0;
        let mut d: f64 = 0.0;
        let mut x: f64 = 0.0;
        let mut totals = GlueTotals::default();
        for node in &self.list {
            use Vertical::*;
            let (height, depth, width, shift) = match node {
                HList(b) => (b.height, b.depth, b.width, b.shift_amount),
                VList(b) => (b.height, b.depth, b.width, b.shift_amount),
                Rule(r) => (r.height, r.depth, r.width, 0.0),
                Glue(g) => {
                    x += d + g.width;
                    d = 0.0;
                    totals.add(g);
                    continue;
                }
                Kern(k) => {
                    x += d + k.width;
                    d = 0.0;
                    continue;
                }
            };
            x += d + height;
            d = depth;
            if !width.is_infinite() {
                w = w.max(width + shift);
            }
        }
        self.width = w;
        if d > max_depth {
            x += d - max_depth;
            self.depth = max_depth;
        } else {
            self.depth = d;
        }
        self.height = target.resolve(x);
        self.glue_totals = totals;
        let excess = self.height - x;
        let glue = set_glue(excess, &totals, !self.list.is_empty(), "vlist");
        (self.glue_ratio, self.glue_sign, self.glue_order) = glue;
    }
}

/// Determines the glue setting for a box whose natural size is off by `excess`.
///
/// The ratio is signed, so shrinking glue yields a negative ratio.
///
/// Described in TeX.2021.658 and TeX.2021.664.
fn set_glue(
    excess: f64,
    totals: &GlueTotals,
    non_empty: bool,
    kind: &str,
) -> (GlueRatio, GlueSign, GlueOrder) {
    if excess == 0.0 {
        return (GlueRatio(0.0), GlueSign::Normal, GlueOrder::Normal);
    }
    let (sign, order, total) = if excess > 0.0 {
        let order = totals.stretch_order();
        (GlueSign::Stretching, order, totals.stretch[order.index()])
    } else {
        let order = totals.shrink_order();
        (GlueSign::Shrinking, order, totals.shrink[order.index()])
    };
    let setting = if total != 0.0 {
        (GlueRatio(excess / total), sign, order)
    } else {
        (GlueRatio(0.0), GlueSign::Normal, order)
    };
    if order == GlueOrder::Normal && non_empty {
        let badness = if excess > 0.0 { "underfull" } else { "overfull" };
        log::debug!("{badness} {kind}: off by {excess} with finite glue {total}");
    }
    setting
}
