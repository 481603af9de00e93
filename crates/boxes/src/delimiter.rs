//! Glyphs that grow to fit their content
//!
//! Delimiters, radicals and wide accents are chosen from a font's sized
//! alternatives.
//! When no alternative is large enough a delimiter is built from pieces
//! (TeX.2021.713) or, failing that, the largest alternative is scaled.

use crate::node::{Accent, Char, HList, Horizontal, VList, Vertical};
use mtex_font::{Extensible, Font, FontMetrics, UnknownGlyph};

/// Returns a box holding a version of `symbol` that covers the given height
/// and depth, enlarged by `factor`.
///
/// The box is centered on the midline of the target, except when the
/// largest alternative has to be scaled; in that case its depth matches the
/// target depth.
pub fn auto_height_char(
    symbol: &str,
    height: f64,
    depth: f64,
    factor: f64,
    font: Font,
    dpi: f64,
    font_metrics: &dyn FontMetrics,
) -> Result<HList, UnknownGlyph> {
    let target = (height + depth) * factor;
    let slack = 0.2 * font_metrics.x_height(font, dpi)?;
    let mut largest = None;
    for (alt_font, alt_symbol) in font_metrics.sized_alternatives(symbol, font) {
        let c = Char::new(&alt_symbol, alt_font, dpi, true, font_metrics)?;
        if c.height + c.depth >= target - slack {
            log::trace!("delimiter {symbol}: using {alt_symbol} for extent {target}");
            return Ok(centered_on(c.into(), height, depth));
        }
        largest = Some(c);
    }
    if let Some(recipe) = font_metrics.extensible(symbol, font) {
        let stack = extensible(&recipe, target, font, dpi, font_metrics)?;
        log::trace!(
            "delimiter {symbol}: built from pieces with extent {}",
            stack.height + stack.depth
        );
        return Ok(centered_on(stack.into(), height, depth));
    }
    let c = match largest {
        Some(c) => c,
        None => Char::new(symbol, font, dpi, true, font_metrics)?,
    };
    let extent = c.height + c.depth;
    let c = if extent > 0.0 {
        Char::new(&c.symbol, c.font.scaled(target / extent), dpi, true, font_metrics)?
    } else {
        c
    };
    log::trace!("delimiter {symbol}: scaling {} to extent {target}", c.symbol);
    let shift = depth - c.depth;
    let mut b = HList::new(vec![c.into()]);
    b.shift_amount = shift;
    Ok(b)
}

/// Wraps a node in a box lowered so that its midline is the midline of the
/// target height and depth.
fn centered_on(node: Horizontal, height: f64, depth: f64) -> HList {
    let glyph_mid = (node.height() - node.depth()) / 2.0;
    let target_mid = (height - depth) / 2.0;
    let mut b = HList::new(vec![node]);
    b.shift_amount = glyph_mid - target_mid;
    b
}

/// Stacks the pieces of an extensible recipe until they reach the target
/// extent.
///
/// Described in TeX.2021.713 and TeX.2021.714.
fn extensible(
    recipe: &Extensible,
    target: f64,
    font: Font,
    dpi: f64,
    font_metrics: &dyn FontMetrics,
) -> Result<VList, UnknownGlyph> {
    let piece = |symbol: &str| -> Result<Vertical, UnknownGlyph> {
        let c = Char::new(symbol, font, dpi, true, font_metrics)?;
        Ok(HList::new(vec![c.into()]).into())
    };
    let extent = |node: &Vertical| node.height() + node.depth();

    let top = recipe.top.as_deref().map(piece).transpose()?;
    let middle = recipe.middle.as_deref().map(piece).transpose()?;
    let bottom = recipe.bottom.as_deref().map(piece).transpose()?;
    let repeat = piece(&recipe.repeat)?;

    let mut total: f64 = [&top, &middle, &bottom]
        .into_iter()
        .flatten()
        .map(extent)
        .sum();
    let step = extent(&repeat);
    let mut reps = 0;
    if step > 0.0 {
        while total < target {
            total += step;
            reps += 1;
            if middle.is_some() {
                total += step;
            }
        }
    }

    let mut list = Vec::new();
    list.extend(top);
    if let Some(middle) = middle {
        list.extend(std::iter::repeat(repeat.clone()).take(reps));
        list.push(middle);
    }
    list.extend(std::iter::repeat(repeat).take(reps));
    list.extend(bottom);
    Ok(VList::new(list))
}

/// Returns a box holding a version of the accent `symbol` at least `width`
/// wide.
///
/// If no alternative is wide enough the largest one is scaled to the width.
pub fn auto_width_char(
    symbol: &str,
    width: f64,
    font: Font,
    dpi: f64,
    font_metrics: &dyn FontMetrics,
) -> Result<HList, UnknownGlyph> {
    let mut largest = None;
    for (alt_font, alt_symbol) in font_metrics.sized_alternatives(symbol, font) {
        let a = Accent::new(&alt_symbol, alt_font, dpi, true, font_metrics)?;
        if a.width >= width {
            return Ok(HList::new(vec![a.into()]));
        }
        largest = Some(a);
    }
    let a = match largest {
        Some(a) => a,
        None => Accent::new(symbol, font, dpi, true, font_metrics)?,
    };
    let a = if a.width > 0.0 {
        Accent::new(&a.symbol, a.font.scaled(width / a.width), dpi, true, font_metrics)?
    } else {
        a
    };
    Ok(HList::new(vec![a.into()]))
}
