//! Font abstractions and types
//!
//! The typesetting core never reads font files.
//! Everything it knows about glyphs comes from an implementation of the
//! [FontMetrics] trait, which answers questions like "how wide is `x` in
//! 10pt italic at 72 dpi?".
//!
//! All lengths returned by a [FontMetrics] implementation are in pixels,
//! i.e. points scaled by `dpi / 72`.
//!
//! The [fixed] module contains a small deterministic implementation
//! used for tests and benchmarks.

pub mod fixed;

/// A font variant: the shape and weight used for a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontVariant {
    /// Roman (upright).
    #[default]
    Rm,
    /// Italic.
    It,
    /// Bold.
    Bf,
    /// Bold italic.
    BfIt,
    /// Calligraphic.
    Cal,
    /// Sans serif.
    Sf,
    /// Typewriter.
    Tt,
    /// Blackboard bold.
    Bb,
    /// Fraktur.
    Frak,
}

impl FontVariant {
    /// Short name of the variant.
    pub fn name(&self) -> &'static str {
        use FontVariant::*;
        match self {
            Rm => "rm",
            It => "it",
            Bf => "bf",
            BfIt => "bfit",
            Cal => "cal",
            Sf => "sf",
            Tt => "tt",
            Bb => "bb",
            Frak => "frak",
        }
    }

    /// Whether glyphs in this variant lean to the right.
    pub fn is_italic(&self) -> bool {
        matches!(self, FontVariant::It | FontVariant::BfIt)
    }
}

/// A font: a variant at a given size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub variant: FontVariant,
    pub size: f64,
}

impl Font {
    pub fn new(variant: FontVariant, size: f64) -> Font {
        Font { variant, size }
    }

    /// The same variant at `factor` times the size.
    pub fn scaled(self, factor: f64) -> Font {
        Font {
            size: self.size * factor,
            ..self
        }
    }

    /// The same size in another variant.
    pub fn with_variant(self, variant: FontVariant) -> Font {
        Font { variant, ..self }
    }

    /// Number of pixels in one point of this font at the provided resolution.
    pub fn pixels_per_em(&self, dpi: f64) -> f64 {
        self.size * dpi / 72.0
    }
}

impl std::fmt::Display for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}pt", self.variant.name(), self.size)
    }
}

/// Metrics of a single glyph.
///
/// The vertical bounds are measured upwards from the baseline,
/// so a glyph with a descender has a negative `ymin`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetrics {
    /// Distance from the origin of this glyph to the origin of the next one.
    pub advance: f64,
    /// Width of the ink box, `xmax - xmin`.
    pub width: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// Top of the glyph above the baseline.
    pub iceberg: f64,
    /// Whether the glyph is slanted (italic).
    pub slanted: bool,
}

impl GlyphMetrics {
    /// Height of the ink box, `ymax - ymin`.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Recipe for building an arbitrarily tall delimiter out of pieces.
///
/// The delimiter is the top piece, then copies of the repeated piece, then
/// the middle piece (if any) with more copies below it, then the bottom piece.
/// This mirrors TeX's extensible recipes (TeX.2021.713).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensible {
    pub top: Option<String>,
    pub middle: Option<String>,
    pub bottom: Option<String>,
    pub repeat: String,
}

/// Error returned when a font has no data for a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownGlyph {
    pub symbol: String,
    pub font: Font,
    pub dpi: f64,
}

impl std::fmt::Display for UnknownGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no metrics for glyph `{}` in font {} at {} dpi",
            self.symbol, self.font, self.dpi
        )
    }
}

impl std::error::Error for UnknownGlyph {}

/// Source of glyph metrics.
///
/// Implementations must be deterministic: the same query always gets
/// the same answer.
pub trait FontMetrics {
    /// Returns the metrics of a glyph.
    ///
    /// The `math` flag is set for glyphs typeset in math mode, where some
    /// symbols (like `-`) map to different glyphs.
    fn metrics(
        &self,
        symbol: &str,
        font: Font,
        dpi: f64,
        math: bool,
    ) -> Result<GlyphMetrics, UnknownGlyph>;

    /// Returns the kerning between two adjacent glyphs.
    ///
    /// This is zero for glyphs in different fonts.
    fn kern(
        &self,
        font1: Font,
        symbol1: &str,
        font2: Font,
        symbol2: &str,
        dpi: f64,
    ) -> Result<f64, UnknownGlyph>;

    /// Thickness of rules drawn in this font, e.g. fraction bars.
    fn underline_thickness(&self, font: Font, dpi: f64) -> f64;

    /// The x-height of the font.
    fn x_height(&self, font: Font, dpi: f64) -> Result<f64, UnknownGlyph>;

    /// Versions of a symbol in increasing size, smallest first.
    ///
    /// The default implementation only offers the symbol itself.
    fn sized_alternatives(&self, symbol: &str, font: Font) -> Vec<(Font, String)> {
        vec![(font, symbol.to_string())]
    }

    /// Recipe for building the symbol from pieces, if the font has one.
    fn extensible(&self, symbol: &str, font: Font) -> Option<Extensible> {
        _ = (symbol, font);
        None
    }
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn metrics(
        &self,
        symbol: &str,
        font: Font,
        dpi: f64,
        math: bool,
    ) -> Result<GlyphMetrics, UnknownGlyph> {
        (**self).metrics(symbol, font, dpi, math)
    }
    fn kern(
        &self,
        font1: Font,
        symbol1: &str,
        font2: Font,
        symbol2: &str,
        dpi: f64,
    ) -> Result<f64, UnknownGlyph> {
        (**self).kern(font1, symbol1, font2, symbol2, dpi)
    }
    fn underline_thickness(&self, font: Font, dpi: f64) -> f64 {
        (**self).underline_thickness(font, dpi)
    }
    fn x_height(&self, font: Font, dpi: f64) -> Result<f64, UnknownGlyph> {
        (**self).x_height(font, dpi)
    }
    fn sized_alternatives(&self, symbol: &str, font: Font) -> Vec<(Font, String)> {
        (**self).sized_alternatives(symbol, font)
    }
    fn extensible(&self, symbol: &str, font: Font) -> Option<Extensible> {
        (**self).extensible(symbol, font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_are_distinct() {
        use FontVariant::*;
        let variants = [Rm, It, Bf, BfIt, Cal, Sf, Tt, Bb, Frak];
        let names: std::collections::HashSet<_> = variants.iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), variants.len());
        assert_eq!(Font::new(BfIt, 7.0).to_string(), "bfit@7pt");
    }

    #[test]
    fn font_scaling() {
        let font = Font::new(FontVariant::It, 10.0);
        assert_eq!(font.scaled(0.5), Font::new(FontVariant::It, 5.0));
        assert_eq!(font.with_variant(FontVariant::Bf).variant, FontVariant::Bf);
        assert_eq!(font.pixels_per_em(144.0), 20.0);
    }

    #[test]
    fn unknown_glyph_message() {
        let err = UnknownGlyph {
            symbol: r"\foo".into(),
            font: Font::new(FontVariant::Rm, 12.0),
            dpi: 72.0,
        };
        assert_eq!(
            err.to_string(),
            r"no metrics for glyph `\foo` in font rm@12pt at 72 dpi"
        );
    }
}
