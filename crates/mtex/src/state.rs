//! Layout state.
//!
//! The state is the font and style in effect while a node is expanded.
//! It is passed down by value; nothing a node does changes the state of
//! its siblings.

use mtex_font::{Font, FontVariant};

/// Factor by which the font shrinks for each script level.
pub const SHRINK_FACTOR: f64 = 0.7;

/// Script level after which the font stops shrinking.
pub const NUM_SIZE_LEVELS: u8 = 6;

/// The four math styles of TeX.
///
/// Described in TeX.2021.688.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MathStyle {
    Display,
    Text,
    Script,
    ScriptScript,
}

impl MathStyle {
    /// The style of scripts attached to a node in this style.
    pub fn script(self) -> MathStyle {
        use MathStyle::*;
        match self {
            Display | Text => Script,
            Script | ScriptScript => ScriptScript,
        }
    }

    /// The style of the numerator and denominator of a fraction in this style.
    pub fn fraction(self) -> MathStyle {
        use MathStyle::*;
        match self {
            Display => Text,
            Text => Script,
            Script | ScriptScript => ScriptScript,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    /// Font size in points.
    pub size: f64,
    /// Variant selected by a font macro like `\mathbf`.
    ///
    /// When this is unset, letters in math mode are italic and
    /// everything else is roman.
    pub variant: Option<FontVariant>,
    pub style: MathStyle,
    /// Number of times the font has been reduced for scripts.
    pub level: u8,
    pub math: bool,
}

impl State {
    /// State at the top of a document.
    pub fn text(size: f64) -> State {
        State {
            size,
            variant: None,
            style: MathStyle::Text,
            level: 0,
            math: false,
        }
    }

    /// State for the content of a math expression.
    pub fn math(self, display: bool) -> State {
        State {
            style: if display {
                MathStyle::Display
            } else {
                MathStyle::Text
            },
            math: true,
            ..self
        }
    }

    /// State for the content of a text macro like `\text`.
    pub fn in_text(self, variant: FontVariant) -> State {
        State {
            variant: Some(variant),
            math: false,
            ..self
        }
    }

    pub fn with_variant(self, variant: Option<FontVariant>) -> State {
        State { variant, ..self }
    }

    /// The state one script level down.
    ///
    /// The font shrinks until [NUM_SIZE_LEVELS] is reached.
    pub fn shrink(self) -> State {
        let size = if self.level < NUM_SIZE_LEVELS {
            self.size * SHRINK_FACTOR
        } else {
            self.size
        };
        State {
            size,
            style: self.style.script(),
            level: self.level.saturating_add(1),
            ..self
        }
    }

    /// The font for a glyph.
    ///
    /// `letter` is set for glyphs that are italic by default in math mode.
    pub fn font(&self, letter: bool) -> Font {
        let variant = match self.variant {
            Some(variant) => variant,
            None if self.math && letter => FontVariant::It,
            None => FontVariant::Rm,
        };
        Font::new(variant, self.size)
    }

    /// The roman font at the current size.
    pub fn roman(&self) -> Font {
        Font::new(FontVariant::Rm, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_stops_after_six_levels() {
        let mut state = State::text(10.0).math(false);
        for _ in 0..8 {
            state = state.shrink();
        }
        assert_eq!(state.level, 8);
        assert_eq!(state.style, MathStyle::ScriptScript);
        let want = 10.0 * SHRINK_FACTOR.powi(NUM_SIZE_LEVELS as i32);
        assert!((state.size - want).abs() < 1e-12);
    }

    #[test]
    fn letters_are_italic_in_math() {
        let text = State::text(12.0);
        assert_eq!(text.font(true).variant, FontVariant::Rm);
        let math = text.math(true);
        assert_eq!(math.style, MathStyle::Display);
        assert_eq!(math.font(true).variant, FontVariant::It);
        assert_eq!(math.font(false).variant, FontVariant::Rm);
        let bold = math.with_variant(Some(FontVariant::Bf));
        assert_eq!(bold.font(true).variant, FontVariant::Bf);
        assert!(!math.in_text(FontVariant::Sf).math);
    }

    #[test]
    fn styles() {
        assert_eq!(MathStyle::Display.fraction(), MathStyle::Text);
        assert_eq!(MathStyle::Text.script(), MathStyle::Script);
        assert_eq!(MathStyle::ScriptScript.fraction(), MathStyle::ScriptScript);
    }
}
