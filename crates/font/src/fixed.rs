//! A fixed, deterministic font.
//!
//! [FixedMetrics] describes an imaginary font whose dimensions are stored
//! in units of 1/64 em.
//! At 72 dpi one em is the font size in pixels, so with the common sizes
//! 10pt and 12pt all dimensions are exact binary fractions.
//! This makes the font suitable for tests that compare layouts against
//! literal numbers.
//!
//! Every variant shares the same geometry; italic variants report their
//! letters as slanted.
//!
//! Delimiters and the radical have three larger versions named with the
//! suffixes `.size1`, `.size2` and `.size3`, and the delimiters can be
//! built from the pieces `.top`, `.mid`, `.ext` and `.bot`.

use crate::{Extensible, Font, FontMetrics, GlyphMetrics, UnknownGlyph};

/// The fixed font.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedMetrics;

const UNITS_PER_EM: f64 = 64.0;

/// Advance, xmin, xmax, ymin, ymax.
type Shape = [i16; 5];

#[rustfmt::skip]
const LOWERCASE: [Shape; 26] = [
    [32, 3, 30, -1, 28],  // a
    [35, 2, 33, -1, 44],  // b
    [29, 3, 27, -1, 28],  // c
    [35, 2, 33, -1, 44],  // d
    [29, 2, 27, -1, 28],  // e
    [20, 2, 24, 0, 45],   // f
    [32, 2, 31, -13, 28], // g
    [35, 2, 33, 0, 44],   // h
    [18, 2, 16, 0, 43],   // i
    [19, -2, 15, -13, 43],// j
    [34, 2, 33, 0, 44],   // k
    [18, 2, 16, 0, 44],   // l
    [53, 2, 51, 0, 28],   // m
    [35, 2, 33, 0, 28],   // n
    [32, 2, 30, -1, 28],  // o
    [35, 2, 33, -13, 28], // p
    [34, 2, 32, -13, 28], // q
    [25, 2, 24, 0, 28],   // r
    [25, 2, 23, -1, 28],  // s
    [22, 1, 20, -1, 40],  // t
    [35, 2, 33, -1, 28],  // u
    [34, 1, 33, 0, 28],   // v
    [46, 1, 45, 0, 28],   // w
    [34, 1, 33, 0, 28],   // x
    [34, 1, 33, -13, 28], // y
    [28, 2, 26, 0, 28],   // z
];

#[rustfmt::skip]
const UPPERCASE: [Shape; 26] = [
    [48, 1, 47, 0, 44],   // A
    [44, 2, 41, 0, 43],   // B
    [46, 3, 43, -1, 45],  // C
    [49, 2, 46, 0, 43],   // D
    [43, 2, 40, 0, 43],   // E
    [41, 2, 38, 0, 43],   // F
    [50, 3, 47, -1, 45],  // G
    [48, 2, 46, 0, 43],   // H
    [23, 2, 21, 0, 43],   // I
    [32, 1, 29, -1, 43],  // J
    [49, 2, 47, 0, 43],   // K
    [40, 2, 37, 0, 43],   // L
    [59, 2, 57, 0, 43],   // M
    [48, 2, 46, 0, 43],   // N
    [50, 3, 47, -1, 45],  // O
    [43, 2, 40, 0, 43],   // P
    [50, 3, 47, -12, 45], // Q
    [47, 2, 46, -1, 43],  // R
    [36, 3, 33, -1, 45],  // S
    [46, 2, 44, 0, 43],   // T
    [48, 2, 46, -1, 43],  // U
    [48, 1, 47, -1, 43],  // V
    [66, 1, 65, -1, 43],  // W
    [48, 1, 47, 0, 43],   // X
    [48, 1, 47, 0, 43],   // Y
    [40, 3, 37, 0, 43],   // Z
];

const DIGIT: Shape = [32, 3, 29, 0, 42];
const PUNCTUATION: Shape = [32, 3, 29, -4, 45];
const BINARY: Shape = [50, 4, 46, -5, 37];
const RELATION: Shape = [50, 4, 46, -6, 38];
const ARROW: Shape = [64, 4, 60, -2, 32];
const ACCENT: Shape = [32, 6, 26, 34, 44];
const WIDE_ACCENT: Shape = [32, 1, 31, 34, 46];

const GREEK_LOWER: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "varpi", "rho", "varrho",
    "sigma", "varsigma", "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega",
];
const GREEK_ASCENDERS: &[&str] = &["beta", "delta", "zeta", "theta", "vartheta", "lambda", "xi"];
const GREEK_DESCENDERS: &[&str] = &[
    "beta", "gamma", "zeta", "eta", "mu", "xi", "rho", "varrho", "phi", "varphi", "chi",
    "psi", "varsigma",
];
const GREEK_UPPER: &[&str] = &[
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega",
];
const BINARY_OPERATORS: &[&str] = &[
    "pm", "mp", "times", "div", "cdot", "ast", "star", "circ", "bullet", "oplus", "ominus",
    "otimes", "oslash", "odot", "cup", "cap", "sqcup", "sqcap", "wedge", "vee", "land", "lor",
    "setminus", "uplus", "amalg", "dagger", "ddagger", "wr", "bigtriangleup",
    "bigtriangledown", "triangleleft", "triangleright",
];
const RELATIONS: &[&str] = &[
    "leq", "geq", "le", "ge", "neq", "ne", "equiv", "approx", "sim", "simeq", "cong",
    "propto", "subset", "supset", "subseteq", "supseteq", "in", "notin", "ni", "perp",
    "parallel", "mid", "dashv", "vdash", "models", "ll", "gg", "prec", "succ", "preceq",
    "succeq", "asymp", "doteq", "sqsubseteq", "sqsupseteq", "bowtie", "smile", "frown",
];
const ARROWS: &[&str] = &[
    "rightarrow", "leftarrow", "to", "gets", "Rightarrow", "Leftarrow", "leftrightarrow",
    "Leftrightarrow", "mapsto", "longrightarrow", "longleftarrow", "Longrightarrow",
    "Longleftarrow", "longmapsto", "longleftrightarrow", "Longleftrightarrow", "uparrow",
    "downarrow", "Uparrow", "Downarrow", "updownarrow", "Updownarrow", "hookrightarrow",
    "hookleftarrow", "rightharpoonup", "rightharpoondown", "leftharpoonup",
    "leftharpoondown", "nearrow", "searrow", "swarrow", "nwarrow", "iff", "implies",
    "rightleftharpoons",
];
const ACCENTS: &[&str] = &[
    "hat", "check", "tilde", "bar", "vec", "dot", "ddot", "acute", "grave", "breve",
    "mathring",
];
const WIDE_ACCENTS: &[&str] = &["widehat", "widetilde", "widebar"];
const DELIMITERS: &[&str] = &[
    "(", ")", "[", "]", "{", "}", "|", r"\|", r"\langle", r"\rangle", r"\lfloor",
    r"\rfloor", r"\lceil", r"\rceil", r"\__sqrt__",
];

#[rustfmt::skip]
const KERNING_PAIRS: &[(&str, &str, i16)] = &[
    ("A", "V", -5), ("V", "A", -5), ("A", "W", -3), ("W", "A", -3),
    ("A", "T", -4), ("T", "A", -4), ("A", "Y", -4), ("Y", "A", -4),
    ("T", "o", -5), ("T", "a", -5), ("T", "e", -5), ("V", "o", -4),
    ("V", "a", -4), ("W", "o", -3), ("L", "T", -6), ("L", "V", -6),
    ("P", "A", -5), ("F", "A", -4), ("f", "f", -1), ("r", ".", -3),
    ("y", ".", -3),
];

fn char_shape(c: char) -> Option<Shape> {
    Some(match c {
        'a'..='z' => LOWERCASE[c as usize - 'a' as usize],
        'A'..='Z' => UPPERCASE[c as usize - 'A' as usize],
        '0'..='9' => DIGIT,
        ' ' => [21, 0, 0, 0, 0],
        '.' => [18, 6, 12, 0, 6],
        ',' => [18, 6, 12, -12, 6],
        ';' => [18, 6, 12, -12, 28],
        ':' => [18, 6, 12, 0, 28],
        '!' => [18, 6, 12, 0, 45],
        '?' => [30, 3, 27, 0, 45],
        '\'' => [18, 6, 12, 30, 45],
        '"' => [32, 5, 27, 30, 45],
        '(' => [25, 5, 22, -16, 48],
        ')' => [25, 3, 20, -16, 48],
        '[' => [18, 5, 15, -16, 48],
        ']' => [18, 3, 13, -16, 48],
        '{' | '}' => [32, 5, 27, -16, 48],
        '|' => [18, 7, 11, -16, 48],
        '/' => [32, 3, 29, -16, 48],
        '+' => BINARY,
        '-' => [50, 4, 46, 14, 18],
        '*' => [32, 4, 28, 20, 45],
        '=' => [50, 4, 46, 8, 24],
        '<' | '>' => [50, 5, 45, -3, 35],
        c if c.is_ascii_punctuation() => PUNCTUATION,
        _ => return None,
    })
}

fn macro_shape(name: &str) -> Option<Shape> {
    if GREEK_LOWER.contains(&name) {
        let ymin = if GREEK_DESCENDERS.contains(&name) { -13 } else { -1 };
        let ymax = if GREEK_ASCENDERS.contains(&name) { 44 } else { 28 };
        return Some([34, 2, 32, ymin, ymax]);
    }
    if GREEK_UPPER.contains(&name) {
        return Some([46, 2, 44, 0, 43]);
    }
    if BINARY_OPERATORS.contains(&name) {
        return Some(BINARY);
    }
    if RELATIONS.contains(&name) {
        return Some(RELATION);
    }
    if ARROWS.contains(&name) {
        return Some(ARROW);
    }
    if ACCENTS.contains(&name) {
        return Some(ACCENT);
    }
    if WIDE_ACCENTS.contains(&name) {
        return Some(WIDE_ACCENT);
    }
    Some(match name {
        "sum" | "prod" | "coprod" => [60, 3, 57, -20, 50],
        "bigcap" | "bigcup" | "bigsqcup" | "bigvee" | "bigwedge" | "bigodot" | "bigotimes"
        | "bigoplus" | "biguplus" => [56, 3, 53, -20, 50],
        "int" | "oint" => [36, 2, 40, -24, 56],
        "iint" | "iiint" => [56, 2, 60, -24, 56],
        "infty" => [64, 3, 61, -1, 28],
        "partial" => [34, 2, 32, -1, 45],
        "nabla" => [50, 2, 48, 0, 43],
        "hbar" => [35, 1, 33, 0, 44],
        "ell" => [26, 2, 24, -1, 44],
        "emptyset" | "varnothing" => [32, 3, 29, -4, 47],
        "forall" => [40, 1, 39, 0, 43],
        "exists" => [36, 3, 33, 0, 43],
        "neg" | "lnot" => [44, 4, 40, 8, 20],
        "prime" => [16, 3, 13, 18, 44],
        "ldots" | "dots" => [60, 6, 54, 0, 6],
        "cdots" => [60, 6, 54, 10, 16],
        "vdots" | "ddots" => [32, 12, 20, 0, 44],
        "aleph" | "Re" | "Im" | "wp" => [46, 2, 44, 0, 43],
        "angle" | "triangle" | "top" | "bot" => [50, 3, 47, 0, 43],
        "backslash" => [32, 3, 29, -16, 48],
        "|" => [32, 7, 25, -16, 48],
        "langle" | "rangle" | "lfloor" | "rfloor" | "lceil" | "rceil" => [25, 5, 20, -16, 48],
        "__sqrt__" => [53, 3, 53, -16, 48],
        _ => return None,
    })
}

fn base_shape(symbol: &str) -> Option<Shape> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => char_shape(c),
        (Some('\\'), Some(_)) => macro_shape(&symbol[1..]),
        _ => None,
    }
}

/// A suffix selecting a larger version or a piece of a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Whole,
    Size(u8),
    Top,
    Middle,
    Extension,
    Bottom,
}

fn split_part(symbol: &str) -> (&str, Part) {
    let Some((base, suffix)) = symbol.rsplit_once('.') else {
        return (symbol, Part::Whole);
    };
    if base.is_empty() {
        return (symbol, Part::Whole);
    }
    let part = match suffix {
        "size1" => Part::Size(1),
        "size2" => Part::Size(2),
        "size3" => Part::Size(3),
        "top" => Part::Top,
        "mid" => Part::Middle,
        "ext" => Part::Extension,
        "bot" => Part::Bottom,
        _ => return (symbol, Part::Whole),
    };
    (base, part)
}

fn shape(symbol: &str) -> Option<Shape> {
    let (base, part) = split_part(symbol);
    let shape = base_shape(base)?;
    let [advance, xmin, xmax, ymin, ymax] = shape;
    let widens = is_wide_accent(base);
    if part != Part::Whole && !widens && !DELIMITERS.contains(&base) {
        return None;
    }
    let grow = |v: i16, n: u8| v * (2 + n as i16) / 2;
    Some(match part {
        Part::Whole => shape,
        Part::Size(n) if widens => [grow(advance, n), xmin, grow(xmax, n), ymin, ymax],
        Part::Size(n) => {
            let extra = 4 * n as i16;
            [advance + extra, xmin, xmax + extra, grow(ymin, n), grow(ymax, n)]
        }
        Part::Top | Part::Middle | Part::Bottom => [advance, xmin, xmax, 0, 24],
        Part::Extension => [advance, xmin, xmax, 0, 16],
    })
}

fn is_wide_accent(symbol: &str) -> bool {
    symbol
        .strip_prefix('\\')
        .is_some_and(|name| WIDE_ACCENTS.contains(&name))
}

fn is_slanted(symbol: &str) -> bool {
    let (base, _) = split_part(symbol);
    let mut chars = base.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_alphabetic(),
        (Some('\\'), Some(_)) => GREEK_LOWER.contains(&&base[1..]),
        _ => false,
    }
}

fn scale(font: Font, dpi: f64) -> f64 {
    font.size * dpi / 72.0 / UNITS_PER_EM
}

impl FontMetrics for FixedMetrics {
    fn metrics(
        &self,
        symbol: &str,
        font: Font,
        dpi: f64,
        _math: bool,
    ) -> Result<GlyphMetrics, UnknownGlyph> {
        let Some([advance, xmin, xmax, ymin, ymax]) = shape(symbol) else {
            return Err(UnknownGlyph {
                symbol: symbol.to_string(),
                font,
                dpi,
            });
        };
        let s = scale(font, dpi);
        Ok(GlyphMetrics {
            advance: advance as f64 * s,
            width: (xmax - xmin) as f64 * s,
            xmin: xmin as f64 * s,
            xmax: xmax as f64 * s,
            ymin: ymin as f64 * s,
            ymax: ymax as f64 * s,
            iceberg: ymax as f64 * s,
            slanted: font.variant.is_italic() && is_slanted(symbol),
        })
    }

    fn kern(
        &self,
        font1: Font,
        symbol1: &str,
        font2: Font,
        symbol2: &str,
        dpi: f64,
    ) -> Result<f64, UnknownGlyph> {
        if font1 != font2 {
            return Ok(0.0);
        }
        Ok(KERNING_PAIRS
            .iter()
            .find(|(left, right, _)| *left == symbol1 && *right == symbol2)
            .map(|(_, _, kern)| *kern as f64 * scale(font1, dpi))
            .unwrap_or(0.0))
    }

    fn underline_thickness(&self, font: Font, dpi: f64) -> f64 {
        0.75 / 12.0 * font.size * dpi / 72.0
    }

    fn x_height(&self, font: Font, dpi: f64) -> Result<f64, UnknownGlyph> {
        Ok(self.metrics("x", font, dpi, true)?.ymax)
    }

    fn sized_alternatives(&self, symbol: &str, font: Font) -> Vec<(Font, String)> {
        if !is_wide_accent(symbol) && !DELIMITERS.contains(&symbol) {
            return vec![(font, symbol.to_string())];
        }
        std::iter::once(symbol.to_string())
            .chain((1..=3).map(|n| format!("{symbol}.size{n}")))
            .map(|s| (font, s))
            .collect()
    }

    fn extensible(&self, symbol: &str, _font: Font) -> Option<Extensible> {
        let piece = |suffix: &str| Some(format!("{symbol}.{suffix}"));
        match symbol {
            "(" | ")" | "[" | "]" => Some(Extensible {
                top: piece("top"),
                middle: None,
                bottom: piece("bot"),
                repeat: format!("{symbol}.ext"),
            }),
            "{" | "}" => Some(Extensible {
                top: piece("top"),
                middle: piece("mid"),
                bottom: piece("bot"),
                repeat: format!("{symbol}.ext"),
            }),
            "|" | r"\|" => Some(Extensible {
                top: None,
                middle: None,
                bottom: None,
                repeat: format!("{symbol}.ext"),
            }),
            _ => None,
        }
    }
}
