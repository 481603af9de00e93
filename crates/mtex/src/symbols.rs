//! Symbol tables for math layout.
//!
//! Symbols are named the way the font-metrics capability names glyphs:
//! single characters by themselves and macros with their escape marker.

/// Binary operators, spaced on both sides unless used as a sign.
pub const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", r"\pm", r"\mp", r"\times", r"\div", r"\cdot", r"\ast", r"\star", r"\circ",
    r"\bullet", r"\oplus", r"\ominus", r"\otimes", r"\oslash", r"\odot", r"\cup", r"\cap",
    r"\sqcup", r"\sqcap", r"\wedge", r"\vee", r"\land", r"\lor", r"\setminus", r"\uplus",
    r"\amalg", r"\dagger", r"\ddagger", r"\wr", r"\bigtriangleup", r"\bigtriangledown",
    r"\triangleleft", r"\triangleright",
];

/// Relations, always spaced on both sides.
pub const RELATIONS: &[&str] = &[
    "=", "<", ">", ":", r"\leq", r"\geq", r"\le", r"\ge", r"\neq", r"\ne", r"\equiv",
    r"\approx", r"\sim", r"\simeq", r"\cong", r"\propto", r"\subset", r"\supset",
    r"\subseteq", r"\supseteq", r"\in", r"\notin", r"\ni", r"\perp", r"\parallel", r"\mid",
    r"\dashv", r"\vdash", r"\models", r"\ll", r"\gg", r"\prec", r"\succ", r"\preceq",
    r"\succeq", r"\asymp", r"\doteq", r"\sqsubseteq", r"\sqsupseteq", r"\bowtie", r"\smile",
    r"\frown",
];

/// Arrows, spaced like relations.
pub const ARROWS: &[&str] = &[
    r"\rightarrow", r"\leftarrow", r"\to", r"\gets", r"\Rightarrow", r"\Leftarrow",
    r"\leftrightarrow", r"\Leftrightarrow", r"\mapsto", r"\longrightarrow", r"\longleftarrow",
    r"\Longrightarrow", r"\Longleftarrow", r"\longmapsto", r"\longleftrightarrow",
    r"\Longleftrightarrow", r"\uparrow", r"\downarrow", r"\Uparrow", r"\Downarrow",
    r"\updownarrow", r"\Updownarrow", r"\hookrightarrow", r"\hookleftarrow",
    r"\rightharpoonup", r"\rightharpoondown", r"\leftharpoonup", r"\leftharpoondown",
    r"\nearrow", r"\searrow", r"\swarrow", r"\nwarrow", r"\iff", r"\implies",
    r"\rightleftharpoons",
];

/// Punctuation, followed by a small space.
pub const PUNCTUATION: &[&str] = &[",", ";"];

/// Opening delimiters, after which a binary operator is a sign.
pub const OPENING_DELIMITERS: &[&str] = &[
    "(", "[", r"\{", r"\langle", r"\lfloor", r"\lceil",
];

/// Lowercase Greek letters, set in the letter font.
pub const GREEK_LOWER: &[&str] = &[
    r"\alpha", r"\beta", r"\gamma", r"\delta", r"\epsilon", r"\varepsilon", r"\zeta", r"\eta",
    r"\theta", r"\vartheta", r"\iota", r"\kappa", r"\lambda", r"\mu", r"\nu", r"\xi", r"\pi",
    r"\varpi", r"\rho", r"\varrho", r"\sigma", r"\varsigma", r"\tau", r"\upsilon", r"\phi",
    r"\varphi", r"\chi", r"\psi", r"\omega",
];

pub const GREEK_UPPER: &[&str] = &[
    r"\Gamma", r"\Delta", r"\Theta", r"\Lambda", r"\Xi", r"\Pi", r"\Sigma", r"\Upsilon",
    r"\Phi", r"\Psi", r"\Omega",
];

const MISC: &[&str] = &[
    r"\infty", r"\partial", r"\nabla", r"\hbar", r"\ell", r"\emptyset", r"\varnothing",
    r"\forall", r"\exists", r"\neg", r"\lnot", r"\prime", r"\ldots", r"\dots", r"\cdots",
    r"\vdots", r"\ddots", r"\aleph", r"\Re", r"\Im", r"\wp", r"\angle", r"\triangle", r"\top",
    r"\bot", r"\backslash", r"\|", r"\langle", r"\rangle", r"\lfloor", r"\rfloor", r"\lceil",
    r"\rceil", r"\iint", r"\iiint",
];

/// Large operators whose limits go above and below in display style.
pub const OVERUNDER_SYMBOLS: &[&str] = &[
    r"\sum", r"\prod", r"\coprod", r"\bigcap", r"\bigcup", r"\bigsqcup", r"\bigvee",
    r"\bigwedge", r"\bigodot", r"\bigotimes", r"\bigoplus", r"\biguplus",
];

/// Function names whose limits go above and below in display style.
pub const OVERUNDER_FUNCTIONS: &[&str] = &[
    r"\lim", r"\liminf", r"\limsup", r"\sup", r"\max", r"\min",
];

/// Integrals, whose scripts hang from the top and bottom of the sign.
pub const DROPSUB_SYMBOLS: &[&str] = &[r"\int", r"\oint"];

/// Function names, set in roman without the escape marker.
pub const FUNCTIONS: &[&str] = &[
    r"\sin", r"\cos", r"\tan", r"\log", r"\ln", r"\exp", r"\lim", r"\max", r"\min", r"\sup",
    r"\inf", r"\det", r"\arg", r"\dim", r"\deg", r"\gcd", r"\hom", r"\ker", r"\sec", r"\csc",
    r"\cot", r"\sinh", r"\cosh", r"\tanh", r"\arcsin", r"\arccos", r"\arctan", r"\Pr", r"\lg",
    r"\liminf", r"\limsup",
];

/// Accent macros and the glyphs drawn for them.
pub const ACCENTS: &[&str] = &[
    r"\hat", r"\check", r"\tilde", r"\bar", r"\vec", r"\dot", r"\ddot", r"\acute", r"\grave",
    r"\breve", r"\mathring",
];

/// Accents that grow with their base.
pub const WIDE_ACCENTS: &[&str] = &[r"\widehat", r"\widetilde", r"\widebar"];

/// Escaped characters and the character they stand for.
pub const ESCAPES: &[(&str, &str)] = &[
    (r"\{", "{"),
    (r"\}", "}"),
    (r"\$", "$"),
    (r"\%", "%"),
    (r"\&", "&"),
    (r"\#", "#"),
    (r"\_", "_"),
];

/// Spacing macros and their widths in ems.
pub const SPACES: &[(&str, f64)] = &[
    (r"\,", 1.0 / 6.0),
    (r"\thinspace", 1.0 / 6.0),
    (r"\/", 1.0 / 6.0),
    (r"\:", 2.0 / 9.0),
    (r"\>", 2.0 / 9.0),
    (r"\;", 5.0 / 18.0),
    (r"\ ", 1.0 / 3.0),
    ("~", 1.0 / 3.0),
    (r"\enspace", 0.5),
    (r"\quad", 1.0),
    (r"\qquad", 2.0),
    (r"\!", -1.0 / 6.0),
];

/// Spacing class of a symbol in math mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Ordinary,
    Binary,
    Relation,
    Opening,
    Punctuation,
}

/// Returns the spacing class of a symbol.
pub fn class(symbol: &str) -> Class {
    if BINARY_OPERATORS.contains(&symbol) {
        Class::Binary
    } else if RELATIONS.contains(&symbol) || ARROWS.contains(&symbol) {
        Class::Relation
    } else if OPENING_DELIMITERS.contains(&symbol) {
        Class::Opening
    } else if PUNCTUATION.contains(&symbol) {
        Class::Punctuation
    } else {
        Class::Ordinary
    }
}

/// Whether the macro names a single glyph.
pub fn is_symbol(name: &str) -> bool {
    [
        GREEK_LOWER,
        GREEK_UPPER,
        BINARY_OPERATORS,
        RELATIONS,
        ARROWS,
        MISC,
        OVERUNDER_SYMBOLS,
        DROPSUB_SYMBOLS,
    ]
    .iter()
    .any(|table| table.contains(&name))
}

pub fn is_overunder(name: &str) -> bool {
    OVERUNDER_SYMBOLS.contains(&name) || OVERUNDER_FUNCTIONS.contains(&name)
}

pub fn is_dropsub(name: &str) -> bool {
    DROPSUB_SYMBOLS.contains(&name)
}

/// Width of a spacing macro in ems.
pub fn space_width(name: &str) -> Option<f64> {
    SPACES
        .iter()
        .find(|(space, _)| *space == name)
        .map(|(_, width)| *width)
}

/// The character an escape sequence stands for.
pub fn unescape(name: &str) -> Option<&'static str> {
    ESCAPES
        .iter()
        .find(|(escape, _)| *escape == name)
        .map(|(_, c)| *c)
}

#[rustfmt::skip]
const UNICODE: &[(&str, char)] = &[
    ("alpha", 'α'), ("beta", 'β'), ("gamma", 'γ'), ("delta", 'δ'), ("epsilon", 'ϵ'),
    ("varepsilon", 'ε'), ("zeta", 'ζ'), ("eta", 'η'), ("theta", 'θ'), ("vartheta", 'ϑ'),
    ("iota", 'ι'), ("kappa", 'κ'), ("lambda", 'λ'), ("mu", 'μ'), ("nu", 'ν'), ("xi", 'ξ'),
    ("pi", 'π'), ("varpi", 'ϖ'), ("rho", 'ρ'), ("varrho", 'ϱ'), ("sigma", 'σ'),
    ("varsigma", 'ς'), ("tau", 'τ'), ("upsilon", 'υ'), ("phi", 'ϕ'), ("varphi", 'φ'),
    ("chi", 'χ'), ("psi", 'ψ'), ("omega", 'ω'),
    ("Gamma", 'Γ'), ("Delta", 'Δ'), ("Theta", 'Θ'), ("Lambda", 'Λ'), ("Xi", 'Ξ'),
    ("Pi", 'Π'), ("Sigma", 'Σ'), ("Upsilon", 'Υ'), ("Phi", 'Φ'), ("Psi", 'Ψ'),
    ("Omega", 'Ω'),
    ("pm", '±'), ("mp", '∓'), ("times", '×'), ("div", '÷'), ("cdot", '⋅'), ("ast", '∗'),
    ("star", '⋆'), ("circ", '∘'), ("bullet", '∙'), ("oplus", '⊕'), ("ominus", '⊖'),
    ("otimes", '⊗'), ("oslash", '⊘'), ("odot", '⊙'), ("cup", '∪'), ("cap", '∩'),
    ("sqcup", '⊔'), ("sqcap", '⊓'), ("wedge", '∧'), ("vee", '∨'), ("land", '∧'),
    ("lor", '∨'), ("setminus", '∖'), ("uplus", '⊎'), ("amalg", '⨿'), ("dagger", '†'),
    ("ddagger", '‡'), ("wr", '≀'), ("bigtriangleup", '△'), ("bigtriangledown", '▽'),
    ("triangleleft", '◁'), ("triangleright", '▷'),
    ("leq", '≤'), ("geq", '≥'), ("le", '≤'), ("ge", '≥'), ("neq", '≠'), ("ne", '≠'),
    ("equiv", '≡'), ("approx", '≈'), ("sim", '∼'), ("simeq", '≃'), ("cong", '≅'),
    ("propto", '∝'), ("subset", '⊂'), ("supset", '⊃'), ("subseteq", '⊆'),
    ("supseteq", '⊇'), ("in", '∈'), ("notin", '∉'), ("ni", '∋'), ("perp", '⟂'),
    ("parallel", '∥'), ("mid", '∣'), ("dashv", '⊣'), ("vdash", '⊢'), ("models", '⊧'),
    ("ll", '≪'), ("gg", '≫'), ("prec", '≺'), ("succ", '≻'), ("preceq", '⪯'),
    ("succeq", '⪰'), ("asymp", '≍'), ("doteq", '≐'), ("sqsubseteq", '⊑'),
    ("sqsupseteq", '⊒'), ("bowtie", '⋈'), ("Join", '⨝'), ("smile", '⌣'), ("frown", '⌢'),
    ("rightarrow", '→'), ("leftarrow", '←'), ("to", '→'), ("gets", '←'),
    ("Rightarrow", '⇒'), ("Leftarrow", '⇐'), ("leftrightarrow", '↔'),
    ("Leftrightarrow", '⇔'), ("mapsto", '↦'), ("longrightarrow", '⟶'),
    ("longleftarrow", '⟵'), ("Longrightarrow", '⟹'), ("Longleftarrow", '⟸'),
    ("longmapsto", '⟼'), ("longleftrightarrow", '⟷'), ("Longleftrightarrow", '⟺'),
    ("uparrow", '↑'), ("downarrow", '↓'), ("Uparrow", '⇑'), ("Downarrow", '⇓'),
    ("updownarrow", '↕'), ("Updownarrow", '⇕'), ("hookrightarrow", '↪'),
    ("hookleftarrow", '↩'), ("rightharpoonup", '⇀'), ("rightharpoondown", '⇁'),
    ("leftharpoonup", '↼'), ("leftharpoondown", '↽'), ("nearrow", '↗'), ("searrow", '↘'),
    ("swarrow", '↙'), ("nwarrow", '↖'), ("iff", '⟺'), ("implies", '⟹'),
    ("rightleftharpoons", '⇌'),
    ("sum", '∑'), ("prod", '∏'), ("coprod", '∐'), ("bigcap", '⋂'), ("bigcup", '⋃'),
    ("bigsqcup", '⨆'), ("bigvee", '⋁'), ("bigwedge", '⋀'), ("bigodot", '⨀'),
    ("bigotimes", '⨂'), ("bigoplus", '⨁'), ("biguplus", '⨄'),
    ("int", '∫'), ("oint", '∮'), ("iint", '∬'), ("iiint", '∭'), ("oiint", '∯'),
    ("infty", '∞'), ("partial", '∂'), ("nabla", '∇'), ("hbar", 'ħ'), ("hslash", 'ℏ'),
    ("ell", 'ℓ'), ("emptyset", '∅'), ("varnothing", '∅'), ("forall", '∀'),
    ("exists", '∃'), ("neg", '¬'), ("lnot", '¬'), ("prime", '′'), ("ldots", '…'),
    ("dots", '…'), ("cdots", '⋯'), ("vdots", '⋮'), ("ddots", '⋱'), ("aleph", 'ℵ'),
    ("Re", 'ℜ'), ("Im", 'ℑ'), ("wp", '℘'), ("angle", '∠'), ("triangle", '△'),
    ("top", '⊤'), ("bot", '⊥'), ("flat", '♭'), ("sharp", '♯'), ("natural", '♮'),
    ("backslash", '\\'), ("|", '‖'), ("langle", '⟨'), ("rangle", '⟩'), ("lfloor", '⌊'),
    ("rfloor", '⌋'), ("lceil", '⌈'), ("rceil", '⌉'), ("__sqrt__", '√'),
    ("hat", 'ˆ'), ("check", 'ˇ'), ("tilde", '˜'), ("bar", '¯'), ("vec", '\u{20d7}'),
    ("dot", '˙'), ("ddot", '¨'), ("acute", '´'), ("grave", '`'), ("breve", '˘'),
    ("mathring", '˚'), ("widehat", 'ˆ'), ("widetilde", '˜'), ("widebar", '¯'),
    ("t", '\u{361}'), ("l", 'ł'), ("L", 'Ł'),
    ("{", '{'), ("}", '}'), ("$", '$'), ("%", '%'), ("&", '&'), ("#", '#'), ("_", '_'),
];

/// Returns the character a renderer should draw for a glyph symbol.
///
/// Sized versions and pieces of delimiters (like `(.size2` or `{.top`)
/// map to the character of the base symbol.
/// In math mode `-` is the minus sign.
pub fn to_unicode(symbol: &str, math: bool) -> Option<char> {
    let base = match symbol.rsplit_once('.') {
        Some((base, suffix))
            if !base.is_empty()
                && matches!(suffix, "size1" | "size2" | "size3" | "top" | "mid" | "ext" | "bot") =>
        {
            base
        }
        _ => symbol,
    };
    if let Some(name) = base.strip_prefix('\\').filter(|name| !name.is_empty()) {
        return UNICODE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c);
    }
    let mut chars = base.chars();
    match (chars.next(), chars.next()) {
        (Some('-'), None) if math => Some('\u{2212}'),
        (Some(c), None) => Some(c),
        _ => None,
    }
}
