//! Tokens of the LaTeX math subset.

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An escape marker followed by a name, like `\alpha` or `\,`.
    Macro,
    /// A run of letters.
    Word,
    /// A decimal number like `10`, `2.5` or `.5`.
    Number,
    /// Any other single character, or a run of whitespace.
    Symbol,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Underscore,
    Caret,
    Dollar,
    /// A comment from `%` up to the end of the line.
    Comment,
    /// The end of the input.
    Eof,
    /// An escape marker at the end of the input.
    Invalid,
}

/// A token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: Kind,
    /// Byte offset of the token in the source.
    pub pos: usize,
    /// Text of the token.
    ///
    /// For whitespace this is a single space, whatever the length of the
    /// run in the source.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// The byte offset just after the token.
    pub fn end(&self) -> usize {
        self.pos + self.text.len()
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.pos..self.end()
    }

    /// Whether the token is a whitespace symbol.
    pub fn is_space(&self) -> bool {
        self.kind == Kind::Symbol && self.text == " "
    }
}

impl<'a> std::fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
