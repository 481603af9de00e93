//! Scanner for the LaTeX math subset.

use crate::token::{Kind, Token};

/// Scanner that splits a source string into tokens.
///
/// The scanner is an iterator.
/// The last token it returns is always [Kind::Eof], positioned at the
/// length of the source.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    /// Byte offset of the next token.
    pos: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            done: false,
        }
    }

    /// Restarts scanning from the beginning of the source.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.done = false;
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let start = self.pos;
        let rest = &self.source[start..];
        let mut iter = rest.chars().peekable();
        let Some(c) = iter.next() else {
            self.done = true;
            return Some(Token {
                kind: Kind::Eof,
                pos: start,
                text: "",
            });
        };
        let mut len = c.len_utf8();
        use Kind::*;
        let kind = match c {
            c if c.is_whitespace() => {
                while let Some(n) = iter.next_if(|n| n.is_whitespace()) {
                    len += n.len_utf8();
                }
                self.pos += len;
                return Some(Token {
                    kind: Symbol,
                    pos: start,
                    text: " ",
                });
            }
            '%' => {
                while let Some(n) = iter.next_if(|n| *n != '\n') {
                    len += n.len_utf8();
                }
                Comment
            }
            '\\' => match iter.next() {
                None => Invalid,
                Some(n) if n.is_ascii_alphabetic() => {
                    len += 1;
                    while let Some(n) = iter.next_if(char::is_ascii_alphabetic) {
                        len += n.len_utf8();
                    }
                    Macro
                }
                Some(n) => {
                    len += n.len_utf8();
                    Macro
                }
            },
            '{' => LBrace,
            '}' => RBrace,
            '[' => LBracket,
            ']' => RBracket,
            '_' => Underscore,
            '^' => Caret,
            '$' => Dollar,
            '0'..='9' => {
                let mut seen_point = false;
                loop {
                    match iter.peek() {
                        Some(n) if n.is_ascii_digit() => {}
                        Some('.') if !seen_point => seen_point = true,
                        _ => break,
                    }
                    iter.next();
                    len += 1;
                }
                Number
            }
            '.' if iter.peek().is_some_and(char::is_ascii_digit) => {
                while let Some(n) = iter.next_if(char::is_ascii_digit) {
                    len += n.len_utf8();
                }
                Number
            }
            c if c.is_alphabetic() => {
                while let Some(n) = iter.next_if(|n| n.is_alphabetic()) {
                    len += n.len_utf8();
                }
                Word
            }
            _ => Symbol,
        };
        self.pos += len;
        Some(Token {
            kind,
            pos: start,
            text: &self.source[start..start + len],
        })
    }
}
