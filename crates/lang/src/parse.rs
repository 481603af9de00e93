//! Recursive descent parser.
//!
//! The parser makes a single pass over the tokens with one token of
//! lookahead.
//! In text mode whitespace is kept and script markers are ordinary
//! symbols.
//! In math mode whitespace is dropped and `^`/`_` attach the next token or
//! brace group to the preceding node.

use crate::ast::*;
use crate::error::Error;
use crate::lexer::Scanner;
use crate::macros;
use crate::token::{Kind, Token};
use std::iter::Peekable;
use std::ops::Range;

/// Parses LaTeX source into a list of nodes.
pub fn parse(source: &str) -> Result<List<'_>, Error> {
    let mut parser = Parser {
        tokens: Scanner::new(source).peekable(),
        len: source.len(),
    };
    let (list, _) = parser.parse_list(Mode::Text, Until::Eof)?;
    log::trace!("parsed {} top level nodes", list.len());
    Ok(list)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Math,
}

/// What closes the list being parsed.
#[derive(Debug, Clone, Copy)]
enum Until {
    Eof,
    /// A `}` matching the `{` at the given position.
    Brace(usize),
    /// A `]` matching the `[` at the given position.
    Bracket(usize),
    /// The closing delimiter of the math expression opened at the given
    /// position.
    Math(MathDelim, usize),
}

impl Until {
    /// Error for a list that stops before its closing delimiter.
    fn unclosed(self, stop: Range<usize>) -> Option<Error> {
        match self {
            Until::Eof => None,
            Until::Brace(pos) => Some(Error::UnterminatedGroup {
                delimiter: '{',
                span: pos..pos + 1,
            }),
            Until::Bracket(pos) => Some(Error::UnterminatedGroup {
                delimiter: '[',
                span: pos..pos + 1,
            }),
            Until::Math(delim, left) => Some(Error::UnterminatedMath {
                delim,
                open: left..left + delim.open().len(),
                stop,
            }),
        }
    }

    /// Whether the macro with the given name closes the list.
    fn closed_by_macro(self, name: &str) -> bool {
        matches!(
            (self, name),
            (Until::Math(MathDelim::Paren, _), r"\)") | (Until::Math(MathDelim::Bracket, _), r"\]")
        )
    }
}

struct Parser<'a> {
    tokens: Peekable<Scanner<'a>>,
    len: usize,
}

impl<'a> Parser<'a> {
    fn eof(&self) -> Token<'a> {
        Token {
            kind: Kind::Eof,
            pos: self.len,
            text: "",
        }
    }

    /// Drops comments, and whitespace in math mode.
    fn skip(&mut self, mode: Mode) {
        while self
            .tokens
            .next_if(|t| t.kind == Kind::Comment || (mode == Mode::Math && t.is_space()))
            .is_some()
        {}
    }

    fn peek(&mut self, mode: Mode) -> Token<'a> {
        self.skip(mode);
        let eof = self.eof();
        self.tokens.peek().copied().unwrap_or(eof)
    }

    fn next(&mut self, mode: Mode) -> Token<'a> {
        self.skip(mode);
        let eof = self.eof();
        self.tokens.next().unwrap_or(eof)
    }

    /// Parses nodes until the closing delimiter described by `until`.
    ///
    /// Returns the list and the position of the closing delimiter.
    fn parse_list(&mut self, mode: Mode, until: Until) -> Result<(List<'a>, usize), Error> {
        let mut nodes: Vec<Node<'a>> = vec![];
        // Markers of the scripts attached to the current base.
        let mut sup: Option<Range<usize>> = None;
        let mut sub: Option<Range<usize>> = None;
        loop {
            let token = self.next(mode);
            use Kind::*;
            let node: Node<'a> = match token.kind {
                Eof => {
                    return match until.unclosed(token.span()) {
                        None => Ok((List::new(nodes), token.pos)),
                        Some(err) => Err(err),
                    };
                }
                Comment => continue,
                Invalid => return Err(Error::Lex { span: token.span() }),
                RBrace => {
                    if let Until::Brace(_) = until {
                        return Ok((List::new(nodes), token.pos));
                    }
                    return Err(Error::UnterminatedGroup {
                        delimiter: '}',
                        span: token.span(),
                    });
                }
                RBracket if matches!(until, Until::Bracket(_)) => {
                    return Ok((List::new(nodes), token.pos));
                }
                Dollar if mode == Mode::Math => {
                    let closes = match until {
                        Until::Math(MathDelim::Inline, _) => true,
                        Until::Math(MathDelim::Display, _) => {
                            self.tokens.next_if(|t| t.kind == Dollar).is_some()
                        }
                        _ => false,
                    };
                    if closes {
                        return Ok((List::new(nodes), token.pos));
                    }
                    if let Some(err) = until.unclosed(token.span()) {
                        return Err(err);
                    }
                    self.parse_dollar_math(token)?.into()
                }
                Dollar => self.parse_dollar_math(token)?.into(),
                Macro if until.closed_by_macro(token.text) => {
                    return Ok((List::new(nodes), token.pos));
                }
                Macro if mode == Mode::Text && token.text == r"\(" => {
                    self.parse_math(MathDelim::Paren, token.pos)?.into()
                }
                Macro if mode == Mode::Text && token.text == r"\[" => {
                    self.parse_math(MathDelim::Bracket, token.pos)?.into()
                }
                Macro => self.parse_macro(token, mode)?.into(),
                LBrace => self.parse_group(token, mode)?.into(),
                Caret | Underscore if mode == Mode::Math => {
                    let slot = if token.kind == Caret {
                        &mut sup
                    } else {
                        &mut sub
                    };
                    if let Some(first) = slot.clone() {
                        return Err(Error::DoubleScript {
                            first,
                            second: token.span(),
                        });
                    }
                    *slot = Some(token.span());
                    let script = Script {
                        marker: token.pos,
                        node: Box::new(self.parse_script_target(token, until)?),
                    };
                    nodes.push(if token.kind == Caret {
                        Node::Super(script)
                    } else {
                        Node::Sub(script)
                    });
                    continue;
                }
                Word => crate::ast::Word {
                    pos: token.pos,
                    text: token.text,
                }
                .into(),
                Number => Literal {
                    pos: token.pos,
                    text: token.text,
                }
                .into(),
                Symbol | LBracket | RBracket | Caret | Underscore => crate::ast::Symbol {
                    pos: token.pos,
                    text: token.text,
                }
                .into(),
            };
            sup = None;
            sub = None;
            nodes.push(node);
        }
    }

    /// Parses a math expression opened by `$` or `$$`.
    fn parse_dollar_math(&mut self, dollar: Token<'a>) -> Result<MathExpr<'a>, Error> {
        if self.tokens.next_if(|t| t.kind == Kind::Dollar).is_none() {
            return self.parse_math(MathDelim::Inline, dollar.pos);
        }
        // Whitespace is dropped inside display math either way.
        self.skip(Mode::Math);
        if self.tokens.peek().map_or(true, |t| t.kind == Kind::Eof) {
            // `$$` at the end of the input is an empty inline expression.
            return Ok(MathExpr {
                delim: MathDelim::Inline,
                left: dollar.pos,
                list: List::default(),
                right: dollar.pos + 1,
            });
        }
        self.parse_math(MathDelim::Display, dollar.pos)
    }

    fn parse_math(&mut self, delim: MathDelim, left: usize) -> Result<MathExpr<'a>, Error> {
        let (list, right) = self.parse_list(Mode::Math, Until::Math(delim, left))?;
        Ok(MathExpr {
            delim,
            left,
            list,
            right,
        })
    }

    fn parse_group(&mut self, lbrace: Token<'a>, mode: Mode) -> Result<List<'a>, Error> {
        let (list, _) = self.parse_list(mode, Until::Brace(lbrace.pos))?;
        Ok(list)
    }

    fn parse_macro(&mut self, token: Token<'a>, mode: Mode) -> Result<Macro<'a>, Error> {
        let name = Ident {
            pos: token.pos,
            name: token.text,
        };
        let arity = macros::arity(token.text);
        let mut args: Vec<Node<'a>> = vec![];
        if arity.optional && self.peek(mode).kind == Kind::LBracket {
            let lbracket = self.next(mode);
            let (list, rbracket) = self.parse_list(Mode::Math, Until::Bracket(lbracket.pos))?;
            args.push(
                OptArg {
                    lbracket: lbracket.pos,
                    list,
                    rbracket,
                }
                .into(),
            );
        }
        let arg_mode = if arity.text { Mode::Text } else { mode };
        for _ in 0..arity.required {
            if self.peek(mode).kind != Kind::LBrace {
                log::trace!("{} is missing a required argument", token.text);
                break;
            }
            let lbrace = self.next(mode);
            let (list, rbrace) = self.parse_list(arg_mode, Until::Brace(lbrace.pos))?;
            args.push(
                Arg {
                    lbrace: lbrace.pos,
                    list,
                    rbrace,
                }
                .into(),
            );
        }
        Ok(Macro { name, args })
    }

    /// Parses the single token or brace group following a script marker.
    fn parse_script_target(&mut self, marker: Token<'a>, until: Until) -> Result<Node<'a>, Error> {
        let token = self.next(Mode::Math);
        let missing = Error::MissingScript {
            marker: marker.span(),
        };
        use Kind::*;
        Ok(match token.kind {
            Word => crate::ast::Word {
                pos: token.pos,
                text: token.text,
            }
            .into(),
            Number => Literal {
                pos: token.pos,
                text: token.text,
            }
            .into(),
            RBracket if matches!(until, Until::Bracket(_)) => return Err(missing),
            Symbol | LBracket | RBracket => crate::ast::Symbol {
                pos: token.pos,
                text: token.text,
            }
            .into(),
            LBrace => self.parse_group(token, Mode::Math)?.into(),
            Macro if until.closed_by_macro(token.text) => return Err(missing),
            Macro => self.parse_macro(token, Mode::Math)?.into(),
            Invalid => return Err(Error::Lex { span: token.span() }),
            RBrace | Dollar | Caret | Underscore | Comment | Eof => return Err(missing),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::inspect;

    fn word(pos: usize, text: &str) -> Node<'_> {
        Word { pos, text }.into()
    }

    fn sym(pos: usize, text: &str) -> Node<'_> {
        Symbol { pos, text }.into()
    }

    fn lit(pos: usize, text: &str) -> Node<'_> {
        Literal { pos, text }.into()
    }

    fn mac<'a>(pos: usize, name: &'a str, args: Vec<Node<'a>>) -> Node<'a> {
        Macro {
            name: Ident { pos, name },
            args,
        }
        .into()
    }

    fn arg(lbrace: usize, nodes: Vec<Node<'_>>, rbrace: usize) -> Node<'_> {
        Arg {
            lbrace,
            list: List::new(nodes),
            rbrace,
        }
        .into()
    }

    fn opt_arg(lbracket: usize, nodes: Vec<Node<'_>>, rbracket: usize) -> Node<'_> {
        OptArg {
            lbracket,
            list: List::new(nodes),
            rbracket,
        }
        .into()
    }

    fn group(nodes: Vec<Node<'_>>) -> Node<'_> {
        List::new(nodes).into()
    }

    fn math(delim: MathDelim, left: usize, nodes: Vec<Node<'_>>, right: usize) -> Node<'_> {
        MathExpr {
            delim,
            left,
            list: List::new(nodes),
            right,
        }
        .into()
    }

    fn sup(marker: usize, node: Node<'_>) -> Node<'_> {
        Node::Super(Script {
            marker,
            node: Box::new(node),
        })
    }

    fn sub(marker: usize, node: Node<'_>) -> Node<'_> {
        Node::Sub(Script {
            marker,
            node: Box::new(node),
        })
    }

    use MathDelim::*;

    macro_rules! parse_tests {
        ( $( ($name: ident, $source: expr, $want: expr, ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let got = parse($source).unwrap();
                    let want = List::new($want);
                    assert_eq!(got, want);
                }
            )+
        };
    }

    parse_tests!(
        (single_word, "hello", vec![word(0, "hello")],),
        (
            words,
            "hello world",
            vec![word(0, "hello"), sym(5, " "), word(6, "world")],
        ),
        (
            empty_equation,
            "empty equation $$",
            vec![
                word(0, "empty"),
                sym(5, " "),
                word(6, "equation"),
                sym(14, " "),
                math(Inline, 15, vec![], 16),
            ],
        ),
        (
            empty_equation_before_trailing_space,
            "empty equation $$\n",
            vec![
                word(0, "empty"),
                sym(5, " "),
                word(6, "equation"),
                sym(14, " "),
                math(Inline, 15, vec![], 16),
            ],
        ),
        (
            sign_number_and_word,
            "$+10x$",
            vec![math(
                Inline,
                0,
                vec![sym(1, "+"), lit(2, "10"), word(4, "x")],
                5
            )],
        ),
        (
            empty_group,
            "${}+10x$",
            vec![math(
                Inline,
                0,
                vec![group(vec![]), sym(3, "+"), lit(4, "10"), word(6, "x")],
                7
            )],
        ),
        (
            macro_without_arguments,
            r"$\cos$",
            vec![math(Inline, 0, vec![mac(1, r"\cos", vec![])], 5)],
        ),
        (
            sqrt,
            r"$\sqrt{2x\pi}$",
            vec![math(
                Inline,
                0,
                vec![mac(
                    1,
                    r"\sqrt",
                    vec![arg(
                        6,
                        vec![lit(7, "2"), word(8, "x"), mac(9, r"\pi", vec![])],
                        12
                    )]
                )],
                13
            )],
        ),
        (
            sqrt_with_degree,
            r"$\sqrt[3]{2x\pi}$",
            vec![math(
                Inline,
                0,
                vec![mac(
                    1,
                    r"\sqrt",
                    vec![
                        opt_arg(6, vec![lit(7, "3")], 8),
                        arg(
                            9,
                            vec![lit(10, "2"), word(11, "x"), mac(12, r"\pi", vec![])],
                            15
                        ),
                    ]
                )],
                16
            )],
        ),
        (
            fraction,
            r"$\frac{num}{den}$",
            vec![math(
                Inline,
                0,
                vec![mac(
                    1,
                    r"\frac",
                    vec![
                        arg(6, vec![word(7, "num")], 10),
                        arg(11, vec![word(12, "den")], 15),
                    ]
                )],
                16
            )],
        ),
        (
            function_name_takes_no_argument,
            r"$\exp{x}$",
            vec![math(
                Inline,
                0,
                vec![mac(1, r"\exp", vec![]), group(vec![word(6, "x")])],
                8
            )],
        ),
        (
            missing_argument,
            r"$\frac{1}x$",
            vec![math(
                Inline,
                0,
                vec![mac(1, r"\frac", vec![arg(6, vec![lit(7, "1")], 8)]), word(9, "x")],
                10
            )],
        ),
        (
            superscript_macro,
            r"$e^\pi$",
            vec![math(
                Inline,
                0,
                vec![word(1, "e"), sup(2, mac(3, r"\pi", vec![]))],
                6
            )],
        ),
        (
            subscript,
            "$x_i$",
            vec![math(Inline, 0, vec![word(1, "x"), sub(2, word(3, "i"))], 4)],
        ),
        (
            sum_with_limits,
            r"$\sum_{i=0}^{n}$",
            vec![math(
                Inline,
                0,
                vec![
                    mac(1, r"\sum", vec![]),
                    sub(5, group(vec![word(7, "i"), sym(8, "="), lit(9, "0")])),
                    sup(11, group(vec![word(13, "n")])),
                ],
                15
            )],
        ),
        (
            nested_scripts,
            "$x^{y^z}$",
            vec![math(
                Inline,
                0,
                vec![
                    word(1, "x"),
                    sup(2, group(vec![word(4, "y"), sup(5, word(6, "z"))])),
                ],
                8
            )],
        ),
        (
            math_drops_whitespace,
            r"$\cos 3\pi$",
            vec![math(
                Inline,
                0,
                vec![mac(1, r"\cos", vec![]), lit(6, "3"), mac(7, r"\pi", vec![])],
                10
            )],
        ),
        (
            script_target_after_whitespace,
            "$x^ 2$",
            vec![math(Inline, 0, vec![word(1, "x"), sup(2, lit(4, "2"))], 5)],
        ),
        (
            display_math,
            "$$x$$",
            vec![math(Display, 0, vec![word(2, "x")], 3)],
        ),
        (
            paren_math,
            r"\(x\)",
            vec![math(Paren, 0, vec![word(2, "x")], 3)],
        ),
        (
            bracket_math,
            r"\[x\]",
            vec![math(Bracket, 0, vec![word(2, "x")], 3)],
        ),
        (
            brackets_in_math,
            "$[x]$",
            vec![math(
                Inline,
                0,
                vec![sym(1, "["), word(2, "x"), sym(3, "]")],
                4
            )],
        ),
        (
            scripts_in_text,
            "a_b^c",
            vec![
                word(0, "a"),
                sym(1, "_"),
                word(2, "b"),
                sym(3, "^"),
                word(4, "c"),
            ],
        ),
        (
            comments_are_dropped,
            "a%c\nb",
            vec![word(0, "a"), sym(3, " "), word(4, "b")],
        ),
        (
            text_macro_keeps_whitespace,
            r"$\text{a b}$",
            vec![math(
                Inline,
                0,
                vec![mac(
                    1,
                    r"\text",
                    vec![arg(6, vec![word(7, "a"), sym(8, " "), word(9, "b")], 10)]
                )],
                11
            )],
        ),
        (
            math_inside_text_macro,
            r"\mbox{$x$}",
            vec![mac(
                0,
                r"\mbox",
                vec![arg(5, vec![math(Inline, 6, vec![word(7, "x")], 8)], 9)]
            )],
        ),
        (
            one_script_of_each_kind,
            "$x^1_2$",
            vec![math(
                Inline,
                0,
                vec![word(1, "x"), sup(2, lit(3, "1")), sub(4, lit(5, "2"))],
                6
            )],
        ),
        (
            scripts_reset_after_base,
            "$x^1y^2$",
            vec![math(
                Inline,
                0,
                vec![
                    word(1, "x"),
                    sup(2, lit(3, "1")),
                    word(4, "y"),
                    sup(5, lit(6, "2")),
                ],
                7
            )],
        ),
    );

    #[test]
    fn mixed_text_and_math() {
        let source = r"$\sqrt{\frac{e^{3i\pi}}{2\cos 3\pi}}$ \textbf{APLAS} Dummy -- $\sqrt{s}=13\,$TeV $\mathcal{L}\,=\,3\,ab^{-1}$";
        let list = parse(source).unwrap();
        let kinds: Vec<&str> = list.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "MathExpr", "Symbol", "Macro", "Symbol", "Word", "Symbol", "Symbol", "Symbol",
                "Symbol", "MathExpr", "Word", "Symbol", "MathExpr",
            ]
        );
        let Node::MathExpr(last) = &list.nodes[12] else {
            panic!("not a math expression");
        };
        let kinds: Vec<&str> = last.list.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec!["Macro", "Macro", "Symbol", "Macro", "Literal", "Macro", "Word", "Super"]
        );
    }

    #[test]
    fn spans_match_source() {
        let source = r"Let $\sqrt[n]{x_1^2} + \frac{a}{b}$ be % note
            {the $$\hat{y}$$ value}";
        let list = parse(source).unwrap();
        let mut count = 0;
        for node in &list {
            inspect(node, |node| {
                count += 1;
                let (Some(pos), Some(end)) = (node.pos(), node.end()) else {
                    return true;
                };
                assert!(pos < end, "{node:?}");
                let text = match node {
                    Node::Word(w) => Some(w.text),
                    Node::Literal(l) => Some(l.text),
                    Node::Ident(i) => Some(i.name),
                    Node::Symbol(s) if s.text != " " => Some(s.text),
                    _ => None,
                };
                if let Some(text) = text {
                    assert_eq!(&source[pos..end], text);
                }
                true
            });
        }
        assert!(count > 20);
        assert_eq!(list.end(), Some(source.len() - 1));
    }
}
