use crate::ast::MathDelim;
use std::ops::Range;

/// Error encountered when parsing LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The scanner produced an invalid token, like an escape marker at the
    /// end of the input.
    Lex { span: Range<usize> },

    /// A math expression is not closed.
    UnterminatedMath {
        delim: MathDelim,
        /// The opening delimiter.
        open: Range<usize>,
        /// Where parsing stopped.
        stop: Range<usize>,
    },

    /// A `{` or `[` is not closed, or a `}` has no matching `{`.
    UnterminatedGroup { delimiter: char, span: Range<usize> },

    /// Two superscripts or two subscripts on the same base.
    DoubleScript {
        first: Range<usize>,
        second: Range<usize>,
    },

    /// A `^` or `_` with nothing to attach.
    MissingScript { marker: Range<usize> },
}

impl Error {
    pub fn message(&self) -> String {
        use Error::*;
        match self {
            Lex { .. } => "Invalid token".into(),
            UnterminatedMath { delim, .. } => {
                format!["Math expression opened with `{}` is not closed", delim.open()]
            }
            UnterminatedGroup { delimiter: '}', .. } => "Unmatched closing brace".into(),
            UnterminatedGroup { delimiter, .. } => {
                format!["Group opened with `{delimiter}` is not closed"]
            }
            DoubleScript { .. } => "Double script".into(),
            MissingScript { .. } => "Missing script".into(),
        }
    }

    pub fn main_span(&self) -> Range<usize> {
        use Error::*;
        match self {
            Lex { span } => span.clone(),
            UnterminatedMath { open, .. } => open.clone(),
            UnterminatedGroup { span, .. } => span.clone(),
            DoubleScript { second, .. } => second.clone(),
            MissingScript { marker } => marker.clone(),
        }
    }

    pub fn labels(&self) -> Vec<ErrorLabel> {
        use Error::*;
        match self {
            Lex { span } => vec![ErrorLabel {
                span: span.clone(),
                text: "an escape marker must be followed by a macro name".into(),
            }],
            UnterminatedMath { delim, open, stop } => vec![
                ErrorLabel {
                    span: open.clone(),
                    text: "the math expression starts here".into(),
                },
                ErrorLabel {
                    span: stop.clone(),
                    text: format!["expected `{}` before this point", delim.close()],
                },
            ],
            UnterminatedGroup {
                delimiter: '}',
                span,
            } => vec![ErrorLabel {
                span: span.clone(),
                text: "this brace does not close anything".into(),
            }],
            UnterminatedGroup { delimiter, span } => vec![ErrorLabel {
                span: span.clone(),
                text: format!["this `{delimiter}` is never closed"],
            }],
            DoubleScript { first, second } => vec![
                ErrorLabel {
                    span: second.clone(),
                    text: "the second script appears here".into(),
                },
                ErrorLabel {
                    span: first.clone(),
                    text: "the first script appears here".into(),
                },
            ],
            MissingScript { marker } => vec![ErrorLabel {
                span: marker.clone(),
                text: "nothing follows this marker".into(),
            }],
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use Error::*;
        match self {
            DoubleScript { .. } => vec![
                "Use braces to attach a script to a script, as in `x^{a^b}`".to_string(),
            ],
            MissingScript { .. } => {
                vec!["A script marker must be followed by a token or a brace group".to_string()]
            }
            Lex { .. } | UnterminatedMath { .. } | UnterminatedGroup { .. } => vec![],
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.main_span();
        write!(f, "{} at {}..{}", self.message(), span.start, span.end)
    }
}

impl std::error::Error for Error {}

/// Label on an error message.
///
/// A label identifies a particular piece of source code and some
/// information about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLabel {
    pub span: Range<usize>,
    pub text: String,
}

impl Error {
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'a>(
        &self,
        file_name: &'a str,
    ) -> ariadne::Report<'static, (&'a str, Range<usize>)> {
        let mut report =
            ariadne::Report::build(ariadne::ReportKind::Error, (file_name, self.main_span()))
                .with_message(self.message());
        let mut color = ariadne::Color::BrightRed;
        for label in self.labels() {
            report = report.with_label(
                ariadne::Label::new((file_name, label.span))
                    .with_message(label.text)
                    .with_color(color),
            );
            color = ariadne::Color::BrightYellow;
        }
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}
