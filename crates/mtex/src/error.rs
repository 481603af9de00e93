use mtex_font::UnknownGlyph;
use std::ops::Range;

/// Error encountered while laying out or rendering an expression.
#[derive(Debug)]
pub enum Error {
    /// The expression could not be parsed.
    Parse(mtex_lang::Error),

    /// A macro was given fewer arguments than it needs.
    MalformedMacro {
        name: String,
        span: Range<usize>,
        required: usize,
        got: usize,
    },

    /// The font has no metrics for a glyph.
    UnknownGlyph {
        glyph: UnknownGlyph,
        /// The node that needed the glyph.
        span: Option<Range<usize>>,
    },

    /// The renderer failed.
    Render(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn message(&self) -> String {
        use Error::*;
        match self {
            Parse(err) => err.message(),
            MalformedMacro { name, .. } => format!["Malformed macro `{name}`"],
            UnknownGlyph { glyph, .. } => format!["Unknown glyph `{}`", glyph.symbol],
            Render(err) => format!["Rendering failed: {err}"],
        }
    }

    /// The part of the source the error is about, if any.
    pub fn main_span(&self) -> Option<Range<usize>> {
        use Error::*;
        match self {
            Parse(err) => Some(err.main_span()),
            MalformedMacro { span, .. } => Some(span.clone()),
            UnknownGlyph { span, .. } => span.clone(),
            Render(_) => None,
        }
    }

    pub fn labels(&self) -> Vec<mtex_lang::error::ErrorLabel> {
        use Error::*;
        match self {
            Parse(err) => err.labels(),
            MalformedMacro {
                span,
                required,
                got,
                ..
            } => vec![mtex_lang::error::ErrorLabel {
                span: span.clone(),
                text: format!["expected {required} argument(s), got {got}"],
            }],
            UnknownGlyph {
                glyph,
                span: Some(span),
            } => vec![mtex_lang::error::ErrorLabel {
                span: span.clone(),
                text: format!["font {} has no glyph `{}`", glyph.font, glyph.symbol],
            }],
            UnknownGlyph { span: None, .. } | Render(_) => vec![],
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use Error::*;
        match self {
            Parse(err) => err.notes(),
            MalformedMacro { name, .. } if name == r"\hspace" => {
                vec![r"The argument of \hspace must be a number, as in \hspace{2}".to_string()]
            }
            MalformedMacro { .. } => vec![],
            UnknownGlyph { glyph, .. } => vec![format!["{glyph}"]],
            Render(_) => vec![],
        }
    }

    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'a>(
        &self,
        file_name: &'a str,
    ) -> ariadne::Report<'static, (&'a str, Range<usize>)> {
        let span = self.main_span().unwrap_or(0..0);
        let mut report = ariadne::Report::build(ariadne::ReportKind::Error, (file_name, span))
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

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.main_span() {
            Some(span) => write!(f, "{} at {}..{}", self.message(), span.start, span.end),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use Error::*;
        match self {
            Parse(err) => Some(err),
            UnknownGlyph { glyph, .. } => Some(glyph),
            Render(err) => Some(err.as_ref()),
            MalformedMacro { .. } => None,
        }
    }
}

impl From<mtex_lang::Error> for Error {
    fn from(err: mtex_lang::Error) -> Self {
        Error::Parse(err)
    }
}

impl From<UnknownGlyph> for Error {
    fn from(glyph: UnknownGlyph) -> Self {
        Error::UnknownGlyph { glyph, span: None }
    }
}
