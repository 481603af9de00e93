use mtex::{Error, Op, Renderer};
use mtex_font::fixed::FixedMetrics;

#[derive(Default)]
struct Recorder {
    calls: Vec<(f64, f64, f64, Vec<Op>)>,
}

impl Renderer for Recorder {
    type Error = std::fmt::Error;

    fn render(&mut self, width: f64, height: f64, dpi: f64, ops: &[Op]) -> Result<(), Self::Error> {
        self.calls.push((width, height, dpi, ops.to_vec()));
        Ok(())
    }
}

struct Failing;

impl Renderer for Failing {
    type Error = std::fmt::Error;

    fn render(&mut self, _: f64, _: f64, _: f64, _: &[Op]) -> Result<(), Self::Error> {
        Err(std::fmt::Error)
    }
}

#[test]
fn hello_dimensions() {
    let tree = mtex::layout("hello", 10.0, 72.0, &FixedMetrics).unwrap();
    assert_eq!(
        (tree.width(), tree.height(), tree.depth()),
        (20.625, 6.875, 0.15625)
    );
}

#[test]
fn math_words_have_text_width() {
    let text = mtex::layout("hello", 10.0, 72.0, &FixedMetrics).unwrap();
    let math = mtex::layout("$hello$", 10.0, 72.0, &FixedMetrics).unwrap();
    assert_eq!(math.width(), text.width());
}

#[test]
fn dimensions_scale_with_resolution() {
    let low = mtex::layout("hello", 10.0, 72.0, &FixedMetrics).unwrap();
    let high = mtex::layout("hello", 10.0, 144.0, &FixedMetrics).unwrap();
    assert_eq!(high.width(), 2.0 * low.width());
    assert_eq!(high.depth(), 2.0 * low.depth());
}

#[test]
fn fraction_is_deeper_than_numerator() {
    let numerator = mtex::layout("$1$", 10.0, 72.0, &FixedMetrics).unwrap();
    let fraction = mtex::layout(r"$\frac{1}{2}$", 10.0, 72.0, &FixedMetrics).unwrap();
    assert!(fraction.depth() > numerator.depth());
}

macro_rules! render_tests {
    ( $( ($name: ident, $source: expr, ), )+ ) => {
        $(
            #[test]
            fn $name() {
                let mut recorder = Recorder::default();
                mtex::render(&mut recorder, $source, 10.0, 72.0, &FixedMetrics).unwrap();
                assert_eq!(recorder.calls.len(), 1);
                let (width, height, dpi, ops) = &recorder.calls[0];
                assert!(*width > 0.0);
                assert!(*height > 0.0);
                assert_eq!(*dpi, 72.0);
                assert!(!ops.is_empty());
                for op in ops {
                    if let Op::Glyph(glyph) = op {
                        assert!(
                            mtex::symbols::to_unicode(&glyph.symbol, glyph.math).is_some(),
                            "no character for {}",
                            glyph.symbol
                        );
                    }
                }
            }
        )+
    };
}

render_tests!(
    (simple_equation, "math $x= 42$",),
    (
        nested_fraction_in_root,
        r"math $\sum\sqrt{\frac{a+b}{2\pi}}\cos\Phi$",
    ),
    (
        binomial,
        r"math: $\sum\sqrt{\frac{a+b}{2\pi}}\cos\omega\binom{a+b}{\beta}\prod \alpha x$",
    ),
    (integral, r"$\int\frac{\partial x}{x}$",),
    (display_limits, r"$$\lim_{n\to\infty}\sum_{i=0}^{n} x_i^2$$",),
    (
        accents_and_fonts,
        r"$\hat{x}+\widetilde{xyz}\quad\mathbf{v}\cdot\overline{AB}$ \textbf{bold}",
    ),
    (sqrt_with_degree, r"\(\sqrt[3]{x^2+1}\)",),
    (escapes, r"$\{1, 2\}$ costs \$5 \& 10\%",),
);

#[test]
fn fraction_draws_a_rule() {
    let mut recorder = Recorder::default();
    mtex::render(&mut recorder, r"$\frac{1}{2}$", 10.0, 72.0, &FixedMetrics).unwrap();
    let (width, _, _, ops) = &recorder.calls[0];
    let rects: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 1);
    assert!(rects[0].x2 > rects[0].x1);
    assert!(rects[0].x2 <= *width);
}

#[test]
fn minus_is_a_math_glyph() {
    let mut recorder = Recorder::default();
    mtex::render(&mut recorder, "a-b $a-b$", 10.0, 72.0, &FixedMetrics).unwrap();
    let minus: Vec<char> = recorder.calls[0]
        .3
        .iter()
        .filter_map(|op| match op {
            Op::Glyph(g) if g.symbol == "-" => mtex::symbols::to_unicode(&g.symbol, g.math),
            _ => None,
        })
        .collect();
    assert_eq!(minus, vec!['-', '\u{2212}']);
}

#[test]
fn settings() {
    let settings = mtex::Settings::default();
    assert_eq!((settings.font_size, settings.dpi), (12.0, 72.0));
    let tree = settings.layout("hello", &FixedMetrics).unwrap();
    assert_eq!(tree.width(), 132.0 * 12.0 / 64.0);
    let mut recorder = Recorder::default();
    settings.render(&mut recorder, "hello", &FixedMetrics).unwrap();
    assert_eq!(recorder.calls[0].0, tree.width());
}

#[test]
fn parse_errors_are_reported() {
    let err = mtex::layout("$x", 10.0, 72.0, &FixedMetrics).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    let err = mtex::parse_expression("$x^1^2$").unwrap_err();
    assert_eq!(err.main_span(), Some(4..5));
}

#[test]
fn malformed_hspace() {
    let err = mtex::layout(r"$\hspace{x}$", 10.0, 72.0, &FixedMetrics).unwrap_err();
    assert!(matches!(err, Error::MalformedMacro { ref name, .. } if name == r"\hspace"));
}

#[test]
fn renderer_errors_are_wrapped() {
    let err = mtex::render(Failing, "hello", 10.0, 72.0, &FixedMetrics).unwrap_err();
    assert!(matches!(err, Error::Render(_)));
    assert_eq!(err.main_span(), None);
}

#[test]
fn unknown_macros_render_literally() {
    let mut recorder = Recorder::default();
    mtex::render(&mut recorder, r"$\nosuchmacro$", 10.0, 72.0, &FixedMetrics).unwrap();
    let symbols: String = recorder.calls[0]
        .3
        .iter()
        .filter_map(|op| match op {
            Op::Glyph(g) => Some(g.symbol.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(symbols, r"\nosuchmacro");
}
