//! # mtex
//!
//! mtex typesets labels written in the LaTeX math subset:
//!     plain text with embedded math expressions like `$x^2$`.
//! The result is a list of glyph and rectangle drawing operations that
//!     any [Renderer] can draw.
//!
//! The pipeline has three stages.
//! The expression is parsed by [mtex_lang];
//!     the [expand] module turns the syntax tree into boxes, using
//!     [FontMetrics] for the dimensions of glyphs;
//!     and [mtex_boxes] packs the boxes and ships them out as operations.
//!
//! ```
//! use mtex_font::fixed::FixedMetrics;
//!
//! let tree = mtex::layout("hello", 10.0, 72.0, &FixedMetrics).unwrap();
//! assert_eq!(tree.width(), 20.625);
//! assert_eq!(tree.height(), 6.875);
//! assert_eq!(tree.depth(), 0.15625);
//! ```
//!
//! Layout parameters can also be bundled in [Settings]:
//!
//! ```
//! use mtex_font::fixed::FixedMetrics;
//!
//! let settings = mtex::Settings::default();
//! let tree = settings.layout(r"$\frac{a}{b}$", &FixedMetrics).unwrap();
//! assert!(tree.depth() > 0.0);
//! ```

pub mod error;
pub mod expand;
pub mod handlers;
pub mod state;
pub mod symbols;

pub use error::Error;
pub use mtex_boxes::{Op, Renderer, Tree};
pub use mtex_font::FontMetrics;

use expand::Expander;
use mtex_lang::ast;

/// Parses an expression into a syntax tree.
pub fn parse_expression(text: &str) -> Result<ast::List<'_>, Error> {
    Ok(mtex_lang::parse(text)?)
}

/// Lays out an expression.
///
/// The font size is in points and the result is measured in pixels at the
/// provided resolution.
pub fn layout(
    text: &str,
    font_size: f64,
    dpi: f64,
    metrics: &dyn FontMetrics,
) -> Result<Tree, Error> {
    let list = parse_expression(text)?;
    log::debug!(
        "parsed {} bytes into {} top-level nodes",
        text.len(),
        list.len()
    );
    let b = Expander::new(metrics, dpi).expand(&list, font_size)?;
    log::debug!(
        "expanded into a box of width {}, height {} and depth {}",
        b.width,
        b.height,
        b.depth
    );
    Ok(b.into())
}

/// Lays out an expression and draws it with the renderer.
///
/// The canvas is as wide as the box and as tall as its height plus its
/// depth.
pub fn render<R: Renderer>(
    mut renderer: R,
    text: &str,
    font_size: f64,
    dpi: f64,
    metrics: &dyn FontMetrics,
) -> Result<(), Error> {
    let tree = layout(text, font_size, dpi, metrics)?;
    let shipment = mtex_boxes::ship(0.0, 0.0, &tree);
    log::debug!("shipped {} drawing operations", shipment.ops.len());
    renderer
        .render(
            shipment.width,
            shipment.height + shipment.depth,
            dpi,
            &shipment.ops,
        )
        .map_err(|err| Error::Render(Box::new(err)))
}

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Font size in points.
    pub font_size: f64,
    /// Resolution in dots per inch.
    pub dpi: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            font_size: 12.0,
            dpi: 72.0,
        }
    }
}

impl Settings {
    pub fn layout(&self, text: &str, metrics: &dyn FontMetrics) -> Result<Tree, Error> {
        layout(text, self.font_size, self.dpi, metrics)
    }

    pub fn render<R: Renderer>(
        &self,
        renderer: R,
        text: &str,
        metrics: &dyn FontMetrics,
    ) -> Result<(), Error> {
        render(renderer, text, self.font_size, self.dpi, metrics)
    }
}
