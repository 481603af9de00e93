//! # mtex language
//!
//! This crate reads the subset of LaTeX used for math labels:
//!     plain text with embedded math expressions like `$x^2$`.
//!
//! The [lexer] splits the source into [token]s,
//!     the [parse] module builds the syntax tree defined in [ast],
//!     and [walk] and [print] traverse and print it back.
//! Parsing does not need fonts or any other information about how the
//!     result will be typeset.
//!
//! ```
//! use mtex_lang::ast::Node;
//!
//! let list = mtex_lang::parse(r"area $\pi r^2$").unwrap();
//! assert_eq!(list.len(), 3);
//! assert!(matches!(list.nodes[2], Node::MathExpr(_)));
//! assert_eq!(list.to_string(), r"area $\pi r^2$");
//! ```
//!
//! Errors carry the source span where they occurred:
//!
//! ```
//! let err = mtex_lang::parse(r"$x^1^2$").unwrap_err();
//! assert!(matches!(err, mtex_lang::Error::DoubleScript { .. }));
//! assert_eq!(err.main_span(), 4..5);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod parse;
pub mod print;
pub mod token;
pub mod walk;

pub use error::Error;
pub use parse::parse;
