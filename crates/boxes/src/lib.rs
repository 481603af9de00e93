//! # mtex boxes
//!
//! The box-and-glue engine behind mtex.
//! It is independent of the input language:
//!     the [node] module defines the lists produced by math layout,
//!     [pack] computes their dimensions,
//!     [delimiter] selects glyphs that grow with their content,
//!     and [ship] turns a packed tree into drawing operations.

pub mod delimiter;
pub mod node;
pub mod pack;
pub mod ship;

pub use node::{Horizontal, Tree, Vertical};
pub use pack::Target;
pub use ship::{ship, Op, Renderer, Shipment};
