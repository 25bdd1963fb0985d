//! # quire-markup
//!
//! Turns Markdown into presentation-ready HTML in two steps: `comrak`
//! conversion with a fixed extension set, then an ordered chain of
//! idempotent tree processors that add Bootstrap classes and wrappers.
//!
//! ## Quick Start
//!
//! ```rust
//! use quire_markup::Renderer;
//!
//! let renderer = Renderer::new();
//! let html = renderer.render("| a |\n|---|\n| 1 |\n\n> [!tip]\n>\n> Use `cargo doc`.");
//!
//! assert!(html.contains("table-responsive"));
//! assert!(html.contains("alert alert-primary"));
//! ```
//!
//! ## Failure handling
//!
//! [`Renderer::render`] never fails. Conversion failures come back as an
//! empty string, an HTML parse failure returns the converter output
//! unstyled, and a failing stage is skipped. Use
//! [`Renderer::render_outcome`] to tell those cases apart:
//!
//! ```rust
//! use quire_markup::{RenderOutcome, Renderer};
//!
//! match Renderer::new().render_outcome("# Title") {
//!   RenderOutcome::Rendered { html, failed_stages, .. } => {
//!     assert!(html.contains("<h1>Title</h1>"));
//!     assert!(failed_stages.is_empty());
//!   },
//!   other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! ## Custom chains
//!
//! ```rust
//! use quire_markup::{
//!   Renderer,
//!   processor::{ImageProcessor, ProcessorChain, TableProcessor},
//! };
//!
//! let chain = ProcessorChain::new(vec![
//!   Box::new(TableProcessor),
//!   Box::new(ImageProcessor),
//! ]);
//! let renderer = Renderer::with_chain(chain);
//! assert_eq!(renderer.chain().names(), vec!["table", "image"]);
//! ```

pub mod converter;
pub mod dom;
pub mod error;
pub mod processor;
mod render;
mod types;
pub mod utils;

pub use crate::{
  converter::MarkdownConverter,
  dom::{ClassList, Document},
  error::{ConversionError, ProcessorError, TreeError},
  processor::{ChainReport, ProcessorChain, TreeProcessor},
  render::Renderer,
  types::{RenderOutcome, RenderedDocument},
};
