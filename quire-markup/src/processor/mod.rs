//! Tree rewriting stages and the chain that runs them.
//!
//! Every stage implements [`TreeProcessor`]. A stage mutates the document in
//! place, keeps no state between calls and is idempotent: running it twice
//! serializes to the same HTML as running it once.
mod blockquote;
mod chain;
mod code;
mod image;
mod table;

pub use self::{
  blockquote::{BlockquoteProcessor, CalloutKind, DEFAULT_QUOTE_CLASSES},
  chain::{ChainReport, ProcessorChain},
  code::{INLINE_CODE_CLASSES, InlineCodeProcessor},
  image::{IMAGE_CLASSES, ImageProcessor},
  table::{TABLE_CLASSES, TABLE_WRAPPER_CLASS, TableProcessor},
};
use crate::{dom::Document, error::ProcessorError};

/// One in-place, idempotent rewrite of an element tree.
///
/// Implementors are instantiated once when a chain is assembled and shared
/// by every render after that, possibly across threads.
pub trait TreeProcessor: Send + Sync {
  /// Stage name used in diagnostics.
  fn name(&self) -> &'static str;

  /// Rewrite `document` in place.
  ///
  /// # Errors
  ///
  /// Returns [`ProcessorError`] if the stage cannot complete. The chain logs
  /// the error and continues with the next stage.
  fn process(&self, document: &mut Document) -> Result<(), ProcessorError>;
}
