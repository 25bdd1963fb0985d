use std::fmt;

use log::{debug, error, trace, warn};

use super::{
  BlockquoteProcessor,
  ImageProcessor,
  InlineCodeProcessor,
  TableProcessor,
  TreeProcessor,
};
use crate::{dom::Document, utils::catch_panic};

/// Result of running a chain over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
  /// Rewritten HTML, or the input unchanged if the tree could not be built or
  /// serialized.
  pub html:          String,
  /// Stages that returned an error or panicked, in chain order.
  pub failed_stages: Vec<&'static str>,
  /// The input could not be turned into a tree, or the tree back into text.
  pub parse_failed:  bool,
}

impl ChainReport {
  fn unchanged(html: &str, parse_failed: bool) -> Self {
    Self {
      html: html.to_owned(),
      failed_stages: Vec::new(),
      parse_failed,
    }
  }

  /// Every stage ran and the tree round-tripped.
  #[must_use]
  pub fn is_clean(&self) -> bool {
    self.failed_stages.is_empty() && !self.parse_failed
  }
}

/// An ordered, immutable list of tree processors.
///
/// Each stage sees the tree exactly as the previous one left it. A failing
/// stage is logged and skipped; it never stops the stages after it.
pub struct ProcessorChain {
  stages: Vec<Box<dyn TreeProcessor>>,
}

impl ProcessorChain {
  #[must_use]
  pub fn new(stages: Vec<Box<dyn TreeProcessor>>) -> Self {
    Self { stages }
  }

  /// Table, image, blockquote, then inline code.
  #[must_use]
  pub fn standard() -> Self {
    Self::new(vec![
      Box::new(TableProcessor),
      Box::new(ImageProcessor),
      Box::new(BlockquoteProcessor),
      Box::new(InlineCodeProcessor),
    ])
  }

  /// Stage names in execution order.
  #[must_use]
  pub fn names(&self) -> Vec<&'static str> {
    self.stages.iter().map(|stage| stage.name()).collect()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.stages.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /// Run every stage over `html` and serialize the result.
  ///
  /// Empty input yields empty output. If the HTML cannot be parsed the input
  /// is returned unchanged.
  #[must_use]
  pub fn process(&self, html: &str) -> String {
    self.process_with_report(html).html
  }

  /// Like [`process`](Self::process), also reporting which stages were
  /// skipped.
  #[must_use]
  pub fn process_with_report(&self, html: &str) -> ChainReport {
    if html.is_empty() {
      return ChainReport::default();
    }

    let mut document = match catch_panic(|| Document::parse(html)) {
      Ok(Ok(document)) => document,
      Ok(Err(e)) => {
        error!("Failed to parse HTML, returning it unprocessed: {e}");
        return ChainReport::unchanged(html, true);
      },
      Err(panic) => {
        error!("HTML parser panicked, returning input unprocessed: {panic}");
        return ChainReport::unchanged(html, true);
      },
    };

    let mut failed_stages = Vec::new();
    for stage in &self.stages {
      let name = stage.name();
      trace!("Running stage '{name}'");

      match catch_panic(|| stage.process(&mut document)) {
        Ok(Ok(())) => trace!("Stage '{name}' finished"),
        Ok(Err(e)) => {
          warn!("Stage '{name}' failed, skipping: {e}");
          failed_stages.push(name);
        },
        Err(panic) => {
          warn!("Stage '{name}' panicked, skipping: {panic}");
          failed_stages.push(name);
        },
      }
    }

    match document.to_html() {
      Ok(output) => {
        debug!(
          "Processed document through {} stages ({} failed)",
          self.stages.len(),
          failed_stages.len()
        );
        ChainReport {
          html: output,
          failed_stages,
          parse_failed: false,
        }
      },
      Err(e) => {
        error!("Failed to serialize processed HTML, returning input: {e}");
        ChainReport {
          failed_stages,
          ..ChainReport::unchanged(html, true)
        }
      },
    }
  }
}

impl Default for ProcessorChain {
  fn default() -> Self {
    Self::standard()
  }
}

impl fmt::Debug for ProcessorChain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProcessorChain")
      .field("stages", &self.names())
      .finish()
  }
}
