use log::{debug, error};

use crate::{
  converter::MarkdownConverter,
  processor::ProcessorChain,
  types::RenderOutcome,
};

/// Markdown converter followed by a processor chain.
///
/// A renderer holds no per-document state and can be shared across threads;
/// every call builds and discards its own tree.
#[derive(Debug, Default)]
pub struct Renderer {
  converter: MarkdownConverter,
  chain:     ProcessorChain,
}

impl Renderer {
  /// The standard converter and chain.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The standard converter with a custom chain.
  #[must_use]
  pub fn with_chain(chain: ProcessorChain) -> Self {
    Self {
      converter: MarkdownConverter::new(),
      chain,
    }
  }

  #[must_use]
  pub const fn chain(&self) -> &ProcessorChain {
    &self.chain
  }

  /// Render Markdown to styled HTML. Never fails.
  ///
  /// An empty string comes back for empty input and for a failed conversion.
  /// Callers that need to tell the two apart should use
  /// [`render_outcome`](Self::render_outcome).
  #[must_use]
  pub fn render(&self, source: &str) -> String {
    self.chain.process(&self.converter.convert(source))
  }

  /// [`render`](Self::render) for a source that may be missing.
  #[must_use]
  pub fn render_optional(&self, source: Option<&str>) -> String {
    source.map(|source| self.render(source)).unwrap_or_default()
  }

  /// Render, reporting what degraded along the way.
  ///
  /// Sources that convert to nothing (whitespace, bare link definitions)
  /// count as [`RenderOutcome::Empty`].
  #[must_use]
  pub fn render_outcome(&self, source: &str) -> RenderOutcome {
    let converted = match self.converter.try_convert(source) {
      Ok(converted) => converted,
      Err(e) => {
        error!("Markdown conversion failed: {e}");
        return RenderOutcome::ConversionFailed;
      },
    };
    if converted.trim().is_empty() {
      debug!("Source of {} bytes rendered to nothing", source.len());
      return RenderOutcome::Empty;
    }

    let report = self.chain.process_with_report(&converted);
    RenderOutcome::Rendered {
      html:          report.html,
      failed_stages: report.failed_stages,
      parse_failed:  report.parse_failed,
    }
  }
}
