//! Types for the quire-markup public API.
use crate::Renderer;

/// Result of a render that keeps failures distinguishable from empty
/// documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
  /// The source was empty. Nothing to render.
  Empty,
  /// The converter failed; there is no HTML at all.
  ConversionFailed,
  /// HTML was produced, possibly with some stages skipped.
  Rendered {
    html:          String,
    /// Stages that failed and were skipped, in chain order.
    failed_stages: Vec<&'static str>,
    /// The tree could not be built, so `html` is the unstyled converter
    /// output.
    parse_failed:  bool,
  },
}

impl RenderOutcome {
  /// The HTML, with the same degradation as [`Renderer::render`].
  #[must_use]
  pub fn html(&self) -> &str {
    match self {
      Self::Empty | Self::ConversionFailed => "",
      Self::Rendered { html, .. } => html,
    }
  }

  #[must_use]
  pub fn into_html(self) -> String {
    match self {
      Self::Empty | Self::ConversionFailed => String::new(),
      Self::Rendered { html, .. } => html,
    }
  }

  /// Whether anything went wrong, including skipped stages.
  #[must_use]
  pub fn is_degraded(&self) -> bool {
    match self {
      Self::Empty => false,
      Self::ConversionFailed => true,
      Self::Rendered {
        failed_stages,
        parse_failed,
        ..
      } => *parse_failed || !failed_stages.is_empty(),
    }
  }
}

/// Markdown source paired with the HTML derived from it.
///
/// The HTML is never edited on its own; it is regenerated whenever the
/// source changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
  source: String,
  html:   String,
}

impl RenderedDocument {
  #[must_use]
  pub fn from_source(renderer: &Renderer, source: impl Into<String>) -> Self {
    let source = source.into();
    let html = renderer.render(&source);
    Self { source, html }
  }

  /// Replace the source and regenerate the HTML.
  pub fn set_source(&mut self, renderer: &Renderer, source: impl Into<String>) {
    self.source = source.into();
    self.html = renderer.render(&self.source);
  }

  #[must_use]
  pub fn source(&self) -> &str {
    &self.source
  }

  #[must_use]
  pub fn html(&self) -> &str {
    &self.html
  }
}
