//! Markdown to HTML conversion.
//!
//! The converter runs comrak with a fixed extension set, guesses languages of
//! un-annotated fences on the AST, then finishes diagram fences and attribute
//! lists on the DOM (see [`extensions`]). The extension set is not
//! configurable: every document renders the same way.
//!
//! | Syntax                          | Output                                      |
//! |---------------------------------|---------------------------------------------|
//! | tables, footnotes, task lists   | comrak GFM extensions                       |
//! | single newline                  | `<br>`                                      |
//! | ` ```lang `                     | `<pre><code class="language-lang">`         |
//! | ` ```mermaid `                  | `<div class="mermaid">source</div>`         |
//! | `:smile:`                       | left as text                                |
//! | `{: #id .class }`               | attributes on the preceding block / inline  |
pub mod extensions;
pub mod language;

use comrak::{Arena, options::Options, parse_document};
use log::{error, warn};

pub use self::language::{AstTransformer, LanguageGuesser, guess_language};
use crate::{error::ConversionError, utils::catch_panic};

/// Converts Markdown source to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Convert Markdown to HTML, degrading to an empty string on failure.
  ///
  /// An empty result for non-empty input means the conversion failed; the
  /// failure has already been logged.
  #[must_use]
  pub fn convert(&self, source: &str) -> String {
    self.try_convert(source).unwrap_or_else(|e| {
      error!("Markdown conversion failed: {e}");
      String::new()
    })
  }

  /// Convert Markdown to HTML, reporting failures.
  ///
  /// # Errors
  ///
  /// Returns [`ConversionError`] if comrak fails to format the document or
  /// panics while parsing it.
  pub fn try_convert(&self, source: &str) -> Result<String, ConversionError> {
    if source.is_empty() {
      return Ok(String::new());
    }

    let html =
      catch_panic(|| Self::format(source)).map_err(ConversionError::Panicked)??;

    match catch_panic(|| extensions::apply(&html)) {
      Ok(Ok(extended)) => Ok(extended),
      Ok(Err(e)) => {
        warn!("Skipping markup extensions: {e}");
        Ok(html)
      },
      Err(panic) => {
        warn!("Skipping markup extensions after panic: {panic}");
        Ok(html)
      },
    }
  }

  fn format(source: &str) -> Result<String, std::fmt::Error> {
    let arena = Arena::new();
    let options = Self::comrak_options();
    let root = parse_document(&arena, source, &options);

    LanguageGuesser.transform(root);

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html)?;
    Ok(html)
  }

  /// The fixed comrak configuration.
  fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.footnotes = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.description_lists = true;
    options.extension.header_ids = None;
    options.render.hardbreaks = true;
    options.render.r#unsafe = true;
    options
  }
}
