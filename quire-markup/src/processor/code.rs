use super::TreeProcessor;
use crate::{
  dom::{self, Document},
  error::ProcessorError,
};

/// Accent text color, light background, horizontal padding.
pub const INLINE_CODE_CLASSES: &[&str] = &["text-danger", "bg-light", "px-1"];

/// Styles inline `<code>` spans.
///
/// Code directly inside `<pre>` is a fenced block; its `language-*` class is
/// left exactly as the converter wrote it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineCodeProcessor;

impl TreeProcessor for InlineCodeProcessor {
  fn name(&self) -> &'static str {
    "inline-code"
  }

  fn process(&self, document: &mut Document) -> Result<(), ProcessorError> {
    for code in document.elements_by_tag("code") {
      if code.parent().is_some_and(|parent| dom::is_element(&parent, "pre")) {
        continue;
      }
      dom::merge_classes(&code, INLINE_CODE_CLASSES.iter().copied());
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  fn run(html: &str) -> String {
    let mut document = Document::parse(html).unwrap();
    InlineCodeProcessor.process(&mut document).unwrap();
    document.to_html().unwrap()
  }

  #[test]
  fn test_inline_code_styled() {
    assert_eq!(
      run("<p>Use <code>f()</code></p>"),
      "<p>Use <code class=\"text-danger bg-light px-1\">f()</code></p>"
    );
  }

  #[test]
  fn test_block_code_untouched() {
    let source =
      "<pre><code class=\"language-python\">print('world')\n</code></pre>";
    assert_eq!(run(source), source);
  }

  #[test]
  fn test_code_nested_deeper_than_pre_is_inline() {
    let html = run("<pre><span><code>x</code></span></pre>");
    assert!(html.contains("<code class=\"text-danger bg-light px-1\">"));
  }

  #[test]
  fn test_idempotent() {
    let once = run("<li><code>a</code> and <code class=\"k\">b</code></li>");
    assert_eq!(run(&once), once);
  }
}
