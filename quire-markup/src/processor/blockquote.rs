use std::fmt;

use super::TreeProcessor;
use crate::{
  dom::{self, Document},
  error::ProcessorError,
};

/// Classes given to a plain quotation that has no `class` attribute.
pub const DEFAULT_QUOTE_CLASSES: &[&str] =
  &["blockquote", "border-start", "border-warning", "ps-3"];

/// Class shared by every callout.
const ALERT_CLASS: &str = "alert";

/// Callout types recognised on the first line of a quotation.
///
/// Written by authors as a paragraph containing only the marker:
///
/// ```markdown
/// > [!warning]
/// >
/// > Mind the gap.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalloutKind {
  Info,
  Warning,
  Success,
  Error,
  Danger,
  Tip,
  Note,
}

impl CalloutKind {
  pub const ALL: [Self; 7] = [
    Self::Info,
    Self::Warning,
    Self::Success,
    Self::Error,
    Self::Danger,
    Self::Tip,
    Self::Note,
  ];

  /// The literal marker text, brackets included.
  #[must_use]
  pub const fn marker(self) -> &'static str {
    match self {
      Self::Info => "[!info]",
      Self::Warning => "[!warning]",
      Self::Success => "[!success]",
      Self::Error => "[!error]",
      Self::Danger => "[!danger]",
      Self::Tip => "[!tip]",
      Self::Note => "[!note]",
    }
  }

  /// Alert classes merged into the quotation. `Error` and `Danger` share the
  /// danger style.
  #[must_use]
  pub const fn alert_classes(self) -> [&'static str; 2] {
    let variant = match self {
      Self::Info => "alert-info",
      Self::Warning => "alert-warning",
      Self::Success => "alert-success",
      Self::Error | Self::Danger => "alert-danger",
      Self::Tip => "alert-primary",
      Self::Note => "alert-secondary",
    };
    [ALERT_CLASS, variant]
  }

  /// Look up an exact marker. Case and surrounding text matter.
  #[must_use]
  pub fn from_marker(text: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.marker() == text)
  }
}

impl fmt::Display for CalloutKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.marker())
  }
}

/// Turns marked quotations into alerts and styles the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockquoteProcessor;

impl TreeProcessor for BlockquoteProcessor {
  fn name(&self) -> &'static str {
    "blockquote"
  }

  fn process(&self, document: &mut Document) -> Result<(), ProcessorError> {
    for quote in document.elements_by_tag("blockquote") {
      // An alert has already consumed its marker; the paragraph now first is
      // content.
      if dom::has_class(&quote, ALERT_CLASS) {
        continue;
      }

      let marker = quote
        .children()
        .find(|child| dom::is_element(child, "p"))
        .and_then(|paragraph| {
          CalloutKind::from_marker(dom::text_content(&paragraph).trim())
            .map(|kind| (paragraph, kind))
        });

      if let Some((paragraph, kind)) = marker {
        log::trace!("Converting quotation with {kind} marker to an alert");
        dom::merge_classes(&quote, kind.alert_classes());
        paragraph.detach();
      } else if !dom::has_attribute(&quote, "class") {
        dom::set_attribute(&quote, "class", DEFAULT_QUOTE_CLASSES.join(" "));
      }
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
    BlockquoteProcessor.process(&mut document).unwrap();
    document.to_html().unwrap()
  }

  #[test]
  fn test_marker_lookup() {
    assert_eq!(CalloutKind::from_marker("[!tip]"), Some(CalloutKind::Tip));
    assert_eq!(CalloutKind::from_marker("[!Tip]"), None);
    assert_eq!(CalloutKind::from_marker("[!tip] extra"), None);
    assert_eq!(
      CalloutKind::Error.alert_classes(),
      CalloutKind::Danger.alert_classes()
    );
    for kind in CalloutKind::ALL {
      assert_eq!(CalloutKind::from_marker(kind.marker()), Some(kind));
    }
  }

  #[test]
  fn test_warning_callout() {
    let html =
      run("<blockquote><p>[!warning]</p><p>Careful!</p></blockquote>");
    assert_eq!(
      html,
      "<blockquote class=\"alert alert-warning\"><p>Careful!</p></blockquote>"
    );
  }

  #[test]
  fn test_marker_whitespace_is_trimmed() {
    let html = run("<blockquote>\n<p>  [!note]\n</p>\n<p>x</p>\n</blockquote>");
    assert!(html.contains("class=\"alert alert-secondary\""));
    assert!(!html.contains("[!note]"));
  }

  #[test]
  fn test_callout_merges_existing_classes() {
    let html = run("<blockquote class=\"wide\"><p>[!error]</p></blockquote>");
    assert_eq!(
      html,
      "<blockquote class=\"wide alert alert-danger\"></blockquote>"
    );
  }

  #[test]
  fn test_plain_quote_gets_defaults() {
    let html = run("<blockquote><p>Just a quote</p></blockquote>");
    assert_eq!(
      html,
      "<blockquote class=\"blockquote border-start border-warning \
       ps-3\"><p>Just a quote</p></blockquote>"
    );
  }

  #[test]
  fn test_existing_class_attribute_left_alone() {
    let source = "<blockquote class=\"\"><p>Quote</p></blockquote>";
    assert_eq!(run(source), source);
    let source = "<blockquote class=\"pull\"><p>Quote</p></blockquote>";
    assert_eq!(run(source), source);
  }

  #[test]
  fn test_marker_must_be_first_paragraph() {
    let html = run("<blockquote><p>Intro</p><p>[!info]</p></blockquote>");
    assert!(html.contains("[!info]"));
    assert!(html.contains("class=\"blockquote border-start"));
  }

  #[test]
  fn test_idempotent() {
    for source in [
      "<blockquote><p>[!tip]</p><p>[!info]</p></blockquote>",
      "<blockquote><p>Plain</p></blockquote>",
      "<blockquote><p>[!success]</p><blockquote><p>inner</p></blockquote></blockquote>",
    ] {
      let once = run(source);
      assert_eq!(run(&once), once, "not idempotent for {source}");
    }
  }
}
