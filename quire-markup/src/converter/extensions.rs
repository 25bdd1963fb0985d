//! DOM-level syntax extensions applied to comrak's output.
//!
//! comrak has no notion of diagram fences or attribute lists, so both are
//! finished on the parsed HTML before the converter hands its output on:
//!
//! - ` ```mermaid ` fences become `<div class="mermaid">` containers whose
//!   text is the untouched fence body.
//! - Attribute lists (`{: #id .class key="value"}`, colon optional) at the end
//!   of a heading, on the last line of a paragraph, or directly after an image
//!   or link are consumed and applied to that element.

use std::sync::LazyLock;

use kuchikikiki::NodeRef;
use regex::Regex;

use crate::{
  dom::{self, Document},
  error::TreeResult,
  utils::regex_or_never,
};

/// Fence languages rendered as diagram containers instead of code.
pub const DIAGRAM_LANGUAGES: &[&str] = &["mermaid"];

/// Apply all DOM extensions to converter output.
///
/// # Errors
///
/// Returns an error if the HTML cannot be parsed or serialized.
pub fn apply(html: &str) -> TreeResult<String> {
  let document = Document::parse(html)?;
  process_diagram_blocks(&document)?;
  process_attribute_lists(&document);
  document.to_html()
}

/// Replace `<pre><code class="language-mermaid">` blocks with diagram
/// containers.
fn process_diagram_blocks(document: &Document) -> TreeResult<()> {
  for language in DIAGRAM_LANGUAGES {
    for code in document.select(&format!("pre > code.language-{language}"))? {
      let Some(pre) = code.parent() else {
        continue;
      };
      let source = dom::text_content(&code);
      let container = dom::new_div(language);
      container.append(NodeRef::new_text(source));
      pre.insert_before(container);
      pre.detach();
    }
  }
  Ok(())
}

/// One parsed attribute list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AttributeList {
  pub id:         Option<String>,
  pub classes:    Vec<String>,
  pub attributes: Vec<(String, String)>,
}

impl AttributeList {
  /// Parse the inside of `{...}` (without the braces).
  ///
  /// Returns `None` if anything other than `#id`, `.class`, `key=value` and
  /// whitespace is present, or if the list is empty.
  #[must_use]
  pub fn parse(inner: &str) -> Option<Self> {
    static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
      regex_or_never(
        r#"#([\w-]+)|\.([\w-]+)|([\w-]+)=(?:"([^"]*)"|'([^']*)'|([^\s"'}]+))"#,
      )
    });

    let inner = inner.strip_prefix(':').unwrap_or(inner);
    let mut list = Self::default();
    let mut last_end = 0;

    for caps in TOKEN_RE.captures_iter(inner) {
      let whole = caps.get(0)?;
      if !inner[last_end..whole.start()].trim().is_empty() {
        return None;
      }
      last_end = whole.end();

      if let Some(id) = caps.get(1) {
        list.id = Some(id.as_str().to_owned());
      } else if let Some(class) = caps.get(2) {
        list.classes.push(class.as_str().to_owned());
      } else if let Some(key) = caps.get(3) {
        let value = caps
          .get(4)
          .or_else(|| caps.get(5))
          .or_else(|| caps.get(6))
          .map_or("", |m| m.as_str());
        list.attributes.push((key.as_str().to_owned(), value.to_owned()));
      }
    }

    if !inner[last_end..].trim().is_empty() || list.is_empty() {
      return None;
    }
    Some(list)
  }

  fn is_empty(&self) -> bool {
    self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
  }

  /// Apply to an element. Classes merge, `id` and other keys overwrite.
  pub fn apply_to(&self, node: &NodeRef) {
    if let Some(ref id) = self.id {
      dom::set_attribute(node, "id", id.as_str());
    }
    for (key, value) in &self.attributes {
      if key == "class" {
        dom::merge_classes(node, value.split_ascii_whitespace());
      } else {
        dom::set_attribute(node, key, value.as_str());
      }
    }
    dom::merge_classes(node, self.classes.iter().map(String::as_str));
  }
}

/// Split `text` into content and a trailing `{...}` attribute list.
fn split_trailing(text: &str) -> Option<(&str, AttributeList)> {
  static TRAILING_RE: LazyLock<Regex> =
    LazyLock::new(|| regex_or_never(r"\{([^{}]*)\}\s*$"));

  let caps = TRAILING_RE.captures(text)?;
  let whole = caps.get(0)?;
  let list = AttributeList::parse(caps.get(1)?.as_str())?;
  Some((text[..whole.start()].trim_end(), list))
}

/// Split `text` into a leading `{...}` attribute list and the rest.
fn split_leading(text: &str) -> Option<(AttributeList, &str)> {
  static LEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| regex_or_never(r"^\{([^{}]*)\}"));

  let caps = LEADING_RE.captures(text)?;
  let whole = caps.get(0)?;
  let list = AttributeList::parse(caps.get(1)?.as_str())?;
  Some((list, &text[whole.end()..]))
}

fn replace_text(node: &NodeRef, text: &str) {
  if let Some(cell) = node.as_text() {
    *cell.borrow_mut() = text.to_owned();
  }
}

fn process_attribute_lists(document: &Document) {
  for tag in ["h1", "h2", "h3", "h4", "h5", "h6"] {
    for heading in document.elements_by_tag(tag) {
      process_heading(&heading);
    }
  }
  for paragraph in document.elements_by_tag("p") {
    process_paragraph(&paragraph);
  }
  for tag in ["img", "a"] {
    for element in document.elements_by_tag(tag) {
      process_inline(&element);
    }
  }
}

/// `## Title {: #anchor }`
fn process_heading(heading: &NodeRef) {
  let Some(last) = heading.last_child() else {
    return;
  };
  let Some(text) = last.as_text().map(|t| t.borrow().clone()) else {
    return;
  };
  if let Some((content, list)) = split_trailing(&text) {
    replace_text(&last, content);
    list.apply_to(heading);
  }
}

/// A paragraph whose last line is only an attribute list. Line breaks are
/// rendered as `<br>`, so the list is the final text node after one.
fn process_paragraph(paragraph: &NodeRef) {
  let Some(last) = paragraph.last_child() else {
    return;
  };
  let Some(text) = last.as_text().map(|t| t.borrow().clone()) else {
    return;
  };
  let trimmed = text.trim();
  let Some(inner) = trimmed
    .strip_prefix('{')
    .and_then(|rest| rest.strip_suffix('}'))
  else {
    return;
  };
  let Some(br) = last.previous_sibling().filter(|n| dom::is_element(n, "br"))
  else {
    return;
  };
  if let Some(list) = AttributeList::parse(inner) {
    last.detach();
    br.detach();
    list.apply_to(paragraph);
  }
}

/// `![alt](src){: .wide}` and `[text](href){target=_blank}`
fn process_inline(element: &NodeRef) {
  let Some(next) = element.next_sibling() else {
    return;
  };
  let Some(text) = next.as_text().map(|t| t.borrow().clone()) else {
    return;
  };
  if let Some((list, rest)) = split_leading(&text) {
    if rest.is_empty() {
      next.detach();
    } else {
      replace_text(&next, rest);
    }
    list.apply_to(element);
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_parse_attribute_list() {
    let list = AttributeList::parse(": #intro .lead .wide data-x=\"a b\"")
      .unwrap();
    assert_eq!(list.id.as_deref(), Some("intro"));
    assert_eq!(list.classes, vec!["lead", "wide"]);
    assert_eq!(list.attributes, vec![(
      "data-x".to_owned(),
      "a b".to_owned()
    )]);
  }

  #[test]
  fn test_parse_rejects_garbage() {
    assert!(AttributeList::parse("\"a\": 1").is_none());
    assert!(AttributeList::parse(".ok but-not-this").is_none());
    assert!(AttributeList::parse(":").is_none());
    assert!(AttributeList::parse("").is_none());
  }

  #[test]
  fn test_heading_attribute_list() {
    let html = apply("<h2>Setup {: #setup .section}</h2>").unwrap();
    assert!(html.contains("id=\"setup\""));
    assert!(html.contains("class=\"section\""));
    assert!(html.contains(">Setup</h2>"));
  }

  #[test]
  fn test_paragraph_attribute_list_on_last_line() {
    let html = apply("<p>Intro text<br>\n{: .lead}</p>").unwrap();
    assert!(html.contains("<p class=\"lead\">Intro text</p>"));
  }

  #[test]
  fn test_paragraph_without_attribute_list_untouched() {
    let source = "<p>Some {braces} in text</p>";
    assert_eq!(apply(source).unwrap(), source);
  }

  #[test]
  fn test_image_attribute_list() {
    let html =
      apply("<p><img src=\"a.png\" alt=\"A\">{: .wide} after</p>").unwrap();
    assert!(html.contains("class=\"wide\""));
    assert!(html.contains("> after</p>"));
    assert!(!html.contains("{: .wide}"));
  }

  #[test]
  fn test_mermaid_fence_becomes_container() {
    let html = apply(
      "<pre><code class=\"language-mermaid\">graph TD\nA --&gt; B\n</code></pre>",
    )
    .unwrap();
    assert_eq!(html, "<div class=\"mermaid\">graph TD\nA --&gt; B\n</div>");
  }
}
