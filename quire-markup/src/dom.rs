//! Element tree model used by every tree processor.
//!
//! A [`Document`] wraps a `kuchikikiki` DOM parsed from an HTML fragment. The
//! free functions in this module are the small vocabulary processors need:
//! attribute access, class token merging, wrapping and element construction.
//! Nodes are removed with [`NodeRef::detach`].

use std::fmt;

use indexmap::IndexSet;
use kuchikikiki::{Attribute, ExpandedName, NodeRef, iter::NodeIterator};
use markup5ever::{LocalName, QualName, ns};
use tendril::TendrilSink;

use crate::error::{TreeError, TreeResult};

/// A parsed HTML fragment, exclusively owned by one render call.
pub struct Document {
  root: NodeRef,
}

impl Document {
  /// Parse an HTML fragment into an element tree.
  ///
  /// # Errors
  ///
  /// Returns [`TreeError::MissingBody`] when the tree builder did not produce
  /// a `<body>` to hold the fragment (e.g. the input is a `<frameset>`
  /// document).
  pub fn parse(html: &str) -> TreeResult<Self> {
    let root = kuchikikiki::parse_html().one(html);
    root
      .select_first("body")
      .map_err(|()| TreeError::MissingBody)?;
    Ok(Self { root })
  }

  /// The document node.
  #[must_use]
  pub const fn root(&self) -> &NodeRef {
    &self.root
  }

  /// All elements with the given tag name, in document order.
  ///
  /// The list is collected up front so the caller can detach, wrap or insert
  /// nodes while walking it.
  #[must_use]
  pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeRef> {
    self
      .root
      .descendants()
      .elements()
      .filter(|element| element.name.local.as_ref() == tag)
      .map(|element| element.as_node().clone())
      .collect()
  }

  /// All elements matching a CSS selector, in document order.
  ///
  /// # Errors
  ///
  /// Returns [`TreeError::Selector`] if `selector` does not parse.
  pub fn select(&self, selector: &str) -> TreeResult<Vec<NodeRef>> {
    let matches = self
      .root
      .select(selector)
      .map_err(|()| TreeError::Selector(selector.to_owned()))?;
    Ok(matches.map(|element| element.as_node().clone()).collect())
  }

  /// Serialize the fragment back to HTML.
  ///
  /// The implicit `<html>`, `<head>` and `<body>` wrappers added by the parser
  /// are not emitted. Anything the parser moved into `<head>` (a leading
  /// `<style>` or `<script>` for instance) is written before the body content
  /// so no author content is lost.
  ///
  /// # Errors
  ///
  /// Returns an error if a node fails to serialize.
  pub fn to_html(&self) -> TreeResult<String> {
    let mut out = Vec::new();
    for node in self.root.children() {
      if tag_name(&node).as_deref() == Some("html") {
        for section in node.children() {
          match tag_name(&section).as_deref() {
            Some("head" | "body") => {
              for child in section.children() {
                child.serialize(&mut out)?;
              }
            },
            _ => section.serialize(&mut out)?,
          }
        }
      } else if node.as_doctype().is_none() {
        node.serialize(&mut out)?;
      }
    }
    Ok(String::from_utf8(out)?)
  }
}

impl fmt::Debug for Document {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Document")
      .field("html", &self.to_html().unwrap_or_default())
      .finish()
  }
}

/// Ordered, duplicate-free set of CSS class tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(IndexSet<String>);

impl ClassList {
  /// Parse a `class` attribute value. Repeated tokens collapse to their first
  /// occurrence.
  #[must_use]
  pub fn parse(value: &str) -> Self {
    value.split_ascii_whitespace().collect()
  }

  #[must_use]
  pub fn contains(&self, token: &str) -> bool {
    self.0.contains(token)
  }

  /// Append a token unless it is already present.
  pub fn insert(&mut self, token: &str) -> bool {
    if self.0.contains(token) {
      return false;
    }
    self.0.insert(token.to_owned())
  }

  /// Union with `tokens`, appending new ones after the existing ones.
  pub fn merge<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) {
    for token in tokens {
      self.insert(token);
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<'a> FromIterator<&'a str> for ClassList {
  fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
    let mut list = Self::default();
    list.merge(iter);
    list
  }
}

impl fmt::Display for ClassList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, token) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      f.write_str(token)?;
    }
    Ok(())
  }
}

/// Local tag name of an element node, `None` for text, comments and the
/// document itself.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
  node
    .as_element()
    .map(|element| element.name.local.as_ref().to_owned())
}

/// Whether `node` is an element with the given tag name.
#[must_use]
pub fn is_element(node: &NodeRef, tag: &str) -> bool {
  node
    .as_element()
    .is_some_and(|element| element.name.local.as_ref() == tag)
}

/// The parent of `node` if it is an element.
#[must_use]
pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
  node.parent().filter(|parent| parent.as_element().is_some())
}

#[must_use]
pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
  node.as_element().and_then(|element| {
    element
      .attributes
      .borrow()
      .get(name)
      .map(std::string::ToString::to_string)
  })
}

#[must_use]
pub fn has_attribute(node: &NodeRef, name: &str) -> bool {
  node
    .as_element()
    .is_some_and(|element| element.attributes.borrow().contains(name))
}

/// Set an attribute, replacing any previous value. No-op on non-elements.
pub fn set_attribute(node: &NodeRef, name: &str, value: impl Into<String>) {
  if let Some(element) = node.as_element() {
    element
      .attributes
      .borrow_mut()
      .insert(LocalName::from(name), value.into());
  }
}

/// Class tokens of an element.
///
/// Returns `None` when the element has no `class` attribute at all, which is
/// different from an attribute holding no tokens.
#[must_use]
pub fn class_list(node: &NodeRef) -> Option<ClassList> {
  attribute(node, "class").map(|value| ClassList::parse(&value))
}

/// Whether the element carries `token` in its class list.
#[must_use]
pub fn has_class(node: &NodeRef, token: &str) -> bool {
  class_list(node).is_some_and(|classes| classes.contains(token))
}

/// Merge `tokens` into the element's class list.
///
/// The attribute is always rewritten from the merged set, so duplicates that
/// were already present in the source collapse as well.
pub fn merge_classes<'a>(
  node: &NodeRef,
  tokens: impl IntoIterator<Item = &'a str>,
) {
  if node.as_element().is_none() {
    return;
  }
  let mut classes = class_list(node).unwrap_or_default();
  classes.merge(tokens);
  set_attribute(node, "class", classes.to_string());
}

/// Build a detached HTML element.
#[must_use]
pub fn new_element(tag: &str, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(tag)),
    attributes.iter().map(|(name, value)| {
      (ExpandedName::new("", *name), Attribute {
        prefix: None,
        value:  (*value).to_owned(),
      })
    }),
  )
}

/// Build a detached `<div>` carrying the given classes.
#[must_use]
pub fn new_div(classes: &str) -> NodeRef {
  new_element("div", &[("class", classes)])
}

/// Splice `wrapper` in as the parent of `node`.
///
/// `wrapper` takes `node`'s position among its siblings and `node` becomes
/// the wrapper's last child (its only child for a fresh wrapper).
pub fn wrap(node: &NodeRef, wrapper: NodeRef) {
  node.insert_before(wrapper.clone());
  wrapper.append(node.clone());
}

/// Concatenated text of `node` and its descendants.
#[must_use]
pub fn text_content(node: &NodeRef) -> String {
  node.text_contents()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_class_list_dedupes_and_keeps_order() {
    let classes = ClassList::parse("b  a b\tc a");
    assert_eq!(classes.to_string(), "b a c");
    assert_eq!(classes.len(), 3);
  }

  #[test]
  fn test_class_list_merge_appends_new_tokens() {
    let mut classes = ClassList::parse("custom table");
    classes.merge(["table", "table-striped"]);
    assert_eq!(classes.to_string(), "custom table table-striped");
  }

  #[test]
  fn test_roundtrip_fragment_has_no_wrappers() {
    let doc = Document::parse("<p>Hello <em>world</em></p>").unwrap();
    let html = doc.to_html().unwrap();
    assert_eq!(html, "<p>Hello <em>world</em></p>");
    assert!(!html.contains("<body>"));
  }

  #[test]
  fn test_leading_style_is_preserved() {
    let doc =
      Document::parse("<style>p { color: red; }</style><p>x</p>").unwrap();
    let html = doc.to_html().unwrap();
    assert!(html.contains("<style>p { color: red; }</style>"));
    assert!(html.contains("<p>x</p>"));
  }

  #[test]
  fn test_elements_by_tag_in_document_order() {
    let doc =
      Document::parse("<p id=\"a\">1</p><div><p id=\"b\">2</p></div>").unwrap();
    let ids: Vec<_> = doc
      .elements_by_tag("p")
      .iter()
      .filter_map(|p| attribute(p, "id"))
      .collect();
    assert_eq!(ids, vec!["a", "b"]);
  }

  #[test]
  fn test_class_list_absent_vs_empty() {
    let doc = Document::parse("<p>a</p><p class=\"\">b</p>").unwrap();
    let paragraphs = doc.elements_by_tag("p");
    assert!(class_list(&paragraphs[0]).is_none());
    assert!(class_list(&paragraphs[1]).is_some_and(|c| c.is_empty()));
  }

  #[test]
  fn test_merge_classes_rewrites_duplicates() {
    let doc = Document::parse("<span class=\"x x y\">s</span>").unwrap();
    let span = &doc.elements_by_tag("span")[0];
    merge_classes(span, ["y", "z"]);
    assert_eq!(attribute(span, "class").as_deref(), Some("x y z"));
  }

  #[test]
  fn test_wrap_moves_node_into_wrapper() {
    let doc = Document::parse("<p>before</p><span>x</span><p>after</p>")
      .unwrap();
    let span = doc.elements_by_tag("span")[0].clone();
    wrap(&span, new_div("box"));
    assert_eq!(
      doc.to_html().unwrap(),
      "<p>before</p><div class=\"box\"><span>x</span></div><p>after</p>"
    );
    assert!(parent_element(&span).is_some_and(|p| is_element(&p, "div")));
  }

  #[test]
  fn test_detach_removes_node() {
    let doc = Document::parse("<p>keep</p><p>drop</p>").unwrap();
    doc.elements_by_tag("p")[1].detach();
    assert_eq!(doc.to_html().unwrap(), "<p>keep</p>");
  }

  #[test]
  fn test_new_element_with_attributes() {
    let img = new_element("img", &[("src", "a.png"), ("alt", "A")]);
    assert_eq!(attribute(&img, "src").as_deref(), Some("a.png"));
    assert!(has_attribute(&img, "alt"));
    assert!(!has_attribute(&img, "loading"));
  }

  #[test]
  fn test_invalid_selector_is_reported() {
    let doc = Document::parse("<p>x</p>").unwrap();
    assert!(matches!(doc.select("p[["), Err(TreeError::Selector(_))));
    assert_eq!(doc.select("p").unwrap().len(), 1);
  }
}
