use super::TreeProcessor;
use crate::{
  dom::{self, Document},
  error::ProcessorError,
};

/// Classes merged into every `<table>`.
pub const TABLE_CLASSES: &[&str] =
  &["table", "table-striped", "table-hover", "table-bordered"];

/// Marker class of the scrolling wrapper placed around tables.
pub const TABLE_WRAPPER_CLASS: &str = "table-responsive";

/// Styles tables and wraps each one in a responsive container.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableProcessor;

impl TreeProcessor for TableProcessor {
  fn name(&self) -> &'static str {
    "table"
  }

  fn process(&self, document: &mut Document) -> Result<(), ProcessorError> {
    for table in document.elements_by_tag("table") {
      dom::merge_classes(&table, TABLE_CLASSES.iter().copied());

      let wrapped = dom::parent_element(&table)
        .is_some_and(|parent| dom::has_class(&parent, TABLE_WRAPPER_CLASS));
      if !wrapped {
        dom::wrap(&table, dom::new_div(TABLE_WRAPPER_CLASS));
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
    TableProcessor.process(&mut document).unwrap();
    document.to_html().unwrap()
  }

  #[test]
  fn test_table_gets_classes_and_wrapper() {
    let html = run("<table><tr><td>Cell</td></tr></table>");
    assert!(html.starts_with(
      "<div class=\"table-responsive\"><table class=\"table table-striped \
       table-hover table-bordered\">"
    ));
    assert!(html.ends_with("</table></div>"));
  }

  #[test]
  fn test_existing_classes_are_kept_first() {
    let html = run("<table class=\"custom table\"><tr><td>x</td></tr></table>");
    assert!(html.contains(
      "class=\"custom table table-striped table-hover table-bordered\""
    ));
  }

  #[test]
  fn test_existing_wrapper_is_reused() {
    let html = run(
      "<div class=\"table-responsive my-3\"><table><tr><td>x</td></tr></table></div>",
    );
    assert_eq!(html.matches("table-responsive").count(), 1);
  }

  #[test]
  fn test_idempotent() {
    let once = run("<p>a</p><table><tr><td>x</td></tr></table><p>b</p>");
    let twice = run(&once);
    assert_eq!(once, twice);
    assert_eq!(twice.matches("<div").count(), 1);
  }

  #[test]
  fn test_multiple_tables_each_wrapped() {
    let html = run(
      "<table><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>",
    );
    assert_eq!(html.matches("class=\"table-responsive\"").count(), 2);
  }
}
