use super::TreeProcessor;
use crate::{
  dom::{self, Document},
  error::ProcessorError,
};

/// Fluid width, block display, horizontal centering.
pub const IMAGE_CLASSES: &[&str] = &["img-fluid", "d-block", "mx-auto"];

/// Makes images responsive and lazily loaded.
///
/// An author supplied `loading` attribute is never overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProcessor;

impl TreeProcessor for ImageProcessor {
  fn name(&self) -> &'static str {
    "image"
  }

  fn process(&self, document: &mut Document) -> Result<(), ProcessorError> {
    for image in document.elements_by_tag("img") {
      dom::merge_classes(&image, IMAGE_CLASSES.iter().copied());
      if !dom::has_attribute(&image, "loading") {
        dom::set_attribute(&image, "loading", "lazy");
      }
    }
    Ok(())
  }
}
