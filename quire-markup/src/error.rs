//! Error types for the conversion and tree-rewriting stages.
//!
//! None of these ever escape [`crate::Renderer::render`]; they exist so that
//! each layer can report *what* went wrong before the renderer degrades to
//! empty or unprocessed output.

use std::{fmt, io};

/// Result type for element tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// The Markdown library failed to produce HTML.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
  #[error("HTML formatting failed: {0}")]
  Format(#[from] fmt::Error),
  #[error("Markdown conversion panicked: {0}")]
  Panicked(String),
}

/// HTML could not be turned into an element tree, or back into text.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
  #[error("Parsed document has no <body> element")]
  MissingBody,
  #[error("Invalid CSS selector: {0}")]
  Selector(String),
  #[error("Serialization failed: {0}")]
  Serialize(#[from] io::Error),
  #[error("Serialized output is not valid UTF-8")]
  InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A single tree processor failed while rewriting the document.
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {message}")]
pub struct ProcessorError {
  /// Name of the stage that failed.
  pub stage:   &'static str,
  /// Human readable cause.
  pub message: String,
}

impl ProcessorError {
  /// Create an error for the given stage.
  pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
    Self {
      stage,
      message: message.into(),
    }
  }
}
