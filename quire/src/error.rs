use std::{io, path::PathBuf};

use thiserror::Error;

/// Top-level error type for the quire binary.
#[derive(Debug, Error)]
pub enum QuireError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("Failed to build thread pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),

  #[error("Rendering {} produced no output", .0.display())]
  EmptyOutput(PathBuf),

  #[error("{} document(s) failed to render", .0.len())]
  Failed(Vec<(PathBuf, Self)>),
}
