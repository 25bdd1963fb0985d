//! Batch rendering of Markdown files into HTML fragments.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, info, trace, warn};
use quire_markup::{RenderOutcome, Renderer};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{config::Config, error::QuireError};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
  /// Rendered with every stage succeeding.
  Clean,
  /// Written, but some stages were skipped or the output is unstyled.
  Degraded,
  /// The source had no content; an empty fragment was written.
  Empty,
}

/// Totals for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
  pub written:  Vec<PathBuf>,
  pub degraded: Vec<PathBuf>,
}

/// All `*.md` files below `input`, sorted, or `input` itself if it is a file.
#[must_use]
pub fn collect_markdown_files(input: &Path) -> Vec<PathBuf> {
  if input.is_file() {
    return vec![input.to_path_buf()];
  }

  let mut files: Vec<PathBuf> = WalkDir::new(input)
    .follow_links(true)
    .into_iter()
    .filter_map(Result::ok)
    .map(walkdir::DirEntry::into_path)
    .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
    .collect();
  files.sort();

  trace!("Found {} markdown files to render", files.len());
  files
}

/// Where the fragment for `file` goes: its path relative to `input`, with an
/// `.html` extension, under `output_dir`.
#[must_use]
pub fn output_path_for(input: &Path, file: &Path, output_dir: &Path) -> PathBuf {
  let relative = if input.is_file() {
    file.file_name().map_or_else(|| file.to_path_buf(), PathBuf::from)
  } else {
    file
      .strip_prefix(input)
      .map_or_else(|_| file.to_path_buf(), Path::to_path_buf)
  };
  output_dir.join(relative).with_extension("html")
}

/// Render one file and write its fragment.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or if conversion
/// failed and `fail_on_empty` is set.
pub fn render_file(
  renderer: &Renderer,
  source_path: &Path,
  output_path: &Path,
  fail_on_empty: bool,
) -> Result<FileStatus, QuireError> {
  let source = fs::read_to_string(source_path)?;

  let (html, status) = match renderer.render_outcome(&source) {
    RenderOutcome::Empty => (String::new(), FileStatus::Empty),
    RenderOutcome::ConversionFailed => {
      if fail_on_empty {
        return Err(QuireError::EmptyOutput(source_path.to_path_buf()));
      }
      warn!(
        "{} produced no output, writing an empty fragment",
        source_path.display()
      );
      (String::new(), FileStatus::Degraded)
    },
    RenderOutcome::Rendered {
      html,
      failed_stages,
      parse_failed,
    } => {
      if parse_failed {
        warn!("{}: written without styling", source_path.display());
      }
      if !failed_stages.is_empty() {
        warn!(
          "{}: skipped stages {}",
          source_path.display(),
          failed_stages.join(", ")
        );
      }
      let status = if parse_failed || !failed_stages.is_empty() {
        FileStatus::Degraded
      } else {
        FileStatus::Clean
      };
      (html, status)
    },
  };

  if let Some(parent) = output_path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(output_path, html)?;
  debug!("{} -> {}", source_path.display(), output_path.display());
  Ok(status)
}

/// Render every configured Markdown file in parallel.
///
/// Every file is attempted; failures are collected and reported together.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the thread pool cannot
/// be built, or any file failed to render.
pub fn render_all(config: &Config) -> Result<RenderSummary, QuireError> {
  let input = config.validate()?;
  let files = collect_markdown_files(input);
  info!("Found {} markdown files in {}", files.len(), input.display());

  fs::create_dir_all(&config.output_dir)?;

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(config.jobs.unwrap_or_else(num_cpus::get))
    .build()?;

  let renderer = Renderer::new();
  let results: Vec<_> = pool.install(|| {
    files
      .par_iter()
      .map(|file| {
        let output = output_path_for(input, file, &config.output_dir);
        let status =
          render_file(&renderer, file, &output, config.fail_on_empty);
        (file.clone(), output, status)
      })
      .collect()
  });

  let mut summary = RenderSummary::default();
  let mut failures = Vec::new();
  for (file, output, status) in results {
    match status {
      Ok(FileStatus::Degraded) => {
        summary.degraded.push(file);
        summary.written.push(output);
      },
      Ok(FileStatus::Clean | FileStatus::Empty) => summary.written.push(output),
      Err(e) => failures.push((file, e)),
    }
  }

  if failures.is_empty() {
    Ok(summary)
  } else {
    for (file, e) in &failures {
      log::error!("{}: {e}", file.display());
    }
    Err(QuireError::Failed(failures))
  }
}
