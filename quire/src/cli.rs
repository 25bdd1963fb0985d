use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for quire
#[derive(Parser, Debug)]
#[command(author, version, about = "quire: Markdown posts to styled HTML")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Defaults to `render` with
  /// settings from the config file.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Later files override earlier ones.
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the quire CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new quire configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "quire.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render Markdown files to HTML fragments.
  Render {
    /// Markdown file, or directory searched recursively for `*.md`.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for rendered fragments.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of threads to use for parallel rendering.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,

    /// Write empty fragments instead of failing when a conversion fails.
    #[arg(long)]
    allow_empty: bool,
  },

  /// Print the processor stages in the order they run.
  Stages,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_render() {
    let cli = Cli::try_parse_from([
      "quire",
      "-v",
      "--config",
      "fail_on_empty=false",
      "render",
      "-i",
      "posts",
      "-p",
      "2",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, vec!["fail_on_empty=false"]);
    match cli.command {
      Some(Commands::Render {
        input,
        output_dir,
        jobs,
        allow_empty,
      }) => {
        assert_eq!(input, Some(PathBuf::from("posts")));
        assert!(output_dir.is_none());
        assert_eq!(jobs, Some(2));
        assert!(!allow_empty);
      },
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn test_init_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["quire", "init", "-F", "yaml"]).is_err());
  }
}
