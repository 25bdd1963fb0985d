use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::QuireError;

/// Names searched for in the working directory when no config file is given.
pub const CONFIG_FILENAMES: &[&str] =
  &["quire.toml", "quire.json", ".quire.toml", ".quire.json"];

pub const DEFAULT_TOML_TEMPLATE: &str = r#"# quire configuration file

# Markdown file, or directory searched recursively for *.md files
input = "posts"

# Directory the rendered .html fragments are written to
output_dir = "build"

# Number of threads to render with (defaults to the number of CPU cores)
# jobs = 4

# Treat a non-empty post that renders to nothing as an error
fail_on_empty = true
"#;

pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "input": "posts",
  "output_dir": "build",
  "fail_on_empty": true
}
"#;

/// Configuration for batch rendering.
///
/// Loaded from a TOML or JSON file, then overridden by CLI flags and
/// `--config KEY=VALUE` pairs. The Markdown extension set and processor
/// chain are fixed and have no settings here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Markdown file or directory to render.
  pub input: Option<PathBuf>,

  /// Output directory for rendered fragments.
  pub output_dir: PathBuf,

  /// Number of threads to use for parallel rendering.
  pub jobs: Option<usize>,

  /// Whether an empty rendering of a non-empty source is an error.
  pub fail_on_empty: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input:         None,
      output_dir:    PathBuf::from("build"),
      jobs:          None,
      fail_on_empty: true,
    }
  }
}

impl Config {
  /// Load configuration from a TOML or JSON file, chosen by extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuireError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      QuireError::Config(format!(
        "Failed to read config file: {}: {e}",
        path.display()
      ))
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          QuireError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          QuireError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })
      },
      Some(_) => {
        Err(QuireError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(QuireError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load and merge the given config files in order, or the discovered one
  /// if none are given, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file fails to load or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, QuireError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }
      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Merge another config into this one, the other config taking precedence.
  ///
  /// [`Option`] fields are only replaced by [`Some`]; plain fields are always
  /// replaced.
  pub fn merge(&mut self, other: Self) {
    if other.input.is_some() {
      self.input = other.input;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }
    self.output_dir = other.output_dir;
    self.fail_on_empty = other.fail_on_empty;
  }

  /// Apply flags from the `render` subcommand. Flags that were not given
  /// leave the loaded value alone.
  pub fn merge_cli(
    &mut self,
    input: Option<&Path>,
    output_dir: Option<&Path>,
    jobs: Option<usize>,
    allow_empty: bool,
  ) {
    if let Some(input) = input {
      self.input = Some(input.to_path_buf());
    }
    if let Some(output_dir) = output_dir {
      self.output_dir = output_dir.to_path_buf();
    }
    if jobs.is_some() {
      self.jobs = jobs;
    }
    if allow_empty {
      self.fail_on_empty = false;
    }
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not `KEY=VALUE`, names an unknown
  /// key, or has a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), QuireError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        QuireError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> Result<(), QuireError> {
    match key {
      "input" => {
        self.input = (!value.is_empty()).then(|| PathBuf::from(value));
      },
      "output_dir" => self.output_dir = PathBuf::from(value),
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e| {
            QuireError::Config(format!("Invalid value for '{key}': {e}"))
          })?)
        };
      },
      "fail_on_empty" => self.fail_on_empty = parse_bool(key, value)?,
      _ => {
        return Err(QuireError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }
    Ok(())
  }

  /// Search the working directory for a config file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`].
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Check that an input is configured and exists.
  ///
  /// # Errors
  ///
  /// Returns an error if `input` is unset or missing on disk, or if `jobs`
  /// is zero.
  pub fn validate(&self) -> Result<&Path, QuireError> {
    let input = self.input.as_deref().ok_or_else(|| {
      QuireError::Config(
        "No input given. Pass --input or set 'input' in the config file."
          .to_owned(),
      )
    })?;
    if !input.exists() {
      return Err(QuireError::Config(format!(
        "Input does not exist: {}",
        input.display()
      )));
    }
    if self.jobs == Some(0) {
      return Err(QuireError::Config("'jobs' must be at least 1".to_owned()));
    }
    Ok(input)
  }

  /// Write a commented default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), QuireError> {
    let content = match format.to_lowercase().as_str() {
      "toml" => DEFAULT_TOML_TEMPLATE,
      "json" => DEFAULT_JSON_TEMPLATE,
      other => {
        return Err(QuireError::Config(format!(
          "Unsupported config format: {other}"
        )));
      },
    };

    fs::write(path, content).map_err(|e| {
      QuireError::Config(format!(
        "Failed to write default config to {}: {e}",
        path.display()
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, QuireError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" | "on" => Ok(true),
    "false" | "no" | "0" | "off" => Ok(false),
    _ => {
      Err(QuireError::Config(format!(
        "Invalid boolean for '{key}': '{value}'"
      )))
    },
  }
}
