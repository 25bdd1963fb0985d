use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use quire::{
  cli::{Cli, Commands},
  config::Config,
  render,
};
use quire_markup::ProcessorChain;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;
      Ok(())
    },

    Some(Commands::Stages) => {
      print_stages(&ProcessorChain::standard());
      Ok(())
    },

    Some(Commands::Render {
      input,
      output_dir,
      jobs,
      allow_empty,
    }) => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      config.merge_cli(
        input.as_deref(),
        output_dir.as_deref(),
        *jobs,
        *allow_empty,
      );
      render_posts(&config)
    },

    None => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      render_posts(&config)
    },
  }
}

#[allow(clippy::print_stdout, reason = "The stage list is the command output")]
fn print_stages(chain: &ProcessorChain) {
  for (position, name) in chain.names().iter().enumerate() {
    println!("{}. {name}", position + 1);
  }
}

fn render_posts(config: &Config) -> Result<()> {
  info!("Rendering into {}", config.output_dir.display());

  let summary = render::render_all(config)?;

  if summary.degraded.is_empty() {
    info!("Rendered {} documents", summary.written.len());
  } else {
    log::warn!(
      "Rendered {} documents, {} with skipped stages",
      summary.written.len(),
      summary.degraded.len()
    );
  }
  Ok(())
}
