//! Library half of the `px2vw` binary, kept separate so the conversion of
//! files on disk can be tested without spawning a process.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use px_to_viewport::{processor, ProcessOptions, PxToViewportOptions};

#[derive(Parser, Debug)]
#[command(name = "px2vw", version, about = "Convert px lengths in stylesheets into viewport units")]
pub struct Args {
  /// JSON file with the conversion options, using camelCase keys
  #[arg(short, long)]
  pub config: Option<PathBuf>,
  /// Write converted stylesheets into this directory instead of stdout
  #[arg(short, long)]
  pub out_dir: Option<PathBuf>,
  /// Stylesheets to convert
  #[arg(required = true)]
  pub files: Vec<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
  pub files: usize,
  pub warnings: usize,
}

pub fn load_options(config: Option<&Path>) -> anyhow::Result<PxToViewportOptions> {
  let Some(config) = config else {
    return Ok(PxToViewportOptions::default());
  };

  let json = fs::read_to_string(config)
    .with_context(|| format!("Failed to read config {}", config.display()))?;
  PxToViewportOptions::from_json(&json)
    .with_context(|| format!("Invalid config {}", config.display()))
}

/// Convert every file named in `args`. Output goes to `--out-dir` when set,
/// otherwise each stylesheet is written to `stdout` in order.
pub fn run(args: &Args, stdout: &mut dyn Write) -> anyhow::Result<Summary> {
  let options = load_options(args.config.as_deref())?;
  let processor = processor(options)?;
  let mut summary = Summary::default();

  if let Some(out_dir) = &args.out_dir {
    fs::create_dir_all(out_dir)
      .with_context(|| format!("Failed to create {}", out_dir.display()))?;
  }

  for file in &args.files {
    let css = fs::read_to_string(file)
      .with_context(|| format!("Failed to read {}", file.display()))?;
    let result = processor
      .process_with_options(&css, ProcessOptions::new().from_path(file.to_string_lossy()))
      .with_context(|| format!("Failed to convert {}", file.display()))?;

    for warning in result.warnings() {
      tracing::warn!("{}", warning);
    }
    summary.warnings += result.warnings().len();

    match &args.out_dir {
      Some(out_dir) => {
        let Some(name) = file.file_name() else {
          anyhow::bail!("{} has no file name", file.display());
        };
        let target = out_dir.join(name);
        fs::write(&target, result.css())
          .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::debug!(from = %file.display(), to = %target.display(), "wrote stylesheet");
      }
      None => {
        stdout.write_all(result.css().as_bytes())?;
        if !result.css().ends_with('\n') {
          stdout.write_all(b"\n")?;
        }
      }
    }
    summary.files += 1;
  }

  Ok(summary)
}
