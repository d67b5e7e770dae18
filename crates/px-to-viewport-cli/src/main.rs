use clap::Parser;
use px_to_viewport_cli::{run, Args};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let summary = run(&args, &mut std::io::stdout().lock())?;

  tracing::info!(
    "converted {} files with {} warnings",
    summary.files,
    summary.warnings
  );
  Ok(())
}
