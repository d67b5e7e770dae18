use thiserror::Error;

use crate::ast::NodeRef;
use crate::css_syntax_error::CssSyntaxError;
use crate::parse::{parse_with_options, ParseOptions};
use crate::result::{Result as PostcssResult, Warning};
use crate::stringifier::stringify;
use crate::visitor::{walk, Visitor};

#[derive(Debug, Error)]
pub enum ProcessorError {
  #[error(transparent)]
  Css(#[from] CssSyntaxError),
  #[error("{0}")]
  Message(String),
}

/// A transformation applied to a parsed stylesheet.
///
/// `prepare` is called once per stylesheet and returns the visitor that
/// holds the state of that run, so one plugin value can process many
/// stylesheets without leaking state between them.
pub trait Plugin {
  fn name(&self) -> &str;

  fn prepare<'a>(
    &'a self,
    result: &mut PostcssResult,
  ) -> Result<Box<dyn Visitor + 'a>, ProcessorError>;
}

#[derive(Clone, Debug, Default)]
pub struct ProcessOptions {
  pub from: Option<String>,
}

impl ProcessOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_path(mut self, from: impl Into<String>) -> Self {
    self.from = Some(from.into());
    self
  }
}

#[derive(Debug)]
pub struct ProcessResult {
  pub root: NodeRef,
  pub css: String,
  pub warnings: Vec<Warning>,
}

impl ProcessResult {
  pub fn css(&self) -> &str {
    &self.css
  }

  pub fn warnings(&self) -> &[Warning] {
    &self.warnings
  }
}

#[derive(Default)]
pub struct Processor {
  plugins: Vec<Box<dyn Plugin>>,
}

impl Processor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Box::new(plugin));
    self
  }

  pub fn process(&self, css: &str) -> Result<ProcessResult, ProcessorError> {
    self.process_with_options(css, ProcessOptions::default())
  }

  pub fn process_with_options(
    &self,
    css: &str,
    opts: ProcessOptions,
  ) -> Result<ProcessResult, ProcessorError> {
    let parse_opts = ParseOptions {
      from: opts.from.clone(),
    };
    let root = parse_with_options(css, parse_opts)?;
    let mut result = PostcssResult::new(opts.from);
    self.run(&root, &mut result)?;

    Ok(ProcessResult {
      css: stringify(&root),
      root,
      warnings: result.into_warnings(),
    })
  }

  /// Run every plugin, in registration order, over an already parsed tree.
  pub fn run(&self, root: &NodeRef, result: &mut PostcssResult) -> Result<(), ProcessorError> {
    for plugin in &self.plugins {
      tracing::debug!(plugin = plugin.name(), from = ?result.from, "running plugin");
      result.set_last_plugin(plugin.name());
      let mut visitor = plugin.prepare(result)?;
      walk(root, visitor.as_mut(), result)?;
    }
    Ok(())
  }
}

impl std::fmt::Debug for Processor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Processor")
      .field(
        "plugins",
        &self.plugins.iter().map(|plugin| plugin.name()).collect::<Vec<_>>(),
      )
      .finish()
  }
}
