use std::fmt;

use crate::ast::NodeRef;

#[derive(Clone, Debug, Default)]
pub struct WarningOptions {
  pub plugin: Option<String>,
  pub node: Option<NodeRef>,
  pub word: Option<String>,
}

impl WarningOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn plugin(mut self, plugin: impl Into<String>) -> Self {
    self.plugin = Some(plugin.into());
    self
  }

  pub fn node(mut self, node: NodeRef) -> Self {
    self.node = Some(node);
    self
  }

  pub fn word(mut self, word: impl Into<String>) -> Self {
    self.word = Some(word.into());
    self
  }
}

/// Non-fatal diagnostic attached to a processing result.
#[derive(Clone, Debug)]
pub struct Warning {
  pub text: String,
  pub plugin: Option<String>,
  pub node: Option<NodeRef>,
  pub word: Option<String>,
  pub file: Option<String>,
  pub line: Option<usize>,
  pub column: Option<usize>,
}

impl Warning {
  pub fn new(text: impl Into<String>, opts: WarningOptions) -> Self {
    let (file, line, column) = match &opts.node {
      Some(node) => {
        let inner = node.borrow();
        let source = &inner.source;
        (
          source.input.as_ref().and_then(|input| input.file.clone()),
          source.start.as_ref().map(|pos| pos.line as usize),
          source.start.as_ref().map(|pos| pos.column as usize),
        )
      }
      None => (None, None, None),
    };

    Self {
      text: text.into(),
      plugin: opts.plugin,
      node: opts.node,
      word: opts.word,
      file,
      line,
      column,
    }
  }
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(plugin) = &self.plugin {
      write!(f, "{}: ", plugin)?;
    }
    if let Some(file) = &self.file {
      write!(f, "{}:", file)?;
    }
    if let (Some(line), Some(column)) = (self.line, self.column) {
      write!(f, "{}:{}: ", line, column)?;
    }
    write!(f, "{}", self.text)
  }
}

/// State shared by every plugin while a stylesheet is processed.
#[derive(Debug, Default)]
pub struct Result {
  pub from: Option<String>,
  messages: Vec<Warning>,
  last_plugin: Option<String>,
}

impl Result {
  pub fn new(from: Option<String>) -> Self {
    Self {
      from,
      messages: Vec::new(),
      last_plugin: None,
    }
  }

  pub(crate) fn set_last_plugin(&mut self, plugin: &str) {
    self.last_plugin = Some(plugin.to_string());
  }

  /// Record a warning. The running plugin's name is used when `opts` does
  /// not carry one.
  pub fn warn(&mut self, text: impl Into<String>, mut opts: WarningOptions) -> Warning {
    if opts.plugin.is_none() {
      opts.plugin = self.last_plugin.clone();
    }
    let warning = Warning::new(text, opts);
    self.messages.push(warning.clone());
    warning
  }

  pub fn warnings(&self) -> &[Warning] {
    &self.messages
  }

  pub fn into_warnings(self) -> Vec<Warning> {
    self.messages
  }
}
