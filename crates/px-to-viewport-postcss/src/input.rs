use std::rc::Rc;

use crate::css_syntax_error::CssSyntaxError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
  pub line: u32,
  pub column: u32,
  pub offset: usize,
}

impl Position {
  pub fn new(line: u32, column: u32, offset: usize) -> Self {
    Self {
      line,
      column,
      offset,
    }
  }
}

#[derive(Clone, Debug, Default)]
pub struct InputOptions {
  pub from: Option<String>,
}

/// Source text of a stylesheet together with the path it was loaded from.
#[derive(Clone, Debug)]
pub struct Input {
  css: String,
  pub file: Option<String>,
  pub has_bom: bool,
  line_starts: Vec<usize>,
}

impl Input {
  pub fn new(css: impl Into<String>, opts: InputOptions) -> Self {
    let mut css = css.into();
    let has_bom = css.starts_with('\u{FEFF}');
    if has_bom {
      css.remove(0);
    }

    let line_starts = std::iter::once(0)
      .chain(css.match_indices('\n').map(|(index, _)| index + 1))
      .collect();

    Self {
      css,
      file: opts.from,
      has_bom,
      line_starts,
    }
  }

  pub fn css(&self) -> &str {
    &self.css
  }

  /// Translate a byte offset into a 1-based line/column pair.
  pub fn from_offset(&self, offset: usize) -> Position {
    let line_index = match self.line_starts.binary_search(&offset) {
      Ok(index) => index,
      Err(index) => index - 1,
    };
    let line_start = self.line_starts[line_index];
    let mut end = offset.min(self.css.len()).max(line_start);
    while !self.css.is_char_boundary(end) {
      end -= 1;
    }
    let column = self.css[line_start..end]
      .chars()
      .count()
      + 1;
    Position::new(line_index as u32 + 1, column as u32, offset)
  }

  pub fn error(&self, reason: impl Into<String>, offset: usize) -> CssSyntaxError {
    let position = self.from_offset(offset);
    CssSyntaxError::new(reason, self.file.clone(), position.line, position.column)
  }
}

#[derive(Clone)]
pub struct InputRef(Rc<Input>);

impl InputRef {
  pub fn new(input: Input) -> Self {
    InputRef(Rc::new(input))
  }
}

impl std::ops::Deref for InputRef {
  type Target = Input;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl From<Input> for InputRef {
  fn from(input: Input) -> Self {
    InputRef::new(input)
  }
}

impl std::fmt::Debug for InputRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InputRef")
      .field("file", &self.file)
      .finish()
  }
}
