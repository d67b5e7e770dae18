/// Where the walk currently is with respect to at-rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scope {
  /// Inside at least one at-rule.
  pub inside: bool,
  /// Inside an at-rule whose params mention `landscape`.
  pub landscape: bool,
  /// Declarations here are not converted because media queries are off.
  pub skip: bool,
}

/// Stack of at-rule scopes. Leaving an at-rule restores the enclosing one,
/// so nested at-rules do not reset their parent's state.
#[derive(Clone, Debug)]
pub struct ScopeTracker {
  convert_media_queries: bool,
  frames: Vec<Scope>,
}

impl ScopeTracker {
  pub fn new(convert_media_queries: bool) -> Self {
    Self {
      convert_media_queries,
      frames: Vec::new(),
    }
  }

  pub fn enter(&mut self, params: &str) {
    let landscape = params.contains("landscape") || self.current().landscape;
    self.frames.push(Scope {
      inside: true,
      landscape,
      skip: !self.convert_media_queries,
    });
  }

  pub fn exit(&mut self) {
    self.frames.pop();
  }

  pub fn current(&self) -> Scope {
    self.frames.last().copied().unwrap_or_default()
  }

  pub fn is_inside(&self) -> bool {
    self.current().inside
  }

  /// Declarations in landscape at-rules use the landscape unit and width.
  pub fn is_landscape(&self) -> bool {
    let scope = self.current();
    scope.inside && scope.landscape
  }

  pub fn skips_declarations(&self) -> bool {
    self.current().skip
  }
}
