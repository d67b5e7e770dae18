const WILDCARD: char = '*';
const NOT: char = '!';

fn is_exact(entry: &str) -> bool {
  !entry.is_empty() && !entry.contains([WILDCARD, NOT])
}

/// `*name*`
fn contain(entry: &str) -> Option<&str> {
  let inner = entry.strip_prefix(WILDCARD)?.strip_suffix(WILDCARD)?;
  (!inner.is_empty()).then_some(inner)
}

/// `*name`
fn end_with(entry: &str) -> Option<&str> {
  let rest = entry.strip_prefix(WILDCARD)?;
  (!rest.is_empty() && !rest.contains(WILDCARD)).then_some(rest)
}

/// `name*`
fn start_with(entry: &str) -> Option<&str> {
  let rest = entry.strip_suffix(WILDCARD)?;
  is_exact(rest).then_some(rest)
}

/// `!name`, where `name` does not start with a wildcard.
fn not_exact(entry: &str) -> Option<&str> {
  let rest = entry.strip_prefix(NOT)?;
  rest
    .chars()
    .next()
    .is_some_and(|first| first != WILDCARD)
    .then_some(rest)
}

/// `!*name*`
fn not_contain(entry: &str) -> Option<&str> {
  entry.strip_prefix(NOT).and_then(contain)
}

/// `!*name`
fn not_end_with(entry: &str) -> Option<&str> {
  entry.strip_prefix(NOT).and_then(end_with)
}

/// `!name*`
fn not_start_with(entry: &str) -> Option<&str> {
  let rest = entry.strip_prefix(NOT)?.strip_suffix(WILDCARD)?;
  (!rest.is_empty() && !rest.contains(WILDCARD)).then_some(rest)
}

fn collect(list: &[String], class: fn(&str) -> Option<&str>) -> Vec<String> {
  list
    .iter()
    .filter_map(|entry| class(entry))
    .map(str::to_string)
    .collect()
}

/// Decides which declaration properties are converted, from a list such as
/// `["*", "!letter-spacing", "font*"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropListFilter {
  has_wild: bool,
  match_all: bool,
  exact: Vec<String>,
  contain: Vec<String>,
  start_with: Vec<String>,
  end_with: Vec<String>,
  not_exact: Vec<String>,
  not_contain: Vec<String>,
  not_start_with: Vec<String>,
  not_end_with: Vec<String>,
}

impl PropListFilter {
  pub fn new(list: &[String]) -> Self {
    let has_wild = list.iter().any(|entry| entry == "*");
    Self {
      has_wild,
      match_all: has_wild && list.len() == 1,
      exact: list
        .iter()
        .filter(|entry| is_exact(entry))
        .cloned()
        .collect(),
      contain: collect(list, contain),
      start_with: collect(list, start_with),
      end_with: collect(list, end_with),
      not_exact: collect(list, not_exact),
      not_contain: collect(list, not_contain),
      not_start_with: collect(list, not_start_with),
      not_end_with: collect(list, not_end_with),
    }
  }

  pub fn is_match(&self, prop: &str) -> bool {
    if self.match_all {
      return true;
    }

    let allowed = self.has_wild
      || self.exact.iter().any(|name| name == prop)
      || self.contain.iter().any(|name| prop.contains(name.as_str()))
      || self.start_with.iter().any(|name| prop.starts_with(name.as_str()))
      || self.end_with.iter().any(|name| prop.ends_with(name.as_str()));

    let denied = self.not_exact.iter().any(|name| name == prop)
      || self.not_contain.iter().any(|name| prop.contains(name.as_str()))
      || self
        .not_start_with
        .iter()
        .any(|name| prop.starts_with(name.as_str()))
      || self
        .not_end_with
        .iter()
        .any(|name| prop.ends_with(name.as_str()));

    allowed && !denied
  }

  pub fn exact(&self) -> &[String] {
    &self.exact
  }

  pub fn contain(&self) -> &[String] {
    &self.contain
  }

  pub fn start_with(&self) -> &[String] {
    &self.start_with
  }

  pub fn end_with(&self) -> &[String] {
    &self.end_with
  }

  pub fn not_exact(&self) -> &[String] {
    &self.not_exact
  }

  pub fn not_contain(&self) -> &[String] {
    &self.not_contain
  }

  pub fn not_start_with(&self) -> &[String] {
    &self.not_start_with
  }

  pub fn not_end_with(&self) -> &[String] {
    &self.not_end_with
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn filter(list: &[&str]) -> PropListFilter {
    PropListFilter::new(&list.iter().map(|s| s.to_string()).collect::<Vec<_>>())
  }

  #[test]
  fn extracts_exact_entries() {
    let filter = filter(&["font-size", "margin", "!padding", "*border*", "*", "*y", "!*font*"]);

    assert_eq!(filter.exact().join(","), "font-size,margin");
  }

  #[test]
  fn extracts_contain_entries() {
    let filter = filter(&["font-size", "*margin*", "!padding", "*border*", "*", "*y", "!*font*"]);

    assert_eq!(filter.contain().join(","), "margin,border");
  }

  #[test]
  fn extracts_start_and_end_entries() {
    let filter = filter(&["font-size", "*margin*", "!padding", "border*", "*", "*y", "!*font*"]);

    assert_eq!(filter.start_with().join(","), "border");
    assert_eq!(filter.end_with().join(","), "y");
    assert_eq!(filter.not_exact().join(","), "padding");
  }

  #[test]
  fn extracts_negated_entries() {
    let negated = filter(&["font-size", "*margin*", "!padding", "!border*", "*", "*y", "!*font*"]);
    assert_eq!(negated.not_contain().join(","), "font");
    assert_eq!(negated.not_start_with().join(","), "border");

    let negated = filter(&["font-size", "*margin*", "!padding", "!border*", "*", "!*y", "!*font*"]);
    assert_eq!(negated.not_end_with().join(","), "y");
  }

  #[test]
  fn lone_wildcard_matches_everything() {
    let filter = filter(&["*"]);

    assert!(filter.is_match("font-size"));
    assert!(filter.is_match("anything"));
  }

  #[test]
  fn combines_positive_and_negative_classes() {
    let filter = filter(&["*font*", "margin*", "!margin-left", "*-right", "pad"]);

    assert!(filter.is_match("font-size"));
    assert!(filter.is_match("margin"));
    assert!(!filter.is_match("margin-left"));
    assert!(!filter.is_match("padding"));
    assert!(filter.is_match("padding-right"));
    assert!(filter.is_match("pad"));
  }

  #[test]
  fn wildcard_with_negations() {
    let filter = filter(&["*", "!margin-left", "!*padding*", "!font*"]);

    assert!(!filter.is_match("font-size"));
    assert!(filter.is_match("margin"));
    assert!(!filter.is_match("margin-left"));
    assert!(!filter.is_match("padding-right"));
  }

  #[test]
  fn empty_list_matches_nothing() {
    assert!(!filter(&[]).is_match("width"));
  }
}
