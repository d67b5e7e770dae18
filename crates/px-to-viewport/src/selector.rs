use regex::Regex;

/// Entry of the selector deny list.
#[derive(Clone, Debug)]
pub enum SelectorPattern {
  /// Denies every selector containing this text.
  Contains(String),
  Regex(Regex),
}

impl SelectorPattern {
  pub fn is_match(&self, selector: &str) -> bool {
    match self {
      SelectorPattern::Contains(text) => selector.contains(text.as_str()),
      SelectorPattern::Regex(regex) => regex.is_match(selector),
    }
  }
}

impl From<&str> for SelectorPattern {
  fn from(value: &str) -> Self {
    SelectorPattern::Contains(value.to_string())
  }
}

impl From<String> for SelectorPattern {
  fn from(value: String) -> Self {
    SelectorPattern::Contains(value)
  }
}

impl From<Regex> for SelectorPattern {
  fn from(value: Regex) -> Self {
    SelectorPattern::Regex(value)
  }
}

pub fn is_denied(selector: &str, deny_list: &[SelectorPattern]) -> bool {
  deny_list.iter().any(|pattern| pattern.is_match(selector))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn substring_entries_match_anywhere() {
    let deny_list = vec![SelectorPattern::from("body$")];

    assert!(is_denied(".class-body$", &deny_list));
    assert!(!is_denied("body", &deny_list));
  }

  #[test]
  fn regex_entries_match_exactly() {
    let deny_list = vec![SelectorPattern::from(Regex::new("^body$").unwrap())];

    assert!(is_denied("body", &deny_list));
    assert!(!is_denied(".class-body", &deny_list));
  }

  #[test]
  fn empty_list_denies_nothing() {
    assert!(!is_denied(".rule", &[]));
  }
}
