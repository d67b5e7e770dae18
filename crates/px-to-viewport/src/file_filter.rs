use regex::Regex;

/// A single pattern or a list of patterns tested against a source path.
#[derive(Clone, Debug)]
pub enum Matcher {
  Single(Regex),
  Many(Vec<Regex>),
}

impl Matcher {
  pub fn is_match(&self, path: &str) -> bool {
    match self {
      Matcher::Single(regex) => regex.is_match(path),
      Matcher::Many(regexes) => regexes.iter().any(|regex| regex.is_match(path)),
    }
  }
}

impl From<Regex> for Matcher {
  fn from(value: Regex) -> Self {
    Matcher::Single(value)
  }
}

impl From<Vec<Regex>> for Matcher {
  fn from(value: Vec<Regex>) -> Self {
    Matcher::Many(value)
  }
}

/// Whether a stylesheet loaded from `file` is left untouched.
///
/// `include` is evaluated first, then `exclude`. A matching `exclude`
/// always excludes the file, but a non-matching one never brings back a
/// file that `include` rejected. Stylesheets without a path are always
/// processed.
pub fn is_file_excluded(
  file: Option<&str>,
  include: Option<&Matcher>,
  exclude: Option<&Matcher>,
) -> bool {
  let Some(file) = file else {
    return false;
  };

  let mut excluded = false;
  if let Some(include) = include {
    excluded = !include.is_match(file);
  }

  if exclude.is_some_and(|exclude| exclude.is_match(file)) {
    excluded = true;
  }

  excluded
}
