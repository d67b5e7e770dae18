use regex::{CaptureMatches, Regex};

use crate::error::ConfigError;

/// A piece of a declaration value as seen by the [`UnitMatcher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
  /// Text between matches.
  Text(&'a str),
  /// A quoted string or a `url(...)` that must not be rewritten.
  Protected(&'a str),
  /// A number directly followed by the unit, e.g. `12px` with number `12`.
  Length { matched: &'a str, number: &'a str },
}

impl<'a> Segment<'a> {
  pub fn as_str(&self) -> &'a str {
    match self {
      Segment::Text(text) | Segment::Protected(text) => text,
      Segment::Length { matched, .. } => matched,
    }
  }
}

/// Finds `<number><unit>` tokens in a declaration value, skipping quoted
/// strings and `url(...)`. Matching is case-sensitive, so `12PX` is left
/// alone when converting `px`.
#[derive(Clone, Debug)]
pub struct UnitMatcher {
  unit: String,
  regex: Regex,
}

impl UnitMatcher {
  pub fn new(unit: &str) -> Result<Self, ConfigError> {
    let pattern = format!(
      r#""[^"]+"|'[^']+'|url\([^)]+\)|([0-9]*\.?[0-9]+){}"#,
      regex::escape(unit)
    );
    let regex = Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern {
      option: "unitToConvert",
      source,
    })?;

    Ok(Self {
      unit: unit.to_string(),
      regex,
    })
  }

  /// Cheap pre-filter: values that never mention the unit cannot match.
  pub fn mentions_unit(&self, value: &str) -> bool {
    value.contains(self.unit.as_str())
  }

  pub fn segments<'a>(&'a self, value: &'a str) -> Segments<'a> {
    Segments {
      captures: self.regex.captures_iter(value),
      value,
      position: 0,
      pending: None,
    }
  }

  /// Rebuild `value`, passing every length token through `replace` as
  /// `(matched, number)`. Everything else is copied verbatim.
  pub fn replace<F>(&self, value: &str, mut replace: F) -> String
  where
    F: FnMut(&str, &str) -> String,
  {
    let mut out = String::with_capacity(value.len());
    for segment in self.segments(value) {
      match segment {
        Segment::Length { matched, number } => out.push_str(&replace(matched, number)),
        other => out.push_str(other.as_str()),
      }
    }
    out
  }
}

/// Iterator over the [`Segment`]s of one value. Concatenating every
/// segment yields the value back unchanged.
pub struct Segments<'a> {
  captures: CaptureMatches<'a, 'a>,
  value: &'a str,
  position: usize,
  pending: Option<Segment<'a>>,
}

impl<'a> Iterator for Segments<'a> {
  type Item = Segment<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(segment) = self.pending.take() {
      return Some(segment);
    }

    let Some(captures) = self.captures.next() else {
      if self.position < self.value.len() {
        let rest = &self.value[self.position..];
        self.position = self.value.len();
        return Some(Segment::Text(rest));
      }
      return None;
    };

    let whole = captures.get(0)?;
    let segment = match captures.get(1) {
      Some(number) => Segment::Length {
        matched: whole.as_str(),
        number: number.as_str(),
      },
      None => Segment::Protected(whole.as_str()),
    };

    let start = self.position;
    self.position = whole.end();
    if whole.start() > start {
      self.pending = Some(segment);
      return Some(Segment::Text(&self.value[start..whole.start()]));
    }
    Some(segment)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn splits_value_into_segments() {
    let matcher = UnitMatcher::new("px").unwrap();

    let segments: Vec<_> = matcher
      .segments("0 .5px url(16px.jpg) '2px' 10PX")
      .collect();

    assert_eq!(
      segments,
      vec![
        Segment::Text("0 "),
        Segment::Length {
          matched: ".5px",
          number: ".5"
        },
        Segment::Text(" "),
        Segment::Protected("url(16px.jpg)"),
        Segment::Text(" "),
        Segment::Protected("'2px'"),
        Segment::Text(" 10PX"),
      ]
    );
  }

  #[test]
  fn replace_only_touches_lengths() {
    let matcher = UnitMatcher::new("px").unwrap();

    let value = matcher.replace("calc(100% - 20px) \"8px\"", |_, number| format!("<{}>", number));

    assert_eq!(value, "calc(100% - <20>) \"8px\"");
  }

  #[test]
  fn escapes_the_unit() {
    let matcher = UnitMatcher::new("r.m").unwrap();

    assert_eq!(matcher.replace("1rem 2r.m", |_, n| n.to_string()), "1rem 2");
  }

  #[test]
  fn segments_can_be_restarted() {
    let matcher = UnitMatcher::new("px").unwrap();
    let value = "1px solid";

    let first: String = matcher.segments(value).map(|s| s.as_str()).collect();
    let second: String = matcher.segments(value).map(|s| s.as_str()).collect();

    assert_eq!(first, value);
    assert_eq!(second, value);
  }
}
