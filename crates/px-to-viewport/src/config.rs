use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::file_filter::Matcher;
use crate::selector::SelectorPattern;

/// Options as written in JSON configuration. Every field is optional and
/// falls back to the documented default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializablePxToViewportOptions {
  pub unit_to_convert: Option<String>,
  pub viewport_width: Option<f64>,
  pub unit_precision: Option<u32>,
  pub prop_list: Option<Vec<String>>,
  pub viewport_unit: Option<String>,
  pub font_viewport_unit: Option<String>,
  pub selector_black_list: Option<Vec<String>>,
  pub min_pixel_value: Option<f64>,
  pub media_query: Option<bool>,
  pub replace: Option<bool>,
  pub include: Option<Value>,
  pub exclude: Option<Value>,
  pub landscape: Option<bool>,
  pub landscape_unit: Option<String>,
  pub landscape_width: Option<f64>,
}

/// Resolved options for one plugin instance.
#[derive(Clone, Debug)]
pub struct PxToViewportOptions {
  pub unit_to_convert: String,
  pub viewport_width: f64,
  pub unit_precision: u32,
  pub prop_list: Vec<String>,
  pub viewport_unit: String,
  pub font_viewport_unit: String,
  pub selector_black_list: Vec<SelectorPattern>,
  pub min_pixel_value: f64,
  pub media_query: bool,
  pub replace: bool,
  pub include: Option<Matcher>,
  pub exclude: Option<Matcher>,
  pub landscape: bool,
  pub landscape_unit: String,
  pub landscape_width: f64,
}

impl Default for PxToViewportOptions {
  fn default() -> Self {
    Self {
      unit_to_convert: "px".into(),
      viewport_width: 320.0,
      unit_precision: 5,
      prop_list: vec!["*".into()],
      viewport_unit: "vw".into(),
      font_viewport_unit: "vw".into(),
      selector_black_list: Vec::new(),
      min_pixel_value: 1.0,
      media_query: false,
      replace: true,
      include: None,
      exclude: None,
      landscape: false,
      landscape_unit: "vw".into(),
      landscape_width: 568.0,
    }
  }
}

impl PxToViewportOptions {
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let options: SerializablePxToViewportOptions = serde_json::from_str(json)?;
    Self::try_from(options)
  }

  /// Unit for a declaration outside landscape at-rules.
  pub fn unit_for(&self, prop: &str) -> &str {
    if prop.contains("font") {
      &self.font_viewport_unit
    } else {
      &self.viewport_unit
    }
  }
}

impl TryFrom<SerializablePxToViewportOptions> for PxToViewportOptions {
  type Error = ConfigError;

  fn try_from(value: SerializablePxToViewportOptions) -> Result<Self, Self::Error> {
    let defaults = PxToViewportOptions::default();

    let selector_black_list = match value.selector_black_list {
      Some(entries) => entries
        .into_iter()
        .map(selector_pattern)
        .collect::<Result<Vec<_>, _>>()?,
      None => defaults.selector_black_list,
    };

    Ok(PxToViewportOptions {
      unit_to_convert: value.unit_to_convert.unwrap_or(defaults.unit_to_convert),
      viewport_width: value.viewport_width.unwrap_or(defaults.viewport_width),
      unit_precision: value.unit_precision.unwrap_or(defaults.unit_precision),
      prop_list: value.prop_list.unwrap_or(defaults.prop_list),
      viewport_unit: value.viewport_unit.unwrap_or(defaults.viewport_unit),
      font_viewport_unit: value
        .font_viewport_unit
        .unwrap_or(defaults.font_viewport_unit),
      selector_black_list,
      min_pixel_value: value.min_pixel_value.unwrap_or(defaults.min_pixel_value),
      media_query: value.media_query.unwrap_or(defaults.media_query),
      replace: value.replace.unwrap_or(defaults.replace),
      include: matcher("include", value.include)?,
      exclude: matcher("exclude", value.exclude)?,
      landscape: value.landscape.unwrap_or(defaults.landscape),
      landscape_unit: value.landscape_unit.unwrap_or(defaults.landscape_unit),
      landscape_width: value.landscape_width.unwrap_or(defaults.landscape_width),
    })
  }
}

/// Split `/source/flags` into its parts. Anything after the last slash that
/// is not a set of regex flags means the string is a plain source, so
/// `/styles/mobile` stays a path pattern.
fn regex_literal(pattern: &str) -> Option<(&str, &str)> {
  let rest = pattern.strip_prefix('/')?;
  let end = rest.rfind('/')?;
  let flags = &rest[end + 1..];
  flags
    .chars()
    .all(|flag| "dgimsuvy".contains(flag))
    .then_some((&rest[..end], flags))
}

/// Compile a pattern written either as a bare regex source or in literal
/// form, `/source/flags`. The `i`, `m` and `s` flags are honoured; others
/// have no meaning for a single test and are ignored.
pub fn compile_pattern(option: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
  let builder = match regex_literal(pattern) {
    Some((source, flags)) => {
      let mut builder = RegexBuilder::new(source);
      builder
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'));
      builder
    }
    None => RegexBuilder::new(pattern),
  };

  builder
    .build()
    .map_err(|source| ConfigError::InvalidPattern { option, source })
}

fn matcher(option: &'static str, value: Option<Value>) -> Result<Option<Matcher>, ConfigError> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(pattern)) => Ok(Some(Matcher::Single(compile_pattern(option, &pattern)?))),
    Some(Value::Array(items)) => {
      let mut patterns = Vec::with_capacity(items.len());
      for item in items {
        let Value::String(pattern) = item else {
          return Err(ConfigError::InvalidMatcher { option });
        };
        patterns.push(compile_pattern(option, &pattern)?);
      }
      Ok(Some(Matcher::Many(patterns)))
    }
    Some(_) => Err(ConfigError::InvalidMatcher { option }),
  }
}

fn selector_pattern(entry: String) -> Result<SelectorPattern, ConfigError> {
  if regex_literal(&entry).is_some() {
    Ok(SelectorPattern::Regex(compile_pattern(
      "selectorBlackList",
      &entry,
    )?))
  } else {
    Ok(SelectorPattern::Contains(entry))
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn empty_object_gives_defaults() {
    let options = PxToViewportOptions::from_json("{}").unwrap();

    assert_eq!(options.unit_to_convert, "px");
    assert_eq!(options.viewport_width, 320.0);
    assert_eq!(options.unit_precision, 5);
    assert_eq!(options.prop_list, vec!["*".to_string()]);
    assert_eq!(options.viewport_unit, "vw");
    assert_eq!(options.font_viewport_unit, "vw");
    assert!(options.selector_black_list.is_empty());
    assert_eq!(options.min_pixel_value, 1.0);
    assert!(!options.media_query);
    assert!(options.replace);
    assert!(options.include.is_none());
    assert!(options.exclude.is_none());
    assert!(!options.landscape);
    assert_eq!(options.landscape_unit, "vw");
    assert_eq!(options.landscape_width, 568.0);
  }

  #[test]
  fn reads_camel_case_keys() {
    let options = PxToViewportOptions::from_json(
      r#"{
        "viewportWidth": 750,
        "unitPrecision": 3,
        "fontViewportUnit": "vmax",
        "mediaQuery": true,
        "landscape": true,
        "landscapeWidth": 1334
      }"#,
    )
    .unwrap();

    assert_eq!(options.viewport_width, 750.0);
    assert_eq!(options.unit_precision, 3);
    assert_eq!(options.unit_for("font-size"), "vmax");
    assert_eq!(options.unit_for("margin"), "vw");
    assert!(options.media_query);
    assert_eq!(options.landscape_width, 1334.0);
  }

  #[test]
  fn builds_matchers() {
    let options = PxToViewportOptions::from_json(
      r#"{ "include": "/\\/mobile\\//", "exclude": ["node_modules", "/PC/i"] }"#,
    )
    .unwrap();

    let Some(Matcher::Single(include)) = &options.include else {
      panic!("expected a single include pattern");
    };
    assert!(include.is_match("/mobile/main.css"));

    let Some(Matcher::Many(exclude)) = &options.exclude else {
      panic!("expected an exclude list");
    };
    assert!(exclude[0].is_match("/node_modules/a.css"));
    assert!(exclude[1].is_match("/pc/a.css"));
  }

  #[test]
  fn rejects_non_pattern_matchers() {
    let error = PxToViewportOptions::from_json(r#"{ "include": 42 }"#).unwrap_err();
    assert_eq!(
      error.to_string(),
      "options.include should be RegExp or Array of RegExp."
    );

    let error = PxToViewportOptions::from_json(r#"{ "exclude": ["a", 1] }"#).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidMatcher { option: "exclude" }));
  }

  #[test]
  fn null_matcher_is_unset() {
    let options = PxToViewportOptions::from_json(r#"{ "include": null }"#).unwrap();

    assert!(options.include.is_none());
  }

  #[test]
  fn rejects_invalid_regex() {
    let error = PxToViewportOptions::from_json(r#"{ "exclude": "(" }"#).unwrap_err();

    assert!(matches!(
      error,
      ConfigError::InvalidPattern {
        option: "exclude",
        ..
      }
    ));
  }

  #[test]
  fn selector_list_mixes_substrings_and_regexes() {
    let options =
      PxToViewportOptions::from_json(r#"{ "selectorBlackList": [".ignore", "/^body$/"] }"#).unwrap();

    assert!(matches!(
      &options.selector_black_list[0],
      SelectorPattern::Contains(text) if text == ".ignore"
    ));
    assert!(options.selector_black_list[1].is_match("body"));
    assert!(!options.selector_black_list[1].is_match(".body"));
  }

  #[test]
  fn slash_separated_paths_are_not_literals() {
    let pattern = compile_pattern("include", "/styles/mobile").unwrap();

    assert_eq!(pattern.as_str(), "/styles/mobile");
    assert!(!pattern.is_match("/app/styles/desktop/a.css"));
    assert!(pattern.is_match("/app/styles/mobile/a.css"));

    let pattern = compile_pattern("include", "/Mobile/i").unwrap();
    assert!(pattern.is_match("/app/mobile/a.css"));
  }

  #[test]
  fn selector_paths_stay_substrings() {
    let options =
      PxToViewportOptions::from_json(r#"{ "selectorBlackList": ["/a/b"] }"#).unwrap();

    assert!(matches!(
      &options.selector_black_list[0],
      SelectorPattern::Contains(text) if text == "/a/b"
    ));
  }

  #[test]
  fn unknown_keys_are_ignored() {
    let options = PxToViewportOptions::from_json(r#"{ "propWhiteList": [], "minPixelValue": 2 }"#).unwrap();

    assert_eq!(options.min_pixel_value, 2.0);
  }
}
