use thiserror::Error;

/// Raised while resolving options, before any stylesheet is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("options.{option} should be RegExp or Array of RegExp.")]
  InvalidMatcher { option: &'static str },

  #[error("options.{option} contains an invalid pattern")]
  InvalidPattern {
    option: &'static str,
    #[source]
    source: regex::Error,
  },

  #[error("options are not valid JSON")]
  Json(#[from] serde_json::Error),
}
